//! Data models for Libris

pub mod book;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::{Book, BookInput};
pub use loan::{Loan, LoanDetails, NewLoan};
pub use member::Member;
