//! Loan lifecycle service
//!
//! Keeps a book's availability flag in step with its loans: a book is
//! unavailable exactly while one of its loans has not been returned. Borrow
//! and return each run in a single transaction; a dropped transaction rolls
//! back, so an early return leaves nothing half-written.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, LoanDetails, LoanQuery, NewLoan},
        member::Member,
    },
    repository::{
        books::BooksRepository, loans::LoansRepository, members::MembersRepository, Repository,
    },
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    duration_days: i64,
}

impl LoansService {
    pub fn new(repository: Repository, duration_days: i64) -> Self {
        Self {
            repository,
            duration_days,
        }
    }

    /// Lend a book to a member.
    ///
    /// Fails with `NotFound` for an unknown book or member and with
    /// `IllegalState` when the book is already lent; nothing is written in
    /// either case.
    pub async fn borrow(&self, book_id: i64, member_id: i64) -> AppResult<Loan> {
        let mut tx = self.repository.pool.begin().await?;

        // The conditional update opens the transaction, so a concurrent
        // borrow waits for the write lock and then sees the flag already down.
        if !BooksRepository::mark_unavailable(&mut tx, book_id).await? {
            let error = match BooksRepository::find(&mut *tx, book_id).await? {
                None => AppError::NotFound(format!("Book with id {} not found", book_id)),
                Some(_) => {
                    tracing::warn!(
                        "Borrow refused: book {} is not available (member {})",
                        book_id,
                        member_id
                    );
                    AppError::IllegalState(format!("Book {} is already on loan", book_id))
                }
            };
            tx.rollback().await?;
            return Err(error);
        }

        if MembersRepository::find(&mut *tx, member_id).await?.is_none() {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                member_id
            )));
        }

        let new_loan = NewLoan::new(book_id, member_id, Utc::now(), None, self.duration_days);
        let loan = LoansRepository::insert(&mut tx, &new_loan).await?;

        tx.commit().await?;

        tracing::info!(
            "Loan {} created: book {} to member {}, due {}",
            loan.id, book_id, member_id, new_loan.end_date
        );
        Ok(loan)
    }

    /// Close the active loan of a book, if any.
    ///
    /// Returns `None` without touching anything when the book is not lent.
    pub async fn return_book(&self, book_id: i64) -> AppResult<Option<Loan>> {
        let mut tx = self.repository.pool.begin().await?;

        let Some(loan) = LoansRepository::close_first_active(&mut tx, book_id, Utc::now()).await?
        else {
            let found = BooksRepository::find(&mut *tx, book_id).await?;
            tx.rollback().await?;
            if found.is_none() {
                return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
            }
            tracing::debug!("Return of book {} ignored: no active loan", book_id);
            return Ok(None);
        };

        // Legacy data may hold several open loans for one book.
        if LoansRepository::find_active_for_book(&mut tx, book_id).await?.is_none() {
            BooksRepository::mark_available(&mut tx, book_id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Loan {} returned: book {} after {} day(s)",
            loan.id,
            book_id,
            loan.days_borrowed()
        );
        Ok(Some(loan))
    }

    /// Member and the books of their active loans
    pub async fn borrowed_books(&self, member_id: i64) -> AppResult<(Member, Vec<Book>)> {
        let member = self.repository.members.get_by_id(member_id).await?;
        let books = self.repository.loans.books_lent_to(member_id).await?;
        Ok((member, books))
    }

    pub async fn get(&self, id: i64) -> AppResult<LoanDetails> {
        let loan = self.repository.loans.get_by_id(id).await?;
        Ok(loan.into())
    }

    /// Loan history with computed fields
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<LoanDetails>> {
        let loans = self.repository.loans.list(query).await?;
        Ok(loans.into_iter().map(LoanDetails::from).collect())
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.loans.count_active().await
    }
}
