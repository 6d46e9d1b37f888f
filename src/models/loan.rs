//! Loan (borrow) model and the pure rules of the loan lifecycle

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Loan length used when no end date is given
pub const DEFAULT_LOAN_DAYS: i64 = 30;

/// Loan model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub start_date: DateTime<Utc>,
    /// Due date while the loan runs, actual return time once returned
    pub end_date: Option<DateTime<Utc>>,
    /// Set on return; a loan is active while this is null
    pub returned_date: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.returned_date.is_none()
    }

    pub fn days_borrowed(&self) -> i64 {
        days_borrowed(self.start_date, self.end_date)
    }
}

/// End date of a new loan: the explicit one, or `start + duration_days`.
pub fn due_date(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    duration_days: i64,
) -> DateTime<Utc> {
    end.unwrap_or_else(|| start + Duration::days(duration_days))
}

/// Whole days between start and end, 0 while no end date is recorded.
pub fn days_borrowed(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> i64 {
    match end {
        Some(end) => (end - start).num_days(),
        None => 0,
    }
}

/// Loan about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub book_id: i64,
    pub member_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl NewLoan {
    pub fn new(
        book_id: i64,
        member_id: i64,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        duration_days: i64,
    ) -> Self {
        Self {
            book_id,
            member_id,
            start_date,
            end_date: due_date(start_date, end_date, duration_days),
        }
    }
}

/// Loan with computed fields for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub returned_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub days_borrowed: i64,
}

impl From<Loan> for LoanDetails {
    fn from(loan: Loan) -> Self {
        Self {
            is_active: loan.is_active(),
            days_borrowed: loan.days_borrowed(),
            id: loan.id,
            book_id: loan.book_id,
            member_id: loan.member_id,
            start_date: loan.start_date,
            end_date: loan.end_date,
            returned_date: loan.returned_date,
        }
    }
}

/// Loan history filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LoanQuery {
    pub book_id: Option<i64>,
    pub member_id: Option<i64>,
    /// true: only running loans, false: only returned ones
    pub active: Option<bool>,
}

/// Borrow form: the member picked in the borrow view
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowForm {
    pub member_id: String,
}

impl BorrowForm {
    pub fn member_id(&self) -> AppResult<i64> {
        self.member_id.trim().parse::<i64>().map_err(|_| {
            AppError::Validation(format!("member_id must be a number, got '{}'", self.member_id))
        })
    }
}
