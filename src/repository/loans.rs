//! Loans repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Executor, Pool, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, LoanQuery, NewLoan},
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// List loans matching the filters, oldest first
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<Loan>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM loans WHERE 1=1");

        if let Some(book_id) = query.book_id {
            builder.push(" AND book_id = ").push_bind(book_id);
        }
        if let Some(member_id) = query.member_id {
            builder.push(" AND member_id = ").push_bind(member_id);
        }
        match query.active {
            Some(true) => {
                builder.push(" AND returned_date IS NULL");
            }
            Some(false) => {
                builder.push(" AND returned_date IS NOT NULL");
            }
            None => {}
        }
        builder.push(" ORDER BY start_date, id");

        let loans = builder
            .build_query_as::<Loan>()
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    /// Books currently lent to a member
    pub async fn books_lent_to(&self, member_id: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.* FROM loans l
            JOIN books b ON b.id = l.book_id
            WHERE l.member_id = ? AND l.returned_date IS NULL
            ORDER BY l.start_date, l.id
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// First active loan of a book, by start date then id
    pub async fn find_active_for_book(
        conn: &mut SqliteConnection,
        book_id: i64,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE book_id = ? AND returned_date IS NULL
            ORDER BY start_date, id
            LIMIT 1
            "#,
        )
        .bind(book_id)
        .fetch_optional(conn)
        .await?;
        Ok(loan)
    }

    pub async fn insert(conn: &mut SqliteConnection, loan: &NewLoan) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, member_id, start_date, end_date)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(loan.book_id)
        .bind(loan.member_id)
        .bind(loan.start_date)
        .bind(loan.end_date)
        .fetch_one(conn)
        .await?;
        Ok(loan)
    }

    /// Close the first active loan of a book: the end date becomes the
    /// actual return time. `None` when the book has no active loan.
    pub async fn close_first_active(
        conn: &mut SqliteConnection,
        book_id: i64,
        returned_at: DateTime<Utc>,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET end_date = ?, returned_date = ?
            WHERE id = (
                SELECT id FROM loans
                WHERE book_id = ? AND returned_date IS NULL
                ORDER BY start_date, id
                LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(returned_at)
        .bind(returned_at)
        .bind(book_id)
        .fetch_optional(conn)
        .await?;
        Ok(loan)
    }

    pub async fn count_for_book<'e, E>(executor: E, book_id: i64) -> AppResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn count_for_member<'e, E>(executor: E, member_id: i64) -> AppResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE member_id = ?")
            .bind(member_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE returned_date IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
