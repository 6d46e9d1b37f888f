//! Books repository for database operations

use sqlx::{Executor, Pool, Sqlite, SqliteConnection};

use super::loans::LoansRepository;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput, BookQuery},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Fetch a book on any executor (pool or open transaction)
    pub async fn find<'e, E>(executor: E, id: i64) -> AppResult<Option<Book>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(book)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        Self::find(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books, optionally filtered by availability
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let books = match query.available {
            Some(available) => {
                sqlx::query_as::<_, Book>("SELECT * FROM books WHERE is_available = ? ORDER BY id")
                    .bind(available)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(books)
    }

    /// Books whose title contains `query` (case-insensitive) or whose id reads as `query`
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE instr(lower(title), lower(?)) > 0
               OR CAST(id AS TEXT) = ?
            ORDER BY id
            "#,
        )
        .bind(query)
        .bind(query)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Create a new, available book
    pub async fn create(&self, data: &BookInput) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, genre, year, is_available)
            VALUES (?, ?, ?, ?, 1)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.genre)
        .bind(data.year)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    /// Update bibliographic fields; availability is left alone
    pub async fn update(&self, id: i64, data: &BookInput) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = ?, author = ?, genre = ?, year = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.genre)
        .bind(data.year)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book, then renumber the remaining ones from 1.
    ///
    /// Both steps share one transaction. Books with loan history are kept,
    /// since loan rows are never deleted.
    pub async fn delete(&self, id: i64) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        if Self::find(&mut *tx, id).await?.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        if LoansRepository::count_for_book(&mut *tx, id).await? > 0 {
            return Err(AppError::Conflict(format!(
                "Book {} has loan history and cannot be deleted",
                id
            )));
        }

        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let moved = Self::renumber(&mut tx).await?;

        tx.commit().await?;
        Ok(moved)
    }

    /// Reassign ids to 1..=n in current id order. Returns how many rows moved.
    ///
    /// Rows are visited in ascending order, so a new id is always free when
    /// it is assigned. Loans follow through `ON UPDATE CASCADE`.
    pub async fn renumber(conn: &mut SqliteConnection) -> AppResult<u64> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM books ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;

        let mut moved = 0;
        for (new_id, old_id) in (1_i64..).zip(ids) {
            if new_id == old_id {
                continue;
            }
            sqlx::query("UPDATE books SET id = ? WHERE id = ?")
                .bind(new_id)
                .bind(old_id)
                .execute(&mut *conn)
                .await?;
            moved += 1;
        }

        Ok(moved)
    }

    /// Flip an available book to lent. Returns false when it was already lent.
    pub async fn mark_unavailable(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE books SET is_available = 0 WHERE id = ? AND is_available = 1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn mark_available(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE books SET is_available = 1 WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
