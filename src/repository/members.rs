//! Members repository for database operations

use chrono::Utc;
use sqlx::{Executor, Pool, Sqlite};

use super::loans::LoansRepository;
use crate::{
    error::{AppError, AppResult},
    models::member::{Member, MemberForm},
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Sqlite>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn find<'e, E>(executor: E, id: i64) -> AppResult<Option<Member>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(member)
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Member> {
        Self::find(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// List all members
    pub async fn list(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE LOWER(email) = LOWER(?) AND id != ?",
        )
        .bind(email)
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Create a member joining now
    pub async fn create(&self, data: &MemberForm) -> AppResult<Member> {
        if self.email_exists(&data.email, None).await? {
            return Err(AppError::Conflict(format!("Email {} is already registered", data.email)));
        }

        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, join_date)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &data.email))?;
        Ok(member)
    }

    /// Update name and email
    pub async fn update(&self, id: i64, data: &MemberForm) -> AppResult<Member> {
        self.get_by_id(id).await?;

        if self.email_exists(&data.email, Some(id)).await? {
            return Err(AppError::Conflict(format!("Email {} is already registered", data.email)));
        }

        sqlx::query_as::<_, Member>(
            "UPDATE members SET name = ?, email = ? WHERE id = ? RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &data.email))?
        .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Delete a member without loan history. Ids are not renumbered.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        if LoansRepository::count_for_member(&mut *tx, id).await? > 0 {
            return Err(AppError::Conflict(format!(
                "Member {} has loan history and cannot be deleted",
                id
            )));
        }

        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member with id {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// The existence check and the write are separate statements, so a
/// concurrent registration can still reach the UNIQUE constraint.
fn duplicate_email(error: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return AppError::Conflict(format!("Email {} is already registered", email));
        }
    }
    AppError::Database(error)
}
