//! Member model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Member model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: i64,
    pub name: String,
    /// Unique across members
    pub email: String,
    pub join_date: DateTime<Utc>,
}

/// Create/update member form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MemberForm {
    #[validate(length(min = 1, max = 200, message = "Name is required (max 200 characters)"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

impl MemberForm {
    /// Surrounding whitespace stripped, so a blank name fails validation
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}
