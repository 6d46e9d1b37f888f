//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Consecutive identifier, reassigned after every delete
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Publication year
    pub year: Option<i32>,
    /// False while the book is out on an active loan
    pub is_available: bool,
}

/// Create/update book form, as posted by the browser
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author is required (max 100 characters)"))]
    pub author: String,
    #[validate(length(min = 1, max = 50, message = "Genre is required (max 50 characters)"))]
    pub genre: String,
    /// Publication year; an empty field means unknown
    #[serde(default)]
    pub year: Option<String>,
}

impl BookForm {
    /// Surrounding whitespace stripped, so a blank field fails `length(min = 1)`
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            genre: self.genre.trim().to_string(),
            year: self.year.map(|year| year.trim().to_string()),
        }
    }
}

/// Validated book fields ready for the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: Option<i32>,
}

impl TryFrom<BookForm> for BookInput {
    type Error = AppError;

    fn try_from(form: BookForm) -> AppResult<Self> {
        let form = form.trimmed();
        form.validate()?;

        let year = match form.year.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                AppError::Validation(format!("Year must be a whole number, got '{}'", raw))
            })?),
        };

        Ok(Self {
            title: form.title,
            author: form.author,
            genre: form.genre,
            year,
        })
    }
}

/// Book list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Only books with this availability
    pub available: Option<bool>,
}

/// Book search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Title substring (case-insensitive) or exact book id
    pub query: Option<String>,
}
