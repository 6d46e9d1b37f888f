//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{Book, BookForm, BookInput, BookQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Search by title substring or exact id; a missing query matches every title
    pub async fn search_books(&self, query: Option<&str>) -> AppResult<Vec<Book>> {
        self.repository.books.search(query.unwrap_or_default()).await
    }

    pub async fn create_book(&self, form: BookForm) -> AppResult<Book> {
        let input = BookInput::try_from(form)?;
        let book = self.repository.books.create(&input).await?;
        tracing::info!("Book {} created: {}", book.id, book.title);
        Ok(book)
    }

    pub async fn update_book(&self, id: i64, form: BookForm) -> AppResult<Book> {
        let input = BookInput::try_from(form)?;
        self.repository.books.update(id, &input).await
    }

    /// Delete a book and close the gap in the id sequence
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let moved = self.repository.books.delete(id).await?;
        tracing::info!("Book {} deleted, {} book id(s) reassigned", id, moved);
        Ok(())
    }
}
