//! Book (catalog) endpoints
//!
//! GET renders a view, POST applies the form and redirects back to the list
//! so a browser refresh does not resubmit it.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookForm, BookQuery, SearchQuery},
};

/// Search results view
#[derive(Serialize, ToSchema)]
pub struct SearchView {
    /// Query as received (empty when absent)
    pub query: String,
    pub results: Vec<Book>,
}

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "All books, by id", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books(&query).await?;
    Ok(Json(books))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to /books"),
        (status = 400, description = "Invalid form")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Redirect> {
    state.services.catalog.create_book(form).await?;
    Ok(Redirect::to("/books"))
}

/// Edit form for a book
#[utoipa::path(
    get,
    path = "/books/update/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book to edit", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn edit_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Apply a book update
#[utoipa::path(
    post,
    path = "/books/update/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirect to /books"),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Form(form): Form<BookForm>,
) -> AppResult<Redirect> {
    state.services.catalog.update_book(id, form).await?;
    Ok(Redirect::to("/books"))
}

/// Delete a book and renumber the remaining ones
#[utoipa::path(
    get,
    path = "/books/delete/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Deleted, redirect to /books"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book has loan history")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    state.services.catalog.delete_book(id).await?;
    Ok(Redirect::to("/books"))
}

/// Search books by title substring or id
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = SearchView)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchView>> {
    let results = state
        .services
        .catalog
        .search_books(params.query.as_deref())
        .await?;

    Ok(Json(SearchView {
        query: params.query.unwrap_or_default(),
        results,
    }))
}
