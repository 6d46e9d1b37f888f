//! Loan endpoints: borrow, return, borrowed books and loan history

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::Book,
        loan::{BorrowForm, LoanDetails, LoanQuery},
        member::Member,
    },
};

/// Borrow form view: the book and the members to pick from
#[derive(Serialize, ToSchema)]
pub struct BorrowView {
    pub book: Book,
    pub members: Vec<Member>,
}

/// Books a member currently holds
#[derive(Serialize, ToSchema)]
pub struct BorrowedBooksView {
    pub member: Member,
    pub books: Vec<Book>,
}

/// Borrow form for a book
#[utoipa::path(
    get,
    path = "/books/borrow/{book_id}",
    tag = "loans",
    params(("book_id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Borrow form", body = BorrowView),
        (status = 404, description = "Book not found")
    )
)]
pub async fn borrow_form(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i64>,
) -> AppResult<Json<BorrowView>> {
    let book = state.services.catalog.get_book(book_id).await?;
    let members = state.services.members.list().await?;
    Ok(Json(BorrowView { book, members }))
}

/// Lend a book to the member picked in the form
#[utoipa::path(
    post,
    path = "/books/borrow/{book_id}",
    tag = "loans",
    params(("book_id" = i64, Path, description = "Book ID")),
    request_body(content = BorrowForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Loan created, redirect to /books"),
        (status = 400, description = "Invalid member id"),
        (status = 404, description = "Book or member not found"),
        (status = 409, description = "Book already on loan")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i64>,
    Form(form): Form<BorrowForm>,
) -> AppResult<Redirect> {
    let member_id = form.member_id()?;
    state.services.loans.borrow(book_id, member_id).await?;
    Ok(Redirect::to("/books"))
}

/// Return a book (also bound to POST). Nothing happens if it is not lent.
#[utoipa::path(
    get,
    path = "/books/return/{book_id}",
    tag = "loans",
    params(("book_id" = i64, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Returned (or not lent), redirect to /books"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i64>,
) -> AppResult<Redirect> {
    state.services.loans.return_book(book_id).await?;
    Ok(Redirect::to("/books"))
}

/// Books on active loan to a member
#[utoipa::path(
    get,
    path = "/members/{id}/borrowed_books",
    tag = "loans",
    params(("id" = i64, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member and borrowed books", body = BorrowedBooksView),
        (status = 404, description = "Member not found")
    )
)]
pub async fn borrowed_books(
    State(state): State<crate::AppState>,
    Path(member_id): Path<i64>,
) -> AppResult<Json<BorrowedBooksView>> {
    let (member, books) = state.services.loans.borrowed_books(member_id).await?;
    Ok(Json(BorrowedBooksView { member, books }))
}

/// Loan history
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "Loans, oldest first", body = Vec<LoanDetails>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list(&query).await?;
    Ok(Json(loans))
}

/// One loan
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = i64, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get(id).await?;
    Ok(Json(loan))
}
