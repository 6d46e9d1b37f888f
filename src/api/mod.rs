//! HTTP handlers for the Libris endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod members;
pub mod openapi;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Home & health
        .route("/", get(health::home))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search", get(books::search_books))
        .route("/books/update/:id", get(books::edit_book).post(books::update_book))
        .route("/books/delete/:id", get(books::delete_book))
        // Loans
        .route("/books/borrow/:book_id", get(loans::borrow_form).post(loans::borrow_book))
        .route("/books/return/:book_id", get(loans::return_book).post(loans::return_book))
        .route("/loans", get(loans::list_loans))
        .route("/loans/:id", get(loans::get_loan))
        // Members
        .route("/members", get(members::list_members).post(members::create_member))
        .route("/members/update/:id", get(members::edit_member).post(members::update_member))
        .route("/members/delete/:id", get(members::delete_member))
        .route("/members/:id/borrowed_books", get(loans::borrowed_books))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
