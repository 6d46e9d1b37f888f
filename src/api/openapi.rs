//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, members};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.1.0",
        description = "Library loan record keeper: books, members and loans",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Home & health
        health::home,
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::create_book,
        books::edit_book,
        books::update_book,
        books::delete_book,
        books::search_books,
        // Members
        members::list_members,
        members::create_member,
        members::edit_member,
        members::update_member,
        members::delete_member,
        // Loans
        loans::borrow_form,
        loans::borrow_book,
        loans::return_book,
        loans::borrowed_books,
        loans::list_loans,
        loans::get_loan,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookForm,
            books::SearchView,
            // Members
            crate::models::member::Member,
            crate::models::member::MemberForm,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::BorrowForm,
            loans::BorrowView,
            loans::BorrowedBooksView,
            // Home & health
            health::HomeView,
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Home and health check endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "members", description = "Member management"),
        (name = "loans", description = "Borrowing and returning books")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
