use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, authors, books, lending, loans, members};

/// Creates the API router with all library endpoints
///
/// Lending workflow:
/// - POST /books/:id/loan - Loan a book to a member
/// - POST /books/:id/return_book - Return a loaned book
/// - POST /loans/:id/extend_due_date - Push a loan's due date back
/// - GET /members/top-active - Members with the most active loans
///
/// Catalog CRUD (list/create on the collection; get/put/patch/delete on an item):
/// - /authors, /books, /members, /loans
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Lending workflow
        .route("/books/:id/loan", post(lending::loan_book))
        .route("/books/:id/return_book", post(lending::return_book))
        .route("/loans/:id/extend_due_date", post(lending::extend_due_date))
        .route("/members/top-active", get(members::top_active_members))
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::replace_author)
                .patch(authors::patch_author)
                .delete(authors::delete_author),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::replace_book)
                .patch(books::patch_book)
                .delete(books::delete_book),
        )
        // Members
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/:id",
            get(members::get_member)
                .put(members::replace_member)
                .patch(members::patch_member)
                .delete(members::delete_member),
        )
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::create_loan))
        .route(
            "/loans/:id",
            get(loans::get_loan)
                .put(loans::replace_loan)
                .patch(loans::patch_loan)
                .delete(loans::delete_loan),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
