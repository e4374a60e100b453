use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_borrow, get_borrow_record, list_member_borrows, member_outstanding_fines,
    return_borrow,
};

/// Creates the API router with all borrowing endpoints
///
/// Command endpoints (Write operations):
/// - POST /borrows - Create a new borrow transaction
/// - POST /borrows/:id/return - Complete a return
///
/// Query endpoints (Read operations):
/// - GET /borrows/:id - Get a borrow record
/// - GET /members/:id/borrows - List a member's borrow history
/// - GET /members/:id/fines - Compute a member's outstanding fines
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Command endpoints (Write operations)
        .route("/borrows", post(create_borrow))
        .route("/borrows/:id/return", post(return_borrow))
        // Query endpoints (Read operations)
        .route("/borrows/:id", get(get_borrow_record))
        .route("/members/:id/borrows", get(list_member_borrows))
        .route("/members/:id/fines", get(member_outstanding_fines))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
