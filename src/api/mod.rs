//! JSON API routes.
//!
//! The pipeline treats every route the same way; these handlers only need to
//! return `Result<_, AppError>` for failures to be logged and rendered.

pub mod boards;

use axum::{routing::get, Router};

use crate::http::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/boards", get(boards::list_boards).post(boards::create_board))
        .route(
            "/api/boards/{id}",
            get(boards::get_board).delete(boards::delete_board),
        )
}
