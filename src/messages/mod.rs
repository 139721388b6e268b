use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(handlers::list_messages))
        .route("/messages/send", post(handlers::send_message))
        .route("/messages/:id", get(handlers::view_message))
}
