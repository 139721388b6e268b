use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/forum", get(handlers::list_posts))
        .route("/forum/post", post(handlers::create_post))
        .route(
            "/forum/:id",
            get(handlers::view_post).post(handlers::reply_to_post),
        )
}
