use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod youtube;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/videos", get(handlers::list_videos))
        .route("/videos/add", post(handlers::add_video))
}
