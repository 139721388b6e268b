use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod tags;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/photos", get(handlers::list_photos))
        .route("/photos/upload", post(handlers::upload_photo))
        .route("/photos/:id", get(handlers::photo_detail))
        .route("/photos/:id/tag", post(handlers::add_tag))
        .route("/photos/:id/tag/:tag_id", delete(handlers::delete_tag))
}
