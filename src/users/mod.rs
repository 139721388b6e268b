use axum::routing::{get, put};
use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/people", get(handlers::list_people))
        .route("/profile/:id", get(handlers::get_profile))
        .route("/profile", put(handlers::update_profile))
        .route("/profile/photo", put(handlers::update_profile_photo))
        .route("/activity", get(handlers::list_activity))
}
