use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/map", get(handlers::map_view))
        .route("/map/update", post(handlers::update_location))
}
