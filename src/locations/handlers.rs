use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::repo::{self, LocationWithUser};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// JSON body of `POST /map/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ApiError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ApiError::Validation("latitude out of range".into()));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ApiError::Validation("longitude out of range".into()));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn map_view(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> Result<Json<Vec<LocationWithUser>>, ApiError> {
    Ok(Json(repo::list_all(&state.db).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_location(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_coordinates(payload.latitude, payload.longitude)?;

    repo::upsert(
        &state.db,
        actor,
        payload.latitude,
        payload.longitude,
        payload.address.as_deref(),
    )
    .await?;

    info!(user_id = actor, "location updated");
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_world_coordinates() {
        assert!(validate_coordinates(40.9929, 29.1244).is_ok()); // Sakarya-ish
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_or_non_finite() {
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, 181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }
}
