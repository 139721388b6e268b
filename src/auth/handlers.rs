use axum::{
    extract::{FromRef, State},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::dto::{AuthResponse, LoginRequest, RegisterRequest};
use super::jwt::{AuthUser, JwtKeys};
use super::password::{hash_password, verify_password};
use crate::error::{violated_constraint, ApiError};
use crate::state::AppState;
use crate::users::dto::{UserPublic, GENDERS};
use crate::users::repo::{self, NewUser};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.username.len() < 3 {
        return Err(ApiError::Validation(
            "username must be at least 3 characters".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::Validation("name fields are required".into()));
    }
    if let Some(g) = &payload.gender {
        if !GENDERS.contains(&g.as_str()) {
            return Err(ApiError::Validation(format!(
                "gender must be one of {}",
                GENDERS.join(", ")
            )));
        }
    }

    if repo::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::DuplicateUsername);
    }
    if repo::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;
    let user = repo::create(
        &state.db,
        NewUser {
            username: &payload.username,
            email: &payload.email,
            password_hash: &hash,
            first_name: &payload.first_name,
            last_name: &payload.last_name,
            gender: payload.gender.as_deref(),
            birth_place: payload.birth_place.as_deref(),
            school: payload.school.as_deref(),
            hobbies: payload.hobbies.as_deref(),
            about: payload.about.as_deref(),
        },
    )
    .await
    .map_err(|e| {
        // Concurrent registrations can still trip the unique index after the
        // pre-insert checks passed.
        match violated_constraint(&e).as_deref() {
            Some("users_username_key") => ApiError::DuplicateUsername,
            Some("users_email_key") => ApiError::DuplicateEmail,
            _ => ApiError::Database(e),
        }
    })?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, false)?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(AuthResponse {
        token,
        user: UserPublic::from(user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let username = payload.username.trim();

    // One generic failure for unknown user and wrong password alike, so the
    // endpoint cannot be used to enumerate usernames.
    let user = repo::find_by_username(&state.db, username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, payload.remember)?;

    info!(user_id = user.id, remember = payload.remember, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: UserPublic::from(user),
    }))
}

/// Sessions are stateless bearer tokens; logout is an acknowledgment that
/// lets clients drop theirs.
#[instrument]
pub async fn logout(AuthUser(actor): AuthUser) -> Json<Value> {
    info!(user_id = actor, "user logged out");
    Json(json!({ "success": true }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<UserPublic>, ApiError> {
    let user = repo::find_by_id(&state.db, actor)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(UserPublic::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b@dept.example.edu.tr"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
    }
}
