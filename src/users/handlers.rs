use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use tracing::{info, instrument, warn};

use super::dto::{ActivityView, ProfileView, UpdateProfileRequest, UserPublic, GENDERS};
use super::repo::{self, ProfileUpdate};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::media::store_image;
use crate::state::AppState;
use crate::{photos, videos};

fn validate_gender(gender: &Option<String>) -> Result<(), ApiError> {
    match gender {
        Some(g) if !GENDERS.contains(&g.as_str()) => Err(ApiError::Validation(format!(
            "gender must be one of {}",
            GENDERS.join(", ")
        ))),
        _ => Ok(()),
    }
}

#[instrument(skip(state))]
pub async fn list_people(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> Result<Json<Vec<UserPublic>>, ApiError> {
    let users = repo::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserPublic::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ProfileView>, ApiError> {
    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let photos = photos::repo::list_by_user(&state.db, id).await?;
    let videos = videos::repo::list_by_user(&state.db, id).await?;

    Ok(Json(ProfileView {
        user: UserPublic::from(user),
        photos: photos.into_iter().map(Into::into).collect(),
        videos: videos.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserPublic>, ApiError> {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::Validation("name fields are required".into()));
    }
    validate_gender(&payload.gender)?;

    let update = ProfileUpdate {
        first_name: payload.first_name,
        last_name: payload.last_name,
        gender: payload.gender,
        birth_place: payload.birth_place,
        school: payload.school,
        hobbies: payload.hobbies,
        about: payload.about,
        current_location: payload.current_location,
        current_activity: payload.current_activity,
    };
    let user = repo::update_profile(&state.db, actor, &update)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    info!(user_id = actor, "profile updated");
    Ok(Json(UserPublic::from(user)))
}

/// Replaces the profile photo. The thumbnail is best effort: when derivation
/// fails the photo is kept and the old thumbnail reference is cleared.
#[instrument(skip(state, multipart))]
pub async fn update_profile_photo(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UserPublic>, ApiError> {
    let mut upload: Option<(String, bytes::Bytes)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("photo") {
            let original = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "photo".into());
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            upload = Some((original, data));
        }
    }
    let (original, data) = upload.ok_or_else(|| ApiError::Validation("photo is required".into()))?;

    let previous = repo::find_by_id(&state.db, actor)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let stored = store_image(&state, &original, data).await?;
    let user = repo::set_profile_photo(&state.db, actor, &stored.filename, stored.thumbnail.as_deref())
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    // Best-effort cleanup of the replaced files.
    for old in [previous.profile_photo, previous.profile_thumbnail]
        .into_iter()
        .flatten()
    {
        if let Err(e) = state.media.delete(&old).await {
            warn!(error = %e, key = %old, "could not remove replaced profile media");
        }
    }

    info!(user_id = actor, filename = %stored.filename, "profile photo replaced");
    Ok(Json(UserPublic::from(user)))
}

#[instrument(skip(state))]
pub async fn list_activity(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> Result<Json<Vec<ActivityView>>, ApiError> {
    let users = repo::list_with_activity(&state.db).await?;
    Ok(Json(users.into_iter().map(ActivityView::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_validation_accepts_known_values_and_absence() {
        assert!(validate_gender(&None).is_ok());
        for g in GENDERS {
            assert!(validate_gender(&Some(g.to_string())).is_ok());
        }
    }

    #[test]
    fn gender_validation_rejects_unknown_values() {
        assert!(validate_gender(&Some("unknown".into())).is_err());
    }
}
