use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::dto::{AddTagRequest, PhotoSummary, PhotoView};
use super::repo;
use super::tags::{can_delete_tag, TagShape};
use crate::auth::AuthUser;
use crate::error::{violated_constraint, ApiError};
use crate::media::store_image;
use crate::state::AppState;
use crate::users;

#[instrument(skip(state))]
pub async fn list_photos(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> Result<Json<Vec<PhotoSummary>>, ApiError> {
    let photos = repo::list_all(&state.db).await?;
    Ok(Json(photos.into_iter().map(PhotoSummary::from).collect()))
}

/// Multipart upload: `photo` (file) plus optional `caption` text field.
#[instrument(skip(state, multipart))]
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<PhotoSummary>, ApiError> {
    let mut upload: Option<(String, bytes::Bytes)> = None;
    let mut caption: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("photo") => {
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
            Some("caption") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                if !text.is_empty() {
                    caption = Some(text);
                }
            }
            _ => {}
        }
    }

    let (original, data) = upload.ok_or_else(|| ApiError::Validation("photo is required".into()))?;
    let stored = store_image(&state, &original, data).await?;

    let photo = repo::insert(
        &state.db,
        actor,
        &stored.filename,
        stored.thumbnail.as_deref(),
        caption.as_deref(),
    )
    .await?;

    info!(user_id = actor, photo_id = photo.id, filename = %photo.filename, "photo uploaded");
    Ok(Json(PhotoSummary::from(photo)))
}

#[instrument(skip(state))]
pub async fn photo_detail(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(photo_id): Path<i64>,
) -> Result<Json<PhotoView>, ApiError> {
    let photo = repo::find_by_id(&state.db, photo_id)
        .await?
        .ok_or(ApiError::NotFound("photo"))?;
    let tags = repo::list_tags_with_users(&state.db, photo_id).await?;

    let url = state
        .media
        .url(&photo.filename)
        .await
        .map_err(ApiError::ExternalService)?;
    let thumbnail_url = match &photo.thumbnail {
        Some(key) => Some(
            state
                .media
                .url(key)
                .await
                .map_err(ApiError::ExternalService)?,
        ),
        None => None,
    };

    Ok(Json(PhotoView {
        photo: PhotoSummary::from(photo),
        url,
        thumbnail_url,
        tags,
    }))
}

/// Names the row a tag-insert foreign-key violation points at. The photo or
/// the tagged user can be deleted between the existence checks and the
/// insert; the tripped constraint tells which one went away.
fn tag_constraint_target(constraint: Option<&str>) -> Option<&'static str> {
    match constraint {
        Some("photo_tags_photo_id_fkey") => Some("photo"),
        Some("photo_tags_tagged_user_id_fkey") => Some("user"),
        _ => None,
    }
}

/// Adds a region tag. The same user may be tagged any number of times and
/// overlapping regions are allowed.
#[instrument(skip(state, payload))]
pub async fn add_tag(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(photo_id): Path<i64>,
    Json(payload): Json<AddTagRequest>,
) -> Result<Json<Value>, ApiError> {
    let shape = TagShape::parse(&payload.shape, &payload.coords)?;

    repo::find_by_id(&state.db, photo_id)
        .await?
        .ok_or(ApiError::NotFound("photo"))?;
    if !users::repo::exists(&state.db, payload.user_id).await? {
        return Err(ApiError::NotFound("user"));
    }

    let tag = repo::insert_tag(
        &state.db,
        photo_id,
        payload.user_id,
        shape.name(),
        &shape.coords_string(),
    )
    .await
    .map_err(
        |e| match tag_constraint_target(violated_constraint(&e).as_deref()) {
            Some(what) => ApiError::NotFound(what),
            None => ApiError::Database(e),
        },
    )?;

    info!(
        user_id = actor,
        photo_id,
        tag_id = tag.id,
        shape = shape.name(),
        "photo tag added"
    );
    Ok(Json(json!({ "success": true, "tag_id": tag.id })))
}

#[instrument(skip(state))]
pub async fn delete_tag(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((photo_id, tag_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    let photo = repo::find_by_id(&state.db, photo_id)
        .await?
        .ok_or(ApiError::NotFound("photo"))?;
    let tag = repo::find_tag(&state.db, tag_id)
        .await?
        .filter(|t| t.photo_id == photo_id)
        .ok_or(ApiError::NotFound("tag"))?;

    if !can_delete_tag(actor, photo.user_id, tag.tagged_user_id) {
        return Err(ApiError::PermissionDenied);
    }

    repo::delete_tag(&state.db, tag_id).await?;
    info!(user_id = actor, photo_id, tag_id, "photo tag deleted");
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_fk_violations_map_to_the_missing_row() {
        assert_eq!(
            tag_constraint_target(Some("photo_tags_photo_id_fkey")),
            Some("photo")
        );
        assert_eq!(
            tag_constraint_target(Some("photo_tags_tagged_user_id_fkey")),
            Some("user")
        );
    }

    #[test]
    fn other_database_errors_stay_database_errors() {
        assert_eq!(tag_constraint_target(Some("photo_tags_pkey")), None);
        assert_eq!(tag_constraint_target(None), None);
    }
}
