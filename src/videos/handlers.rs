use axum::{extract::State, Json};
use tracing::{info, instrument, warn};

use super::dto::{AddVideoRequest, VideoView};
use super::repo;
use super::youtube::extract_youtube_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list_videos(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> Result<Json<Vec<VideoView>>, ApiError> {
    let videos = repo::list_all(&state.db).await?;
    Ok(Json(videos.into_iter().map(VideoView::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn add_video(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<AddVideoRequest>,
) -> Result<Json<VideoView>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }

    let youtube_id = extract_youtube_id(&payload.youtube_url).ok_or_else(|| {
        warn!(url = %payload.youtube_url, "unrecognized video url");
        ApiError::Validation("invalid YouTube URL".into())
    })?;

    let video = repo::insert(
        &state.db,
        actor,
        &payload.youtube_url,
        &youtube_id,
        payload.title.trim(),
        payload.description.as_deref(),
    )
    .await?;

    info!(user_id = actor, video_id = video.id, youtube_id = %video.youtube_id, "video added");
    Ok(Json(VideoView::from(video)))
}
