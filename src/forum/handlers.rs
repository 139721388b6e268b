use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::dto::{CreatePostRequest, ReplyRequest, ThreadView};
use super::repo::{self, ForumPost, PostWithAuthor};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

// Matches the original forms: posts need some substance, replies a little.
const MIN_POST_CONTENT: usize = 10;
const MIN_REPLY_CONTENT: usize = 5;

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError> {
    Ok(Json(repo::list_posts(&state.db).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<ForumPost>, ApiError> {
    let title = payload.title.trim();
    let content = payload.content.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    if content.chars().count() < MIN_POST_CONTENT {
        return Err(ApiError::Validation(format!(
            "content must be at least {} characters",
            MIN_POST_CONTENT
        )));
    }

    let post = repo::insert_post(&state.db, actor, title, content).await?;
    info!(user_id = actor, post_id = post.id, "forum post created");
    Ok(Json(post))
}

#[instrument(skip(state))]
pub async fn view_post(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ThreadView>, ApiError> {
    let post = repo::find_post(&state.db, post_id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let replies = repo::list_replies(&state.db, post_id).await?;
    Ok(Json(ThreadView { post, replies }))
}

#[instrument(skip(state, payload))]
pub async fn reply_to_post(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(post_id): Path<i64>,
    Json(payload): Json<ReplyRequest>,
) -> Result<Json<ThreadView>, ApiError> {
    let content = payload.content.trim();
    if content.chars().count() < MIN_REPLY_CONTENT {
        return Err(ApiError::Validation(format!(
            "reply must be at least {} characters",
            MIN_REPLY_CONTENT
        )));
    }

    let post = repo::find_post(&state.db, post_id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let reply_id = repo::insert_reply(&state.db, post_id, actor, content).await?;
    info!(user_id = actor, post_id, reply_id, "forum reply added");

    let replies = repo::list_replies(&state.db, post_id).await?;
    Ok(Json(ThreadView { post, replies }))
}
