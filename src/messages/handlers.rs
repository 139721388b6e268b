use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info, instrument};

use super::dto::{MailboxView, SendMessageRequest};
use super::repo::{self, Message, MessageWithNames};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users;

#[instrument(skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<MailboxView>, ApiError> {
    let received = repo::list_received(&state.db, actor).await?;
    let sent = repo::list_sent(&state.db, actor).await?;
    Ok(Json(MailboxView { received, sent }))
}

#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("message content is required".into()));
    }
    if payload.recipient_id == actor {
        return Err(ApiError::Validation(
            "cannot send a message to yourself".into(),
        ));
    }
    if !users::repo::exists(&state.db, payload.recipient_id).await? {
        return Err(ApiError::NotFound("user"));
    }

    let message = repo::insert(
        &state.db,
        actor,
        payload.recipient_id,
        payload.subject.as_deref(),
        content,
    )
    .await?;

    info!(
        user_id = actor,
        recipient_id = payload.recipient_id,
        message_id = message.id,
        "message sent"
    );
    Ok(Json(message))
}

/// Opening a message flips its read flag only when the viewer is the
/// recipient and the flag is still clear. The sender never flips it.
fn should_mark_read(actor: i64, message: &MessageWithNames) -> bool {
    actor == message.recipient_id && !message.is_read
}

/// Only the sender or the recipient may open a message. Opening one as the
/// recipient marks it read; repeat views and sender views change nothing.
#[instrument(skip(state))]
pub async fn view_message(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(message_id): Path<i64>,
) -> Result<Json<MessageWithNames>, ApiError> {
    let mut message = repo::find_by_id(&state.db, message_id)
        .await?
        .ok_or(ApiError::NotFound("message"))?;

    if actor != message.sender_id && actor != message.recipient_id {
        return Err(ApiError::PermissionDenied);
    }

    if should_mark_read(actor, &message) {
        let updated = repo::mark_read(&state.db, message_id, actor).await?;
        if updated > 0 {
            debug!(message_id, "message marked read");
            message.is_read = true;
        }
    }

    Ok(Json(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn message(sender_id: i64, recipient_id: i64, is_read: bool) -> MessageWithNames {
        MessageWithNames {
            id: 1,
            sender_id,
            sender_username: "ayse".into(),
            recipient_id,
            recipient_username: "mehmet".into(),
            subject: Some("hi".into()),
            content: "hello".into(),
            is_read,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn recipient_first_view_marks_read() {
        assert!(should_mark_read(2, &message(1, 2, false)));
    }

    #[test]
    fn repeat_views_change_nothing() {
        assert!(!should_mark_read(2, &message(1, 2, true)));
    }

    #[test]
    fn sender_view_never_marks_read() {
        assert!(!should_mark_read(1, &message(1, 2, false)));
        assert!(!should_mark_read(1, &message(1, 2, true)));
    }
}
