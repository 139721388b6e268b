use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Private message record; a directed edge between two users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub subject: Option<String>,
    pub content: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

/// Message joined with both parties' usernames for mailbox views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageWithNames {
    pub id: i64,
    pub sender_id: i64,
    pub sender_username: String,
    pub recipient_id: i64,
    pub recipient_username: String,
    pub subject: Option<String>,
    pub content: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

const MESSAGE_WITH_NAMES: &str = r#"
    SELECT m.id, m.sender_id, s.username AS sender_username,
           m.recipient_id, r.username AS recipient_username,
           m.subject, m.content, m.is_read, m.created_at
    FROM messages m
    JOIN users s ON s.id = m.sender_id
    JOIN users r ON r.id = m.recipient_id
"#;

pub async fn insert(
    db: &PgPool,
    sender_id: i64,
    recipient_id: i64,
    subject: Option<&str>,
    content: &str,
) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (sender_id, recipient_id, subject, content)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(sender_id)
    .bind(recipient_id)
    .bind(subject)
    .bind(content)
    .fetch_one(db)
    .await
}

fn received_sql() -> String {
    format!(
        "{} WHERE m.recipient_id = $1 ORDER BY m.created_at DESC",
        MESSAGE_WITH_NAMES
    )
}

fn sent_sql() -> String {
    format!(
        "{} WHERE m.sender_id = $1 ORDER BY m.created_at DESC",
        MESSAGE_WITH_NAMES
    )
}

pub async fn list_received(
    db: &PgPool,
    user_id: i64,
) -> Result<Vec<MessageWithNames>, sqlx::Error> {
    sqlx::query_as::<_, MessageWithNames>(&received_sql())
        .bind(user_id)
        .fetch_all(db)
        .await
}

pub async fn list_sent(db: &PgPool, user_id: i64) -> Result<Vec<MessageWithNames>, sqlx::Error> {
    sqlx::query_as::<_, MessageWithNames>(&sent_sql())
        .bind(user_id)
        .fetch_all(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<MessageWithNames>, sqlx::Error> {
    sqlx::query_as::<_, MessageWithNames>(&format!("{} WHERE m.id = $1", MESSAGE_WITH_NAMES))
        .bind(id)
        .fetch_optional(db)
        .await
}

const MARK_READ: &str = r#"
    UPDATE messages
    SET is_read = TRUE
    WHERE id = $1 AND recipient_id = $2 AND is_read = FALSE
"#;

/// Flips the read flag, but only for the recipient and only once; repeat
/// views and sender views match zero rows.
pub async fn mark_read(db: &PgPool, message_id: i64, recipient_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(MARK_READ)
        .bind(message_id)
        .bind(recipient_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailbox_listings_are_newest_first() {
        assert!(received_sql().trim_end().ends_with("ORDER BY m.created_at DESC"));
        assert!(sent_sql().trim_end().ends_with("ORDER BY m.created_at DESC"));
    }

    #[test]
    fn mailbox_listings_filter_on_the_right_party() {
        assert!(received_sql().contains("m.recipient_id = $1"));
        assert!(sent_sql().contains("m.sender_id = $1"));
    }

    #[test]
    fn mark_read_touches_only_the_recipients_unread_row() {
        assert!(MARK_READ.contains("recipient_id = $2"));
        assert!(MARK_READ.contains("is_read = FALSE"));
    }
}
