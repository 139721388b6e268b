use serde::{Deserialize, Serialize};

use super::repo::MessageWithNames;

/// Request body for `POST /messages/send`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    pub subject: Option<String>,
    pub content: String,
}

/// Both mailboxes of the acting user, each newest first.
#[derive(Debug, Serialize)]
pub struct MailboxView {
    pub received: Vec<MessageWithNames>,
    pub sent: Vec<MessageWithNames>,
}
