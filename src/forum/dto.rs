use serde::{Deserialize, Serialize};

use super::repo::{PostWithAuthor, ReplyWithAuthor};

/// Request body for `POST /forum/post`.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Request body for replying under `POST /forum/:id`.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

/// A thread: the post with its replies in posting order.
#[derive(Debug, Serialize)]
pub struct ThreadView {
    pub post: PostWithAuthor,
    pub replies: Vec<ReplyWithAuthor>,
}
