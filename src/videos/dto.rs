use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::Video;
use super::youtube::embed_url;

/// Request body for `POST /videos/add`.
#[derive(Debug, Deserialize)]
pub struct AddVideoRequest {
    pub youtube_url: String,
    pub title: String,
    pub description: Option<String>,
}

/// A gallery entry; carries the ready-to-embed player URL.
#[derive(Debug, Serialize)]
pub struct VideoView {
    pub id: i64,
    pub user_id: i64,
    pub youtube_id: String,
    pub embed_url: String,
    pub title: String,
    pub description: Option<String>,
    pub uploaded_at: OffsetDateTime,
}

impl From<Video> for VideoView {
    fn from(v: Video) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            embed_url: embed_url(&v.youtube_id),
            youtube_id: v.youtube_id,
            title: v.title,
            description: v.description,
            uploaded_at: v.uploaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn view_derives_embed_url_from_stored_id() {
        let view = VideoView::from(Video {
            id: 1,
            user_id: 2,
            youtube_url: "https://youtu.be/abc123".into(),
            youtube_id: "abc123".into(),
            title: "Kamp videosu".into(),
            description: None,
            uploaded_at: datetime!(2024-03-10 09:00:00 UTC),
        });
        assert_eq!(view.embed_url, "https://www.youtube.com/embed/abc123");
    }
}
