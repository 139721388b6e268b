use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::{Photo, PhotoTagWithUser};

/// One entry in a gallery listing.
#[derive(Debug, Serialize)]
pub struct PhotoSummary {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub thumbnail: Option<String>,
    pub caption: Option<String>,
    pub uploaded_at: OffsetDateTime,
}

impl From<Photo> for PhotoSummary {
    fn from(p: Photo) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            filename: p.filename,
            thumbnail: p.thumbnail,
            caption: p.caption,
            uploaded_at: p.uploaded_at,
        }
    }
}

/// Photo detail with its tag regions.
#[derive(Debug, Serialize)]
pub struct PhotoView {
    #[serde(flatten)]
    pub photo: PhotoSummary,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<PhotoTagWithUser>,
}

/// JSON body of `POST /photos/:id/tag`.
#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    pub user_id: i64,
    pub shape: String,
    pub coords: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn add_tag_request_deserializes_ajax_payload() {
        let req: AddTagRequest =
            serde_json::from_str(r#"{"user_id": 7, "shape": "rect", "coords": "1,2,3,4"}"#)
                .unwrap();
        assert_eq!(req.user_id, 7);
        assert_eq!(req.shape, "rect");
        assert_eq!(req.coords, "1,2,3,4");
    }

    #[test]
    fn photo_view_flattens_summary_fields() {
        let view = PhotoView {
            photo: PhotoSummary {
                id: 3,
                user_id: 1,
                filename: "deniz_20240501_123045_ab12cd34.jpg".into(),
                thumbnail: Some("thumbnails/thumb_deniz_20240501_123045_ab12cd34.jpg".into()),
                caption: Some("Deniz kenarı".into()),
                uploaded_at: datetime!(2024-05-01 12:30:45 UTC),
            },
            url: "/uploads/deniz_20240501_123045_ab12cd34.jpg".into(),
            thumbnail_url: None,
            tags: vec![],
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["caption"], "Deniz kenarı");
        assert!(json["tags"].as_array().unwrap().is_empty());
    }
}
