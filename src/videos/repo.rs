use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Video record in the database; the raw URL and the extracted platform id
/// are both kept.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    pub id: i64,
    pub user_id: i64,
    pub youtube_url: String,
    pub youtube_id: String,
    pub title: String,
    pub description: Option<String>,
    pub uploaded_at: OffsetDateTime,
}

pub async fn insert(
    db: &PgPool,
    user_id: i64,
    youtube_url: &str,
    youtube_id: &str,
    title: &str,
    description: Option<&str>,
) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        r#"
        INSERT INTO videos (user_id, youtube_url, youtube_id, title, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(youtube_url)
    .bind(youtube_id)
    .bind(title)
    .bind(description)
    .fetch_one(db)
    .await
}

pub async fn list_all(db: &PgPool) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(r#"SELECT * FROM videos ORDER BY uploaded_at DESC"#)
        .fetch_all(db)
        .await
}

pub async fn list_by_user(db: &PgPool, user_id: i64) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        r#"SELECT * FROM videos WHERE user_id = $1 ORDER BY uploaded_at DESC"#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}
