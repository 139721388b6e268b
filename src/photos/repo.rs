use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Photo record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub thumbnail: Option<String>,
    pub caption: Option<String>,
    pub uploaded_at: OffsetDateTime,
}

/// Region-tag record on a photo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PhotoTag {
    pub id: i64,
    pub photo_id: i64,
    pub tagged_user_id: i64,
    pub shape: String,
    pub coords: String,
    pub created_at: OffsetDateTime,
}

/// Tag joined with the tagged user's display fields, for photo detail pages.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PhotoTagWithUser {
    pub id: i64,
    pub tagged_user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub shape: String,
    pub coords: String,
}

pub async fn insert(
    db: &PgPool,
    user_id: i64,
    filename: &str,
    thumbnail: Option<&str>,
    caption: Option<&str>,
) -> Result<Photo, sqlx::Error> {
    sqlx::query_as::<_, Photo>(
        r#"
        INSERT INTO photos (user_id, filename, thumbnail, caption)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(filename)
    .bind(thumbnail)
    .bind(caption)
    .fetch_one(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Photo>, sqlx::Error> {
    sqlx::query_as::<_, Photo>(r#"SELECT * FROM photos WHERE id = $1"#)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_all(db: &PgPool) -> Result<Vec<Photo>, sqlx::Error> {
    sqlx::query_as::<_, Photo>(r#"SELECT * FROM photos ORDER BY uploaded_at DESC"#)
        .fetch_all(db)
        .await
}

pub async fn list_by_user(db: &PgPool, user_id: i64) -> Result<Vec<Photo>, sqlx::Error> {
    sqlx::query_as::<_, Photo>(
        r#"SELECT * FROM photos WHERE user_id = $1 ORDER BY uploaded_at DESC"#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn insert_tag(
    db: &PgPool,
    photo_id: i64,
    tagged_user_id: i64,
    shape: &str,
    coords: &str,
) -> Result<PhotoTag, sqlx::Error> {
    sqlx::query_as::<_, PhotoTag>(
        r#"
        INSERT INTO photo_tags (photo_id, tagged_user_id, shape, coords)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(photo_id)
    .bind(tagged_user_id)
    .bind(shape)
    .bind(coords)
    .fetch_one(db)
    .await
}

pub async fn find_tag(db: &PgPool, tag_id: i64) -> Result<Option<PhotoTag>, sqlx::Error> {
    sqlx::query_as::<_, PhotoTag>(r#"SELECT * FROM photo_tags WHERE id = $1"#)
        .bind(tag_id)
        .fetch_optional(db)
        .await
}

pub async fn delete_tag(db: &PgPool, tag_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM photo_tags WHERE id = $1"#)
        .bind(tag_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_tags_with_users(
    db: &PgPool,
    photo_id: i64,
) -> Result<Vec<PhotoTagWithUser>, sqlx::Error> {
    sqlx::query_as::<_, PhotoTagWithUser>(
        r#"
        SELECT t.id, t.tagged_user_id, u.username, u.first_name, u.last_name,
               t.shape, t.coords
        FROM photo_tags t
        JOIN users u ON u.id = t.tagged_user_id
        WHERE t.photo_id = $1
        ORDER BY t.created_at ASC
        "#,
    )
    .bind(photo_id)
    .fetch_all(db)
    .await
}
