use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Forum post record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ForumPost {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Post joined with its author's display fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostWithAuthor {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub content: String,
    pub created_at: OffsetDateTime,
}

/// Reply joined with its author's display fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReplyWithAuthor {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub content: String,
    pub created_at: OffsetDateTime,
}

const POST_WITH_AUTHOR: &str = r#"
    SELECT p.id, p.user_id, u.username, u.first_name, u.last_name,
           p.title, p.content, p.created_at
    FROM forum_posts p
    JOIN users u ON u.id = p.user_id
"#;

pub async fn insert_post(
    db: &PgPool,
    user_id: i64,
    title: &str,
    content: &str,
) -> Result<ForumPost, sqlx::Error> {
    sqlx::query_as::<_, ForumPost>(
        r#"
        INSERT INTO forum_posts (user_id, title, content)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .fetch_one(db)
    .await
}

pub async fn list_posts(db: &PgPool) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, PostWithAuthor>(&format!(
        "{} ORDER BY p.created_at DESC",
        POST_WITH_AUTHOR
    ))
    .fetch_all(db)
    .await
}

/// The most recent posts, newest first, for the home page.
pub async fn list_recent_posts(db: &PgPool, limit: i64) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, PostWithAuthor>(&format!(
        "{} ORDER BY p.created_at DESC LIMIT $1",
        POST_WITH_AUTHOR
    ))
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn find_post(db: &PgPool, id: i64) -> Result<Option<PostWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, PostWithAuthor>(&format!("{} WHERE p.id = $1", POST_WITH_AUTHOR))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_reply(
    db: &PgPool,
    post_id: i64,
    user_id: i64,
    content: &str,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO forum_replies (post_id, user_id, content)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(content)
    .fetch_one(db)
    .await?;
    Ok(id)
}

pub async fn list_replies(db: &PgPool, post_id: i64) -> Result<Vec<ReplyWithAuthor>, sqlx::Error> {
    sqlx::query_as::<_, ReplyWithAuthor>(
        r#"
        SELECT r.id, r.post_id, r.user_id, u.username, u.first_name, u.last_name,
               r.content, r.created_at
        FROM forum_replies r
        JOIN users u ON u.id = r.user_id
        WHERE r.post_id = $1
        ORDER BY r.created_at ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await
}
