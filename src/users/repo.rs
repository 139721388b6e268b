use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub birth_place: Option<String>,
    pub school: Option<String>,
    pub hobbies: Option<String>,
    pub about: Option<String>,
    pub profile_photo: Option<String>,
    pub profile_thumbnail: Option<String>,
    pub current_location: Option<String>,
    pub current_activity: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub gender: Option<&'a str>,
    pub birth_place: Option<&'a str>,
    pub school: Option<&'a str>,
    pub hobbies: Option<&'a str>,
    pub about: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub birth_place: Option<String>,
    pub school: Option<String>,
    pub hobbies: Option<String>,
    pub about: Option<String>,
    pub current_location: Option<String>,
    pub current_activity: Option<String>,
}

pub async fn create(db: &PgPool, new: NewUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, first_name, last_name,
                           gender, birth_place, school, hobbies, about)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(new.username)
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.first_name)
    .bind(new.last_name)
    .bind(new.gender)
    .bind(new.birth_place)
    .bind(new.school)
    .bind(new.hobbies)
    .bind(new.about)
    .fetch_one(db)
    .await
}

pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE username = $1"#)
        .bind(username)
        .fetch_optional(db)
        .await
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE email = $1"#)
        .bind(email)
        .fetch_optional(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn exists(db: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<(i64,)> = sqlx::query_as(r#"SELECT id FROM users WHERE id = $1"#)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn list_all(db: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(r#"SELECT * FROM users ORDER BY username"#)
        .fetch_all(db)
        .await
}

/// Users who have published where they are or what they are doing.
pub async fn list_with_activity(db: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users
        WHERE current_location IS NOT NULL OR current_activity IS NOT NULL
        ORDER BY updated_at DESC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn update_profile(
    db: &PgPool,
    id: i64,
    p: &ProfileUpdate,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET first_name = $2, last_name = $3, gender = $4, birth_place = $5,
            school = $6, hobbies = $7, about = $8, current_location = $9,
            current_activity = $10, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&p.first_name)
    .bind(&p.last_name)
    .bind(&p.gender)
    .bind(&p.birth_place)
    .bind(&p.school)
    .bind(&p.hobbies)
    .bind(&p.about)
    .bind(&p.current_location)
    .bind(&p.current_activity)
    .fetch_optional(db)
    .await
}

pub async fn set_profile_photo(
    db: &PgPool,
    id: i64,
    filename: &str,
    thumbnail: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET profile_photo = $2, profile_thumbnail = $3, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(filename)
    .bind(thumbnail)
    .fetch_optional(db)
    .await
}
