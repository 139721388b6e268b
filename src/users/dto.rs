use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::User;
use crate::photos::dto::PhotoSummary;
use crate::videos::dto::VideoView;

pub const GENDERS: [&str; 3] = ["male", "female", "other"];

/// Public part of a user returned to clients.
#[derive(Debug, Serialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub email: String,
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
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            gender: u.gender,
            birth_place: u.birth_place,
            school: u.school,
            hobbies: u.hobbies,
            about: u.about,
            profile_photo: u.profile_photo,
            profile_thumbnail: u.profile_thumbnail,
            current_location: u.current_location,
            current_activity: u.current_activity,
            created_at: u.created_at,
        }
    }
}

/// Request body for `PUT /profile`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
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

/// Profile page payload: the user with their galleries, newest first.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub user: UserPublic,
    pub photos: Vec<PhotoSummary>,
    pub videos: Vec<VideoView>,
}

/// One row on the "who, where, what" page.
#[derive(Debug, Serialize)]
pub struct ActivityView {
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub current_location: Option<String>,
    pub current_activity: Option<String>,
}

impl From<User> for ActivityView {
    fn from(u: User) -> Self {
        Self {
            user_id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            current_location: u.current_location,
            current_activity: u.current_activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "ayse".into(),
            email: "ayse@example.com".into(),
            password_hash: "secret-hash".into(),
            first_name: "Ayşe".into(),
            last_name: "Yılmaz".into(),
            gender: Some("female".into()),
            birth_place: Some("istanbul".into()),
            school: Some("itu".into()),
            hobbies: Some("Kitap okuma, Spor".into()),
            about: None,
            profile_photo: None,
            profile_thumbnail: None,
            current_location: Some("Kütüphane".into()),
            current_activity: None,
            created_at: datetime!(2024-01-01 00:00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00:00 UTC),
        }
    }

    #[test]
    fn user_row_never_serializes_password_hash() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn public_view_carries_profile_fields() {
        let view = UserPublic::from(sample_user());
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("ayse@example.com"));
        assert!(json.contains("Kitap okuma"));
        assert!(!json.contains("secret-hash"));
    }
}
