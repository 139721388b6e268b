use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Location record; one row per user, enforced by a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: i64,
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub updated_at: OffsetDateTime,
}

/// Location joined with the owner's display name, for map pins.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LocationWithUser {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub updated_at: OffsetDateTime,
}

const UPSERT_LOCATION: &str = r#"
    INSERT INTO locations (user_id, latitude, longitude, address)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (user_id) DO UPDATE
    SET latitude = EXCLUDED.latitude,
        longitude = EXCLUDED.longitude,
        address = EXCLUDED.address,
        updated_at = now()
    RETURNING *
"#;

const MAP_PINS: &str = r#"
    SELECT l.user_id, u.first_name, u.last_name,
           l.latitude, l.longitude, l.address, l.updated_at
    FROM locations l
    JOIN users u ON u.id = l.user_id
    ORDER BY l.updated_at DESC
"#;

/// Atomic insert-or-update keyed on the per-user unique constraint. Two
/// concurrent updates from the same user cannot produce a second row or a
/// torn write; the later statement wins.
pub async fn upsert(
    db: &PgPool,
    user_id: i64,
    latitude: f64,
    longitude: f64,
    address: Option<&str>,
) -> Result<Location, sqlx::Error> {
    sqlx::query_as::<_, Location>(UPSERT_LOCATION)
        .bind(user_id)
        .bind(latitude)
        .bind(longitude)
        .bind(address)
        .fetch_one(db)
        .await
}

pub async fn list_all(db: &PgPool) -> Result<Vec<LocationWithUser>, sqlx::Error> {
    sqlx::query_as::<_, LocationWithUser>(MAP_PINS)
        .fetch_all(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_is_one_statement_keyed_on_the_user() {
        // A conflict on the per-user unique constraint turns the insert into
        // an update in place, so a second upsert can never add a row.
        assert!(UPSERT_LOCATION.contains("ON CONFLICT (user_id) DO UPDATE"));
        assert_eq!(UPSERT_LOCATION.matches("INSERT").count(), 1);
    }

    #[test]
    fn upsert_refreshes_every_field_and_the_timestamp() {
        for set in [
            "latitude = EXCLUDED.latitude",
            "longitude = EXCLUDED.longitude",
            "address = EXCLUDED.address",
            "updated_at = now()",
        ] {
            assert!(UPSERT_LOCATION.contains(set), "missing: {set}");
        }
    }

    #[test]
    fn map_pins_are_freshest_first() {
        assert!(MAP_PINS.trim_end().ends_with("ORDER BY l.updated_at DESC"));
    }
}
