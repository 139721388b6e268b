use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::{AppConfig, MediaBackend};
use crate::media::{LocalStore, MediaStore, S3Store};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let media: Arc<dyn MediaStore> = match config.uploads.backend {
            MediaBackend::Local => Arc::new(LocalStore::new(&config.uploads.upload_dir).await?),
            MediaBackend::S3 => {
                let s3 = config
                    .uploads
                    .s3
                    .as_ref()
                    .context("MEDIA_BACKEND=s3 requires S3_* configuration")?;
                Arc::new(
                    S3Store::new(
                        &s3.endpoint,
                        &s3.bucket,
                        &s3.access_key,
                        &s3.secret_key,
                        &s3.region,
                    )
                    .await?,
                )
            }
        };

        Ok(Self { db, config, media })
    }
}
