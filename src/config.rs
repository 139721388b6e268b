use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub remember_ttl_minutes: i64,
}

/// Which concrete media adapter backs uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaBackend {
    Local,
    S3,
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub backend: MediaBackend,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub thumbnail_size: (u32, u32),
    pub s3: Option<S3Config>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses "150x150" style bounding boxes.
fn parse_thumbnail_size(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "campusnet"),
            audience: env_or("JWT_AUDIENCE", "campusnet-users"),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            remember_ttl_minutes: std::env::var("JWT_REMEMBER_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 30),
        };

        let backend = match env_or("MEDIA_BACKEND", "local").to_lowercase().as_str() {
            "s3" => MediaBackend::S3,
            _ => MediaBackend::Local,
        };
        let s3 = if backend == MediaBackend::S3 {
            Some(S3Config {
                endpoint: std::env::var("S3_ENDPOINT")?,
                bucket: std::env::var("S3_BUCKET")?,
                access_key: std::env::var("S3_ACCESS_KEY")?,
                secret_key: std::env::var("S3_SECRET_KEY")?,
                region: env_or("S3_REGION", "us-east-1"),
            })
        } else {
            None
        };

        let uploads = UploadConfig {
            backend,
            upload_dir: env_or("UPLOAD_DIR", "static/uploads"),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(16 * 1024 * 1024),
            allowed_extensions: env_or("ALLOWED_EXTENSIONS", "png,jpg,jpeg,gif")
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            thumbnail_size: std::env::var("THUMBNAIL_SIZE")
                .ok()
                .and_then(|v| parse_thumbnail_size(&v))
                .unwrap_or((150, 150)),
            s3,
        };

        Ok(Self {
            database_url,
            jwt,
            uploads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thumbnail_size() {
        assert_eq!(parse_thumbnail_size("150x150"), Some((150, 150)));
        assert_eq!(parse_thumbnail_size("320 x 240"), Some((320, 240)));
        assert_eq!(parse_thumbnail_size("150"), None);
        assert_eq!(parse_thumbnail_size("axb"), None);
    }
}
