use bytes::Bytes;
use image::ImageFormat;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

const STAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// References handed back after an upload; the thumbnail is absent whenever
/// derivation failed (a non-fatal condition).
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub thumbnail: Option<String>,
}

/// Validates, names, persists and thumbnails one uploaded image.
///
/// Extension must be on the allow-list. Thumbnailing failure is logged and
/// swallowed so the primary action still succeeds.
pub async fn store_image(
    state: &AppState,
    original_name: &str,
    body: Bytes,
) -> Result<StoredImage, ApiError> {
    let ext = extension_of(original_name).ok_or_else(|| {
        ApiError::UnsupportedMediaType(format!("{} has no extension", original_name))
    })?;
    if !state
        .config
        .uploads
        .allowed_extensions
        .iter()
        .any(|a| a == &ext)
    {
        return Err(ApiError::UnsupportedMediaType(ext));
    }

    let filename = unique_filename(original_name, &ext, OffsetDateTime::now_utc());
    let content_type = content_type_for(&ext);

    state
        .media
        .put(&filename, body.clone(), content_type)
        .await
        .map_err(ApiError::ExternalService)?;

    let (max_w, max_h) = state.config.uploads.thumbnail_size;
    let thumbnail = match derive_thumbnail(&body, &ext, max_w, max_h) {
        Ok(thumb_bytes) => {
            let thumb_key = format!("thumbnails/thumb_{}", filename);
            match state
                .media
                .put(&thumb_key, Bytes::from(thumb_bytes), content_type)
                .await
            {
                Ok(()) => Some(thumb_key),
                Err(e) => {
                    warn!(error = %e, %filename, "storing thumbnail failed; keeping original only");
                    None
                }
            }
        }
        Err(e) => {
            warn!(error = %e, %filename, "thumbnail derivation failed; keeping original only");
            None
        }
    };

    Ok(StoredImage {
        filename,
        thumbnail,
    })
}

/// Proportionally fits the image inside `max_w` x `max_h` (no cropping) and
/// re-encodes it in its original format.
fn derive_thumbnail(body: &[u8], ext: &str, max_w: u32, max_h: u32) -> anyhow::Result<Vec<u8>> {
    let format = ImageFormat::from_extension(ext)
        .ok_or_else(|| anyhow::anyhow!("no image format for extension {}", ext))?;
    let img = image::load_from_memory(body)?;
    // Never upscale: an image already inside the box is kept as is.
    let thumb = if img.width() <= max_w && img.height() <= max_h {
        img
    } else {
        img.thumbnail(max_w, max_h)
    };

    let mut out = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut out);
    thumb.write_to(&mut cursor, format)?;
    Ok(out)
}

fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Desensitizes the original stem and appends a timestamp plus a short random
/// suffix so concurrent uploads never clobber each other.
fn unique_filename(original_name: &str, ext: &str, now: OffsetDateTime) -> String {
    let stem = original_name
        .rsplit_once('.')
        .map(|(s, _)| s)
        .unwrap_or(original_name);
    let mut clean: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if clean.is_empty() {
        clean.push_str("upload");
    }

    let stamp = now
        .format(STAMP_FORMAT)
        .unwrap_or_else(|_| "00000000_000000".into());
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}.{}", clean, stamp, &suffix[..8], ext)
}

fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("Photo.JPG"), Some("jpg".into()));
        assert_eq!(extension_of("a.tar.gz"), Some("gz".into()));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn filenames_are_desensitized_and_stamped() {
        let now = datetime!(2024-05-01 12:30:45 UTC);
        let name = unique_filename("tatil resmi (1).jpg", "jpg", now);
        assert!(name.starts_with("tatil_resmi__1__20240501_123045_"));
        assert!(name.ends_with(".jpg"));
        assert!(!name.contains(' '));
        assert!(!name.contains('('));
    }

    #[test]
    fn empty_stem_falls_back() {
        let now = datetime!(2024-05-01 12:30:45 UTC);
        let name = unique_filename(".png", "png", now);
        assert!(name.starts_with("upload_20240501_123045_"));
    }

    #[test]
    fn unique_filename_never_repeats() {
        let now = datetime!(2024-05-01 12:30:45 UTC);
        let a = unique_filename("x.png", "png", now);
        let b = unique_filename("x.png", "png", now);
        assert_ne!(a, b);
    }

    #[test]
    fn content_types_cover_allow_list() {
        assert_eq!(content_type_for("jpg"), "image/jpeg");
        assert_eq!(content_type_for("jpeg"), "image/jpeg");
        assert_eq!(content_type_for("png"), "image/png");
        assert_eq!(content_type_for("gif"), "image/gif");
        assert_eq!(content_type_for("bmp"), "application/octet-stream");
    }

    #[test]
    fn thumbnail_fits_bounding_box_without_cropping() {
        // 64x16 all-white PNG; a 150x150 box must leave it untouched,
        // a 32x32 box must scale it to 32x8 keeping the aspect ratio.
        let mut buf = Vec::new();
        let img = image::DynamicImage::new_rgb8(64, 16);
        img.write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        let same = derive_thumbnail(&buf, "png", 150, 150).unwrap();
        let same_img = image::load_from_memory(&same).unwrap();
        assert_eq!((same_img.width(), same_img.height()), (64, 16));

        let small = derive_thumbnail(&buf, "png", 32, 32).unwrap();
        let small_img = image::load_from_memory(&small).unwrap();
        assert_eq!((small_img.width(), small_img.height()), (32, 8));
    }

    #[test]
    fn thumbnail_rejects_garbage_bytes() {
        assert!(derive_thumbnail(b"definitely not an image", "png", 150, 150).is_err());
    }
}
