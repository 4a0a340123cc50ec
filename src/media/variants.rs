use std::path::{Path, PathBuf};

use image::DynamicImage;

use super::storage_path;

const WEBP_QUALITY: f32 = 85.0;

/// Extensions that get a `.webp` sibling
const CONVERTIBLE: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, thiserror::Error)]
pub enum WebpError {
    #[error("failed to read image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to encode WebP image: {0}")]
    Encode(String),
    #[error("failed to write WebP image: {0}")]
    Io(#[from] std::io::Error),
}

fn is_convertible(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CONVERTIBLE.iter().any(|c| c.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn accepts_webp(accept: Option<&str>) -> bool {
    accept
        .map(|accept| accept.to_ascii_lowercase().contains("image/webp"))
        .unwrap_or(false)
}

/// The `.webp` sibling to serve instead of `request_path`, if the client accepts WebP and
/// the sibling exists under `root`
pub fn negotiate_webp(root: &Path, request_path: &str, accept: Option<&str>) -> Option<PathBuf> {
    if !accepts_webp(accept) {
        return None;
    }

    let original = storage_path(root, request_path)?;
    if !is_convertible(&original) {
        return None;
    }

    let sibling = original.with_extension("webp");
    sibling.is_file().then_some(sibling)
}

/// Write a `.webp` sibling next to a JPEG or PNG image.
///
/// Returns the new file's path, or `None` when the image is not convertible or the sibling
/// already exists.
pub fn generate_webp_sibling(path: &Path) -> Result<Option<PathBuf>, WebpError> {
    if !is_convertible(path) {
        return Ok(None);
    }

    let sibling = path.with_extension("webp");
    if sibling.exists() {
        return Ok(None);
    }

    let image = match image::open(path)? {
        image @ (DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => image,
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    };

    let encoded = webp::Encoder::from_image(&image)
        .map_err(|e| WebpError::Encode(e.to_string()))?
        .encode(WEBP_QUALITY);

    std::fs::write(&sibling, &*encoded)?;
    Ok(Some(sibling))
}
