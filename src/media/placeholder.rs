use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, Rgb, RgbImage};

/// Light grey 10x10 SVG used whenever a real placeholder cannot be produced
pub const FALLBACK_PLACEHOLDER: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHdpZHRoPSIxMCIgaGVpZ2h0PSIxMCI+PHJlY3Qgd2lkdGg9IjEwIiBoZWlnaHQ9IjEwIiBmaWxsPSIjZGRkIi8+PC9zdmc+";

const PLACEHOLDER_SIZE: u32 = 10;
const PLACEHOLDER_QUALITY: u8 = 20;

#[derive(Debug, thiserror::Error)]
pub enum PlaceholderError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to process image: {0}")]
    Image(#[from] image::ImageError),
}

/// Tiny JPEG data URL of the image at `path`, or [`FALLBACK_PLACEHOLDER`] on any failure
pub fn blur_placeholder(path: &Path) -> String {
    match encode_placeholder(path) {
        Ok(data_url) => data_url,
        Err(error) => {
            tracing::warn!(
                error.cause_chain = ?error,
                "Failed to create placeholder for {}",
                path.display()
            );
            FALLBACK_PLACEHOLDER.to_string()
        }
    }
}

fn encode_placeholder(path: &Path) -> Result<String, PlaceholderError> {
    if !path.is_file() {
        return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such image file").into());
    }

    let thumbnail = image::open(path)?.thumbnail(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE);
    let rgb = flatten_on_white(&thumbnail.to_rgba8());

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, PLACEHOLDER_QUALITY).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(buffer)))
}

/// JPEG has no alpha channel, transparent pixels are blended onto white
fn flatten_on_white(rgba: &image::RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u16;
        let blend = |channel: u8| ((channel as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
