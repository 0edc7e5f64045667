//! Preview generation for the intake surface
//!
//! Decodes the candidate, scales it down and re-encodes it as a PNG data
//! URL. Content the `image` crate cannot decode (DICOM, truncated files)
//! falls back to a data URL of the raw bytes under the declared media type.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use iced::widget::image::Handle;
use image::{imageops::FilterType, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::state::data::UploadCandidate;

/// Longest edge of a generated preview
const PREVIEW_MAX_EDGE: u32 = 512;

/// Data-URL rendering of an upload candidate
#[derive(Debug, Clone)]
pub struct PreviewImage {
    /// `data:<type>;base64,<payload>`
    pub data_url: String,
    /// Handle the image widget draws from, decoded from `data_url`
    pub handle: Handle,
}

impl PreviewImage {
    /// Parse a base64 `data:` URL. `None` if it is not one.
    pub fn from_data_url(data_url: String) -> Option<Self> {
        let payload = data_url
            .strip_prefix("data:")?
            .split_once(";base64,")?
            .1;
        let bytes = STANDARD.decode(payload).ok()?;

        Some(Self {
            handle: Handle::from_bytes(bytes),
            data_url,
        })
    }
}

/// Derive a preview on a blocking worker.
pub async fn derive_preview(candidate: Arc<UploadCandidate>) -> Option<PreviewImage> {
    tokio::task::spawn_blocking(move || derive_preview_blocking(&candidate))
        .await
        .map_err(|e| warn!("Preview task join error: {}", e))
        .ok()
        .flatten()
}

/// Blocking version of preview generation
pub fn derive_preview_blocking(candidate: &UploadCandidate) -> Option<PreviewImage> {
    let url = match downscaled_png(&candidate.bytes) {
        Some(png) => {
            debug!("🖼️  Preview for {}: {}KB PNG", candidate.name, png.len() / 1024);
            data_url("image/png", &png)
        }
        None => {
            debug!("🖼️  Preview for {}: raw bytes", candidate.name);
            data_url(&candidate.media_type, &candidate.bytes)
        }
    };

    PreviewImage::from_data_url(url)
}

/// Decode, shrink to the preview size and encode as PNG
fn downscaled_png(bytes: &[u8]) -> Option<Vec<u8>> {
    let img = image::load_from_memory(bytes).ok()?;

    let img = if img.width() > PREVIEW_MAX_EDGE || img.height() > PREVIEW_MAX_EDGE {
        img.resize(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE, FilterType::Lanczos3)
    } else {
        img
    };

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).ok()?;
    Some(png)
}

fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, RgbImage};

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), format).unwrap();
        out
    }

    fn decode_data_url(url: &str) -> Vec<u8> {
        let payload = url.split_once(";base64,").unwrap().1;
        STANDARD.decode(payload).unwrap()
    }

    #[test]
    fn test_large_image_is_downscaled_png() {
        let candidate =
            UploadCandidate::new("big.png", "image/png", encoded(2048, 1024, ImageFormat::Png));

        let preview = derive_preview_blocking(&candidate).unwrap();
        assert!(preview.data_url.starts_with("data:image/png;base64,"));

        let decoded = image::load_from_memory(&decode_data_url(&preview.data_url)).unwrap();
        assert_eq!(decoded.dimensions(), (512, 256));
    }

    #[test]
    fn test_small_jpeg_keeps_size_but_becomes_png() {
        let candidate =
            UploadCandidate::new("s.jpg", "image/jpeg", encoded(64, 48, ImageFormat::Jpeg));

        let preview = derive_preview_blocking(&candidate).unwrap();
        assert!(preview.data_url.starts_with("data:image/png;base64,"));

        let decoded = image::load_from_memory(&decode_data_url(&preview.data_url)).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn test_undecodable_content_falls_back_to_raw_bytes() {
        let raw = b"DICM not really an image".to_vec();
        let candidate = UploadCandidate::new("study.dcm", "image/dicom", raw.clone());

        let preview = derive_preview_blocking(&candidate).unwrap();
        assert!(preview.data_url.starts_with("data:image/dicom;base64,"));
        assert_eq!(decode_data_url(&preview.data_url), raw);
    }

    #[test]
    fn test_handle_is_built_from_data_url() {
        let png = encoded(4, 4, ImageFormat::Png);
        let url = data_url("image/png", &png);

        let preview = PreviewImage::from_data_url(url.clone()).unwrap();
        assert_eq!(preview.data_url, url);
        assert_eq!(decode_data_url(&preview.data_url), png);
    }

    #[test]
    fn test_rejects_non_data_urls() {
        assert!(PreviewImage::from_data_url("https://x/a.png".into()).is_none());
        assert!(PreviewImage::from_data_url("data:image/png,plain".into()).is_none());
        assert!(PreviewImage::from_data_url("data:image/png;base64,@@@".into()).is_none());
    }

    #[tokio::test]
    async fn test_async_preview_runs_on_worker() {
        let candidate = Arc::new(UploadCandidate::new(
            "a.png",
            "image/png",
            encoded(8, 8, ImageFormat::Png),
        ));
        let preview = derive_preview(candidate).await;
        assert!(preview.is_some());
    }
}
