//! Turning a file path into an upload candidate
//!
//! The media type is declared from the file extension, the same way a
//! browser fills in `File.type`. The content is never sniffed.

use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::IntakeError;
use crate::state::data::UploadCandidate;

/// Files above this size are accepted but logged
pub const SOFT_SIZE_LIMIT: usize = 10 * 1024 * 1024;

/// Extensions offered by the file picker. DICOM is left out: it declares
/// `application/dicom` and would only be rejected.
pub const PICKER_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff", "webp",
];

/// The media type a browser would declare for this path
pub fn declared_media_type(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if extension == "dcm" || extension == "dicom" {
        return "application/dicom".to_string();
    }

    ImageFormat::from_extension(&extension)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// Read a file from disk into an [`UploadCandidate`]
pub async fn load_candidate(path: PathBuf) -> Result<UploadCandidate, IntakeError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| IntakeError::Unreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let media_type = declared_media_type(&path);

    if bytes.len() > SOFT_SIZE_LIMIT {
        warn!(
            "⚠️  {} is {:.1}MB, above the documented 10MB limit",
            name,
            bytes.len() as f64 / 1024.0 / 1024.0
        );
    }

    info!("📁 Loaded {} ({}, {} bytes)", name, media_type, bytes.len());

    Ok(UploadCandidate::new(name, media_type, bytes))
}
