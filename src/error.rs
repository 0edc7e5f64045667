//! Errors produced while taking in and analyzing an image
//!
//! Every variant collapses to a single user-facing string through
//! [`IntakeError::user_message`]. The application never distinguishes
//! between them beyond that message.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Message shown for any failure that has no more specific explanation
pub const FALLBACK_MESSAGE: &str = "Failed to analyze image. Please try again.";

/// Message shown when the selected file is not an image
pub const INVALID_FILE_TYPE_MESSAGE: &str = "Please upload an image file (JPEG, PNG, etc.)";

/// Message shown when the selected file could not be read from disk
pub const UNREADABLE_MESSAGE: &str = "Could not read the selected file. Please try again.";

/// Everything that can go wrong between a file selection and a result.
///
/// `Clone` because the error travels inside `iced` messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntakeError {
    /// Declared media type does not start with `image/`
    #[error("unsupported media type `{0}`")]
    InvalidFileType(String),

    /// The file could not be read before submission
    #[error("could not read {path:?}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// Transport-level failure (connect, TLS, body read, ...)
    #[error("transport failure: {0}")]
    Network(String),

    /// The request timer fired before the service answered
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The service answered with a non-success status
    #[error("service responded with status {status}")]
    Service { status: u16, detail: Option<String> },

    /// A success status whose body is not a valid analysis result
    #[error("malformed analysis response: {0}")]
    MalformedResponse(String),
}

impl IntakeError {
    /// The string presented to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::InvalidFileType(_) => INVALID_FILE_TYPE_MESSAGE.to_string(),
            IntakeError::Unreadable { .. } => UNREADABLE_MESSAGE.to_string(),
            IntakeError::Service { detail: Some(detail), .. } if !detail.is_empty() => {
                detail.clone()
            }
            IntakeError::Network(_)
            | IntakeError::Timeout(_)
            | IntakeError::Service { .. }
            | IntakeError::MalformedResponse(_) => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for IntakeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest carries no duration; the request timer reports the real limit
            IntakeError::Timeout(Duration::ZERO)
        } else {
            IntakeError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_detail_is_shown_verbatim() {
        let err = IntakeError::Service {
            status: 422,
            detail: Some("Image too blurry".to_string()),
        };
        assert_eq!(err.user_message(), "Image too blurry");
    }

    #[test]
    fn test_empty_detail_falls_back() {
        let err = IntakeError::Service {
            status: 500,
            detail: Some(String::new()),
        };
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_transport_and_timeout_use_fallback() {
        assert_eq!(
            IntakeError::Network("connection refused".into()).user_message(),
            "Failed to analyze image. Please try again."
        );
        assert_eq!(
            IntakeError::Timeout(Duration::from_secs(30)).user_message(),
            FALLBACK_MESSAGE
        );
    }

    #[test]
    fn test_invalid_file_type_message() {
        let err = IntakeError::InvalidFileType("text/plain".into());
        assert_eq!(err.user_message(), INVALID_FILE_TYPE_MESSAGE);
    }
}
