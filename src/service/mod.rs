//! Remote analysis service client
//!
//! This module handles:
//! - The `AnalysisService` seam the intake controller submits through
//! - Interpreting raw HTTP responses into results or errors
//! - The reqwest-backed implementation (http.rs)

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::IntakeError;
use crate::state::data::{AnalysisResult, UploadCandidate};

pub mod http;

pub use http::HttpAnalysisService;

/// Body of the service health endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Anything that can turn an image into an analysis result
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submit one image for analysis
    async fn analyze(&self, candidate: &UploadCandidate) -> Result<AnalysisResult, IntakeError>;

    /// Ask the service whether it is up
    async fn health(&self) -> Result<ServiceHealth, IntakeError>;
}

/// Optional error body: `{ "detail": "..." }`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Map a completed HTTP exchange to its outcome
pub fn interpret_response(status: u16, body: &[u8]) -> Result<AnalysisResult, IntakeError> {
    if (200..300).contains(&status) {
        return AnalysisResult::from_json(body);
    }

    Err(IntakeError::Service {
        status,
        detail: extract_detail(body),
    })
}

/// Pull a usable `detail` string out of an error body.
///
/// Non-string details (validation error arrays) and empty strings are ignored.
fn extract_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail),
        _ => None,
    }
}
