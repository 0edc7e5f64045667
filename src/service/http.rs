//! reqwest-backed implementation of [`AnalysisService`]

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

use super::{interpret_response, AnalysisService, ServiceHealth};
use crate::config::Settings;
use crate::error::IntakeError;
use crate::state::data::{AnalysisResult, UploadCandidate};

/// Multipart field the service expects the image under
const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct HttpAnalysisService {
    client: reqwest::Client,
    analyze_url: String,
    health_url: String,
}

impl HttpAnalysisService {
    /// Build a client for the endpoints named in `settings`.
    ///
    /// No client-level timeout: the intake controller races every request
    /// against its own timer.
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            analyze_url: settings.analyze_url(),
            health_url: settings.health_url(),
        })
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, candidate: &UploadCandidate) -> Result<AnalysisResult, IntakeError> {
        let part = Part::bytes(candidate.bytes.clone())
            .file_name(candidate.name.clone())
            .mime_str(&candidate.media_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        debug!(
            "📤 POST {} ({} bytes, {})",
            self.analyze_url,
            candidate.bytes.len(),
            candidate.media_type
        );

        // reqwest sets `multipart/form-data; boundary=...` for us
        let response = self
            .client
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        info!("📥 {} answered {} ({} bytes)", self.analyze_url, status, body.len());

        let outcome = interpret_response(status, &body);
        if let Err(err) = &outcome {
            warn!("Analysis of {} failed: {}", candidate.name, err);
        }
        outcome
    }

    async fn health(&self) -> Result<ServiceHealth, IntakeError> {
        let response = self.client.get(&self.health_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(IntakeError::Service {
                status: status.as_u16(),
                detail: None,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| IntakeError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_settings() {
        let mut settings = Settings::default();
        settings.api_base_url = "http://analysis.local:9000/".into();

        let service = HttpAnalysisService::new(&settings).unwrap();
        assert_eq!(service.analyze_url, "http://analysis.local:9000/api/analyze");
        assert_eq!(service.health_url, "http://analysis.local:9000/api/health");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_network_error() {
        let mut settings = Settings::default();
        // port 9 (discard) on localhost is closed on any sane test box
        settings.api_base_url = "http://127.0.0.1:9".into();
        let service = HttpAnalysisService::new(&settings).unwrap();

        let candidate = UploadCandidate::new("a.png", "image/png", vec![1, 2, 3]);
        let err = service.analyze(&candidate).await.unwrap_err();

        assert!(matches!(err, IntakeError::Network(_)));
        assert_eq!(err.user_message(), "Failed to analyze image. Please try again.");
    }
}
