//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the intake layer, the analysis service and the UI layer.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

use crate::error::IntakeError;

/// A file selected by the user, alive until the next selection supersedes it
#[derive(Clone, PartialEq)]
pub struct UploadCandidate {
    /// Display name (file name only, e.g. "chest_pa.png")
    pub name: String,
    /// Media type as a browser would declare it (e.g. "image/png")
    pub media_type: String,
    /// Raw file content
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Only `image/*` media types may be submitted
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

// Keep megabytes of image data out of log lines
impl fmt::Debug for UploadCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCandidate")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// When the service produced the analysis.
///
/// The service sends either an ISO-8601 string or an epoch number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Epoch milliseconds
    Epoch(f64),
    /// ISO-8601 text, with or without an offset
    Text(String),
}

/// One entry of the condition probability table
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionProbability {
    pub condition: String,
    pub probability: f64,
}

/// The service's structured answer for one image.
///
/// Immutable once received; discarded when the user starts a new analysis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisResult {
    /// Primary diagnosis label (e.g. "Pneumonia")
    pub diagnosis: String,
    /// Confidence of the primary diagnosis in [0, 1]
    pub confidence: f64,
    /// Clinical findings, in the order given
    pub findings: Vec<String>,
    /// Recommendations, in the order given
    pub recommendations: Vec<String>,
    /// Probability per condition, in document order
    #[serde(deserialize_with = "ordered_probabilities")]
    pub conditions_probabilities: Vec<ConditionProbability>,
    /// Name of the analyzed file as the service saw it
    pub filename: String,
    /// When the analysis was produced
    pub timestamp: Timestamp,
    /// Server-side identifier, when the service provides one
    #[serde(default)]
    pub analysis_id: Option<String>,
}

impl AnalysisResult {
    /// Parse and validate a response body
    pub fn from_json(body: &[u8]) -> Result<Self, IntakeError> {
        let result: AnalysisResult = serde_json::from_slice(body)
            .map_err(|e| IntakeError::MalformedResponse(e.to_string()))?;
        result.validate()?;
        Ok(result)
    }

    /// Check that confidence and every probability lie in [0, 1]
    pub fn validate(&self) -> Result<(), IntakeError> {
        if !is_unit_interval(self.confidence) {
            return Err(IntakeError::MalformedResponse(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }

        if let Some(entry) = self
            .conditions_probabilities
            .iter()
            .find(|entry| !is_unit_interval(entry.probability))
        {
            return Err(IntakeError::MalformedResponse(format!(
                "probability {} for `{}` outside [0, 1]",
                entry.probability, entry.condition
            )));
        }

        Ok(())
    }
}

fn is_unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Decode a JSON object into entries, preserving document order.
///
/// A repeated key keeps its first position and takes the last value.
fn ordered_probabilities<'de, D>(deserializer: D) -> Result<Vec<ConditionProbability>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<ConditionProbability>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of condition names to probabilities")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries: Vec<ConditionProbability> =
                Vec::with_capacity(map.size_hint().unwrap_or(0));

            while let Some((condition, probability)) = map.next_entry::<String, f64>()? {
                match entries.iter_mut().find(|e| e.condition == condition) {
                    Some(existing) => existing.probability = probability,
                    None => entries.push(ConditionProbability {
                        condition,
                        probability,
                    }),
                }
            }

            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "analysis_id": "3f1c",
        "filename": "chest.png",
        "timestamp": "2024-03-05T14:07:09.123456",
        "diagnosis": "Pneumonia",
        "confidence": 0.734,
        "findings": ["Consolidation in right lower lobe", "Air bronchograms present"],
        "recommendations": ["Antibiotic therapy recommended"],
        "conditions_probabilities": {"pneumonia": 0.62, "normal": 0.38}
    }"#;

    #[test]
    fn test_parses_service_body() {
        let result = AnalysisResult::from_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(result.diagnosis, "Pneumonia");
        assert_eq!(result.confidence, 0.734);
        assert_eq!(result.findings.len(), 2);
        assert_eq!(result.analysis_id.as_deref(), Some("3f1c"));
        assert_eq!(
            result.timestamp,
            Timestamp::Text("2024-03-05T14:07:09.123456".to_string())
        );
    }

    #[test]
    fn test_probabilities_keep_document_order() {
        let body = r#"{
            "diagnosis": "Normal", "confidence": 0.5, "findings": [], "recommendations": [],
            "filename": "a.png", "timestamp": 1700000000000,
            "conditions_probabilities": {"zeta": 0.1, "alpha": 0.7, "mid": 0.2}
        }"#;
        let result = AnalysisResult::from_json(body.as_bytes()).unwrap();
        let names: Vec<_> = result
            .conditions_probabilities
            .iter()
            .map(|e| e.condition.as_str())
            .collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(result.timestamp, Timestamp::Epoch(1_700_000_000_000.0));
    }

    #[test]
    fn test_repeated_condition_keeps_first_position() {
        let body = r#"{
            "diagnosis": "Normal", "confidence": 0.5, "findings": [], "recommendations": [],
            "filename": "a.png", "timestamp": "2024-01-01",
            "conditions_probabilities": {"a": 0.1, "b": 0.2, "a": 0.3}
        }"#;
        let result = AnalysisResult::from_json(body.as_bytes()).unwrap();
        assert_eq!(result.conditions_probabilities.len(), 2);
        assert_eq!(result.conditions_probabilities[0].condition, "a");
        assert_eq!(result.conditions_probabilities[0].probability, 0.3);
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        let body = SAMPLE.replace("0.734", "1.4");
        let err = AnalysisResult::from_json(body.as_bytes()).unwrap_err();
        assert!(matches!(err, IntakeError::MalformedResponse(_)));
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        let body = SAMPLE.replace("0.38", "-0.01");
        assert!(AnalysisResult::from_json(body.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let err = AnalysisResult::from_json(br#"{"diagnosis": "Normal"}"#).unwrap_err();
        assert!(matches!(err, IntakeError::MalformedResponse(_)));
    }

    #[test]
    fn test_candidate_media_type_check() {
        assert!(UploadCandidate::new("a.png", "image/png", vec![]).is_image());
        assert!(!UploadCandidate::new("a.dcm", "application/dicom", vec![]).is_image());
        assert!(!UploadCandidate::new("a", "", vec![]).is_image());
        // prefix match only, like the browser check
        assert!(!UploadCandidate::new("a", "IMAGE/PNG", vec![]).is_image());
    }

    #[test]
    fn test_candidate_debug_hides_bytes() {
        let candidate = UploadCandidate::new("a.png", "image/png", vec![0u8; 4096]);
        let printed = format!("{:?}", candidate);
        assert!(printed.contains("len: 4096"));
        assert!(printed.len() < 120);
    }
}
