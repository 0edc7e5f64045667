//! Result formatting helpers
//!
//! Pure functions mapping analysis values to display strings and colors.
//! Nothing here mutates the result it formats.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use iced::Color;
use std::fmt::Display;

use crate::state::data::{AnalysisResult, Timestamp};

/// Shown when a timestamp cannot be interpreted
pub const INVALID_DATE: &str = "Invalid Date";

/// Display bucket for a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn color(self) -> Color {
        match self {
            ConfidenceTier::High => Color::from_rgb8(0x4C, 0xAF, 0x50),
            ConfidenceTier::Medium => Color::from_rgb8(0xFF, 0x98, 0x00),
            ConfidenceTier::Low => Color::from_rgb8(0xF4, 0x43, 0x36),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

/// Strict comparisons: 0.8 is medium, 0.6 is low
pub fn confidence_tier(value: f64) -> ConfidenceTier {
    if value > 0.8 {
        ConfidenceTier::High
    } else if value > 0.6 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// `0.734` → `"73.4%"`. Exact halfway values round away from zero.
pub fn format_percent(value: f64) -> String {
    let percent = value * 100.0;

    // A double lies exactly halfway between two tenths only when it is an
    // odd multiple of 0.25; `{:.1}` would round those to even.
    let quarters = percent * 4.0;
    let shown = if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        (percent * 10.0).abs().ceil().copysign(percent) / 10.0
    } else {
        percent
    };

    format!("{:.1}%", shown)
}

/// Render a timestamp in the viewer's local time zone
pub fn format_instant(timestamp: &Timestamp) -> String {
    format_instant_in(timestamp, &Local)
}

/// Render a timestamp in `tz` as `M/D/YYYY, h:mm:ss AM`
pub fn format_instant_in<Tz>(timestamp: &Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match resolve_instant(timestamp, tz) {
        Some(instant) => instant.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Interpret a timestamp the way a JavaScript `Date` constructor would:
/// offsets are honored, naive date-times are local wall time, bare dates
/// are UTC midnight and numbers are epoch milliseconds.
fn resolve_instant<Tz: TimeZone>(timestamp: &Timestamp, tz: &Tz) -> Option<DateTime<Tz>> {
    match timestamp {
        Timestamp::Epoch(millis) if millis.is_finite() => Utc
            .timestamp_millis_opt(*millis as i64)
            .single()
            .map(|utc| utc.with_timezone(tz)),
        Timestamp::Epoch(_) => None,
        Timestamp::Text(text) => {
            let text = text.trim();

            if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
                return Some(instant.with_timezone(tz));
            }

            if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
                return tz.from_local_datetime(&naive).earliest();
            }

            if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M") {
                return tz.from_local_datetime(&naive).earliest();
            }

            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| Utc.from_utc_datetime(&midnight).with_timezone(tz))
        }
    }
}

/// One row of the condition probability table
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityRow {
    pub condition: String,
    pub fraction: f64,
    pub percent: String,
}

/// Everything the result surface shows, already formatted
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub diagnosis: String,
    pub tier: ConfidenceTier,
    pub confidence: f64,
    pub confidence_percent: String,
    pub filename: String,
    pub analyzed_at: String,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
    /// In stored order, never re-sorted
    pub probabilities: Vec<ProbabilityRow>,
}

impl ResultCard {
    pub fn project(result: &AnalysisResult) -> Self {
        Self::project_in(result, &Local)
    }

    pub fn project_in<Tz>(result: &AnalysisResult, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        ResultCard {
            diagnosis: result.diagnosis.clone(),
            tier: confidence_tier(result.confidence),
            confidence: result.confidence,
            confidence_percent: format_percent(result.confidence),
            filename: result.filename.clone(),
            analyzed_at: format_instant_in(&result.timestamp, tz),
            findings: result.findings.clone(),
            recommendations: result.recommendations.clone(),
            probabilities: result
                .conditions_probabilities
                .iter()
                .map(|entry| ProbabilityRow {
                    condition: entry.condition.clone(),
                    fraction: entry.probability,
                    percent: format_percent(entry.probability),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(confidence_tier(0.85), ConfidenceTier::High);
        assert_eq!(confidence_tier(0.8), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(0.61), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(0.6), ConfidenceTier::Low);
        assert_eq!(confidence_tier(0.05), ConfidenceTier::Low);
        assert_eq!(confidence_tier(1.0), ConfidenceTier::High);
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(ConfidenceTier::High.color(), Color::from_rgb8(76, 175, 80));
        assert_eq!(ConfidenceTier::Medium.color(), Color::from_rgb8(255, 152, 0));
        assert_eq!(ConfidenceTier::Low.color(), Color::from_rgb8(244, 67, 54));
    }

    #[test]
    fn test_percentages() {
        assert_eq!(format_percent(0.734), "73.4%");
        assert_eq!(format_percent(0.62), "62.0%");
        assert_eq!(format_percent(0.38), "38.0%");
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_halfway_percentages_round_up() {
        assert_eq!(format_percent(0.0625), "6.3%");
        assert_eq!(format_percent(0.0125), "1.3%");
        assert_eq!(format_percent(0.00375), "0.4%");
        assert_eq!(format_percent(0.9975), "99.8%");
        assert_eq!(format_percent(0.0675), "6.8%");
        // just below a tie still rounds down
        assert_eq!(format_percent(0.06249), "6.2%");
    }

    #[test]
    fn test_instants_in_utc() {
        let rfc = Timestamp::Text("2024-03-05T14:07:09Z".into());
        assert_eq!(format_instant_in(&rfc, &Utc), "3/5/2024, 2:07:09 PM");

        let naive = Timestamp::Text("2024-03-05T09:07:09.123456".into());
        assert_eq!(format_instant_in(&naive, &Utc), "3/5/2024, 9:07:09 AM");

        let date_only = Timestamp::Text("2024-12-25".into());
        assert_eq!(format_instant_in(&date_only, &Utc), "12/25/2024, 12:00:00 AM");

        let epoch = Timestamp::Epoch(0.0);
        assert_eq!(format_instant_in(&epoch, &Utc), "1/1/1970, 12:00:00 AM");
    }

    #[test]
    fn test_offset_is_converted_but_naive_is_wall_time() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        let rfc = Timestamp::Text("2024-03-05T14:07:09+00:00".into());
        assert_eq!(format_instant_in(&rfc, &plus_two), "3/5/2024, 4:07:09 PM");

        let naive = Timestamp::Text("2024-03-05T14:07:09".into());
        assert_eq!(format_instant_in(&naive, &plus_two), "3/5/2024, 2:07:09 PM");
    }

    #[test]
    fn test_unparseable_instant() {
        let garbage = Timestamp::Text("yesterday-ish".into());
        assert_eq!(format_instant_in(&garbage, &Utc), INVALID_DATE);
        assert_eq!(format_instant_in(&Timestamp::Epoch(f64::NAN), &Utc), INVALID_DATE);
    }

    #[test]
    fn test_card_keeps_probability_order_and_source_values() {
        let body = br#"{
            "diagnosis": "Pneumonia", "confidence": 0.734,
            "findings": ["Air bronchograms present"],
            "recommendations": ["Clinical correlation required"],
            "conditions_probabilities": {"pneumonia": 0.62, "normal": 0.38},
            "filename": "chest.png", "timestamp": "2024-03-05T14:07:09Z"
        }"#;
        let result = AnalysisResult::from_json(body).unwrap();
        let before = result.clone();

        let card = ResultCard::project_in(&result, &Utc);

        assert_eq!(card.confidence_percent, "73.4%");
        assert_eq!(card.tier, ConfidenceTier::Medium);
        assert_eq!(card.analyzed_at, "3/5/2024, 2:07:09 PM");
        let rows: Vec<_> = card
            .probabilities
            .iter()
            .map(|row| (row.condition.as_str(), row.percent.as_str()))
            .collect();
        assert_eq!(rows, [("pneumonia", "62.0%"), ("normal", "38.0%")]);
        assert_eq!(result, before);
    }
}
