//! Top-level view state machine
//!
//! The UI is a projection of this state. Transitions are pure: they take
//! the current state by value and return the next one.

use super::data::AnalysisResult;

/// Exactly one of these is active at any time
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// Waiting for the user to select or drop a file
    #[default]
    Intake,
    /// A successful analysis is on screen
    ResultShown(AnalysisResult),
    /// An error notice is on screen, over the intake surface
    ErrorShown(String),
}

/// Inputs that drive [`ViewState`] transitions
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    AnalysisSucceeded(AnalysisResult),
    AnalysisFailed(String),
    StartNewAnalysis,
    DismissError,
}

impl ViewState {
    /// Compute the next state.
    ///
    /// Outcomes are accepted from any state: a submission started before
    /// the current result was shown may still land afterwards. Storing a
    /// result drops any error and storing an error drops any result.
    pub fn apply(self, event: ViewEvent) -> ViewState {
        match (self, event) {
            (_, ViewEvent::AnalysisSucceeded(result)) => ViewState::ResultShown(result),
            (_, ViewEvent::AnalysisFailed(message)) => ViewState::ErrorShown(message),
            (ViewState::ResultShown(_), ViewEvent::StartNewAnalysis) => ViewState::Intake,
            (ViewState::ErrorShown(_), ViewEvent::DismissError) => ViewState::Intake,
            (state, _) => state,
        }
    }

    /// The stored result, if one is being shown
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            ViewState::ResultShown(result) => Some(result),
            _ => None,
        }
    }

    /// The stored error message, if one is being shown
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::ErrorShown(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the intake surface is the one rendered
    pub fn shows_intake(&self) -> bool {
        self.result().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Timestamp;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            diagnosis: "Normal".into(),
            confidence: 0.91,
            findings: vec!["Clear lung fields".into()],
            recommendations: vec!["Routine follow-up as clinically indicated".into()],
            conditions_probabilities: vec![],
            filename: "a.png".into(),
            timestamp: Timestamp::Text("2024-01-01T00:00:00".into()),
            analysis_id: None,
        }
    }

    #[test]
    fn test_initial_state_is_intake() {
        let state = ViewState::default();
        assert_eq!(state, ViewState::Intake);
        assert!(state.shows_intake());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_success_clears_error() {
        let state = ViewState::ErrorShown("boom".into())
            .apply(ViewEvent::AnalysisSucceeded(sample_result()));
        assert!(state.error().is_none());
        assert_eq!(state.result(), Some(&sample_result()));
    }

    #[test]
    fn test_failure_clears_result() {
        let state = ViewState::ResultShown(sample_result())
            .apply(ViewEvent::AnalysisFailed("late failure".into()));
        assert!(state.result().is_none());
        assert_eq!(state.error(), Some("late failure"));
        assert!(state.shows_intake());
    }

    #[test]
    fn test_start_new_analysis_discards_result() {
        let state = ViewState::Intake
            .apply(ViewEvent::AnalysisSucceeded(sample_result()))
            .apply(ViewEvent::StartNewAnalysis);
        assert_eq!(state, ViewState::Intake);
        assert!(state.result().is_none());
    }

    #[test]
    fn test_dismiss_error_returns_to_intake() {
        let state = ViewState::Intake
            .apply(ViewEvent::AnalysisFailed("x".into()))
            .apply(ViewEvent::DismissError);
        assert_eq!(state, ViewState::Intake);
    }

    #[test]
    fn test_user_actions_ignored_in_wrong_state() {
        assert_eq!(
            ViewState::Intake.apply(ViewEvent::StartNewAnalysis),
            ViewState::Intake
        );
        let shown = ViewState::ResultShown(sample_result());
        assert_eq!(shown.clone().apply(ViewEvent::DismissError), shown);
        let error = ViewState::ErrorShown("x".into());
        assert_eq!(error.clone().apply(ViewEvent::StartNewAnalysis), error);
    }
}
