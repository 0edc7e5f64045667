//! Application-level session state
//!
//! Holds the view state machine and the busy flag, and receives intake
//! outcomes through [`IntakeSink`].

use tracing::info;

use super::data::AnalysisResult;
use super::view::{ViewEvent, ViewState};
use crate::format::format_instant;
use crate::intake::IntakeSink;

#[derive(Debug, Default)]
pub struct Session {
    view: ViewState,
    busy: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// True while at least one submission has not yet reported back
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// "Analyze New Image": drop the stored result and return to intake
    pub fn start_new_analysis(&mut self) {
        self.transition(ViewEvent::StartNewAnalysis);
    }

    /// "Try Again": clear the error notice
    pub fn dismiss_error(&mut self) {
        self.transition(ViewEvent::DismissError);
    }

    fn transition(&mut self, event: ViewEvent) {
        let current = std::mem::take(&mut self.view);
        self.view = current.apply(event);
    }
}

impl IntakeSink for Session {
    fn on_success(&mut self, result: AnalysisResult) {
        info!(
            "🩺 Showing result: {} ({:.3}) analyzed {}",
            result.diagnosis,
            result.confidence,
            format_instant(&result.timestamp)
        );
        self.transition(ViewEvent::AnalysisSucceeded(result));
    }

    fn on_error(&mut self, message: String) {
        info!("⚠️  Showing error: {}", message);
        self.transition(ViewEvent::AnalysisFailed(message));
    }

    fn on_busy_change(&mut self, busy: bool) {
        self.busy = busy;
    }
}
