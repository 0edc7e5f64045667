//! Intake controller
//!
//! Turns raw file selections into submissions and routes their outcomes to
//! an [`IntakeSink`]. Preview derivation and remote submission run as two
//! independent tasks per accepted file; neither waits for the other.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::preview::PreviewImage;
use crate::error::IntakeError;
use crate::service::AnalysisService;
use crate::state::data::{AnalysisResult, UploadCandidate};

/// Receiver of intake outcomes
pub trait IntakeSink {
    fn on_success(&mut self, result: AnalysisResult);
    fn on_error(&mut self, message: String);
    fn on_busy_change(&mut self, busy: bool);
}

/// Window-level drag-and-drop events, one per file
#[derive(Debug, Clone, PartialEq)]
pub enum DropEvent {
    /// A file is being dragged over the window
    Hovered,
    /// The drag left the window without dropping
    Left,
    /// A file was dropped
    Dropped(PathBuf),
}

/// An accepted file, ready for preview and submission
#[derive(Debug, Clone)]
pub struct Submission {
    /// Increases with every accepted file
    pub id: u64,
    pub candidate: Arc<UploadCandidate>,
}

#[derive(Debug, Default)]
pub struct IntakeController {
    /// A drag is hovering over the window
    drag_active: bool,
    /// The current drop gesture already yielded its file
    gesture_taken: bool,
    /// Preview of the most recently derived candidate
    preview: Option<PreviewImage>,
    /// Id handed to the last accepted file
    last_submission: u64,
    /// Submissions that have not reported back yet
    in_flight: usize,
}

impl IntakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn preview(&self) -> Option<&PreviewImage> {
        self.preview.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Track the drop target and pick the file to process, if any.
    ///
    /// The window reports a multi-file drop as consecutive `Dropped`
    /// events. Only the first one of a gesture is returned; the rest are
    /// ignored until the next hover starts a new gesture.
    pub fn handle_drop_event(&mut self, event: DropEvent) -> Option<PathBuf> {
        match event {
            DropEvent::Hovered => {
                self.drag_active = true;
                self.gesture_taken = false;
                None
            }
            DropEvent::Left => {
                self.drag_active = false;
                None
            }
            DropEvent::Dropped(path) => {
                self.drag_active = false;
                if self.gesture_taken {
                    debug!("Ignoring extra dropped file {}", path.display());
                    return None;
                }
                self.gesture_taken = true;
                Some(path)
            }
        }
    }

    /// Validate a candidate and, if it is an image, start a submission.
    ///
    /// Non-images are reported through `sink.on_error` and produce nothing
    /// else: no preview, no request. A new submission does not cancel one
    /// already in flight.
    pub fn accept_file(
        &mut self,
        candidate: UploadCandidate,
        sink: &mut impl IntakeSink,
    ) -> Option<Submission> {
        if !candidate.is_image() {
            let err = IntakeError::InvalidFileType(candidate.media_type.clone());
            warn!("Rejected {}: {}", candidate.name, err);
            sink.on_error(err.user_message());
            return None;
        }

        self.last_submission += 1;
        self.in_flight += 1;
        if self.in_flight > 1 {
            info!(
                "⏳ {} submissions now in flight; responses may arrive out of order",
                self.in_flight
            );
        }

        info!("🔬 Submitting {} as #{}", candidate.name, self.last_submission);
        sink.on_busy_change(true);

        Some(Submission {
            id: self.last_submission,
            candidate: Arc::new(candidate),
        })
    }

    /// Store a freshly derived preview. Last writer wins.
    pub fn set_preview(&mut self, preview: PreviewImage) {
        self.preview = Some(preview);
    }

    /// Route a submission outcome to the sink and clear the busy flag
    pub fn finish(
        &mut self,
        id: u64,
        outcome: Result<AnalysisResult, IntakeError>,
        sink: &mut impl IntakeSink,
    ) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if id != self.last_submission {
            info!("Submission #{} finished after #{} was started", id, self.last_submission);
        }

        match outcome {
            Ok(result) => sink.on_success(result),
            Err(err) => {
                warn!("Submission #{} failed: {}", id, err);
                sink.on_error(err.user_message());
            }
        }
        sink.on_busy_change(false);
    }

    /// Forget the preview and drag state, as a fresh intake surface would
    pub fn reset(&mut self) {
        self.drag_active = false;
        self.gesture_taken = false;
        self.preview = None;
    }
}

/// Submit a candidate, racing the service against a timer.
///
/// Whichever finishes first decides the outcome; the loser is dropped.
pub async fn submit(
    service: Arc<dyn AnalysisService>,
    candidate: Arc<UploadCandidate>,
    limit: Duration,
) -> Result<AnalysisResult, IntakeError> {
    match tokio::time::timeout(limit, service.analyze(&candidate)).await {
        Ok(Err(IntakeError::Timeout(_))) => Err(IntakeError::Timeout(limit)),
        Ok(outcome) => outcome,
        Err(_) => {
            warn!("⏱️  No answer for {} within {:?}", candidate.name, limit);
            Err(IntakeError::Timeout(limit))
        }
    }
}
