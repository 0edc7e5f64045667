use iced::widget::{column, container, scrollable, stack};
use iced::{window, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod format;
mod intake;
mod service;
mod state;
mod ui;

use config::Settings;
use error::IntakeError;
use intake::candidate::{load_candidate, PICKER_EXTENSIONS};
use intake::preview::derive_preview;
use intake::{DropEvent, IntakeController, IntakeSink, PreviewImage};
use service::{AnalysisService, HttpAnalysisService, ServiceHealth};
use state::data::{AnalysisResult, UploadCandidate};
use state::session::Session;

/// Main application state
struct RadAssist {
    /// View state machine and busy flag
    session: Session,
    /// Drop target, preview and submission bookkeeping
    intake: IntakeController,
    /// Where images are sent for analysis
    service: Arc<dyn AnalysisService>,
    settings: Settings,
    /// Footer line describing the last health check
    service_status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the drop area to browse for a file
    BrowseRequested,
    /// Drag-and-drop activity over the window
    Drop(DropEvent),
    /// A picked or dropped file finished loading from disk
    CandidateLoaded(Result<UploadCandidate, IntakeError>),
    /// Background preview derivation completed
    PreviewReady(Option<PreviewImage>),
    /// Submission with the given id completed, failed or timed out
    AnalysisFinished(u64, Result<AnalysisResult, IntakeError>),
    /// User clicked "Analyze New Image"
    StartNewAnalysis,
    /// User clicked "Try Again" on the error notice
    DismissError,
    /// Startup health check completed
    HealthChecked(Result<ServiceHealth, IntakeError>),
}

impl RadAssist {
    /// Create a new instance of the application
    fn new(settings: Settings) -> (Self, Task<Message>) {
        // Without an HTTP client there is nothing this app can do
        let service: Arc<dyn AnalysisService> = Arc::new(
            HttpAnalysisService::new(&settings).expect("Failed to create HTTP client"),
        );

        info!(
            "🩺 RadAssist initialized against {} (timeout {:?})",
            settings.analyze_url(),
            settings.timeout
        );

        let health = {
            let service = service.clone();
            Task::perform(async move { service.health().await }, Message::HealthChecked)
        };

        (
            RadAssist {
                session: Session::new(),
                intake: IntakeController::new(),
                service,
                settings,
                service_status: "Service: checking...".to_string(),
            },
            health,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BrowseRequested => {
                let file = FileDialog::new()
                    .set_title("Select Medical Image")
                    .add_filter("Images", PICKER_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => self.load(path),
                    None => Task::none(),
                }
            }
            Message::Drop(event) => {
                // the drop target only exists on the intake surface
                if !self.session.view().shows_intake() {
                    return Task::none();
                }
                match self.intake.handle_drop_event(event) {
                    Some(path) => self.load(path),
                    None => Task::none(),
                }
            }
            Message::CandidateLoaded(Ok(candidate)) => {
                let Some(submission) = self.intake.accept_file(candidate, &mut self.session)
                else {
                    return Task::none();
                };

                let id = submission.id;
                let preview = Task::perform(
                    derive_preview(submission.candidate.clone()),
                    Message::PreviewReady,
                );
                let analysis = Task::perform(
                    intake::submit(
                        self.service.clone(),
                        submission.candidate,
                        self.settings.timeout,
                    ),
                    move |outcome| Message::AnalysisFinished(id, outcome),
                );

                Task::batch([preview, analysis])
            }
            Message::CandidateLoaded(Err(err)) => {
                warn!("⚠️  {}", err);
                self.session.on_error(err.user_message());
                Task::none()
            }
            Message::PreviewReady(preview) => {
                if let Some(preview) = preview {
                    self.intake.set_preview(preview);
                }
                Task::none()
            }
            Message::AnalysisFinished(id, outcome) => {
                self.intake.finish(id, outcome, &mut self.session);
                Task::none()
            }
            Message::StartNewAnalysis => {
                self.session.start_new_analysis();
                self.intake.reset();
                Task::none()
            }
            Message::DismissError => {
                self.session.dismiss_error();
                Task::none()
            }
            Message::HealthChecked(outcome) => {
                self.service_status = match outcome {
                    Ok(health) if health.is_healthy() => {
                        info!("💚 Service healthy (reported at {:?})", health.timestamp);
                        "Service: healthy".to_string()
                    }
                    Ok(health) => format!("Service: {}", health.status),
                    Err(err) => {
                        warn!("Health check failed: {}", err);
                        "Service: unreachable".to_string()
                    }
                };
                Task::none()
            }
        }
    }

    /// Read a file in the background, then hand it to the intake controller
    fn load(&self, path: PathBuf) -> Task<Message> {
        info!("📂 Selected {}", path.display());
        Task::perform(load_candidate(path), Message::CandidateLoaded)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let surface = match self.session.view().result() {
            Some(result) => ui::results::view(result),
            None => ui::intake::view(&self.intake, self.session.is_busy()),
        };

        let page = column![
            ui::header(),
            scrollable(container(surface).padding(20).width(Length::Fill)).height(Length::Fill),
            ui::footer(&self.service_status),
        ]
        .width(Length::Fill)
        .height(Length::Fill);

        match self.session.view().error() {
            Some(message) => stack![page, ui::error_overlay(message)].into(),
            None => page.into(),
        }
    }

    /// Window file events drive the drop target
    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(window::Event::FileHovered(_)) => {
                Some(Message::Drop(DropEvent::Hovered))
            }
            iced::Event::Window(window::Event::FilesHoveredLeft) => {
                Some(Message::Drop(DropEvent::Left))
            }
            iced::Event::Window(window::Event::FileDropped(path)) => {
                Some(Message::Drop(DropEvent::Dropped(path)))
            }
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("radassist=info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    let settings = config::load().unwrap_or_else(|err| {
        warn!("⚠️  {}; falling back to default settings", err);
        Settings::default()
    });

    iced::application("RadAssist", RadAssist::update, RadAssist::view)
        .subscription(RadAssist::subscription)
        .theme(RadAssist::theme)
        .centered()
        .run_with(move || RadAssist::new(settings))
}
