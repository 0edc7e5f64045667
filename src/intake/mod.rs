//! Intake module
//!
//! This module handles:
//! - Loading dropped or picked files into upload candidates (candidate.rs)
//! - Preview generation (preview.rs)
//! - Validation, submission and drop-target tracking (controller.rs)

pub mod candidate;
pub mod controller;
pub mod preview;

pub use controller::{submit, DropEvent, IntakeController, IntakeSink};
pub use preview::PreviewImage;
