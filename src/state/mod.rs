//! State management module
//!
//! This module handles all application state, including:
//! - Shared data structures (data.rs)
//! - The view state machine (view.rs)
//! - The session that receives intake outcomes (session.rs)

pub mod data;
pub mod session;
pub mod view;
