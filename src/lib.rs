//! Hand gesture classification and dispatch pipeline.
//!
//! Turns streams of hand landmark poses into stable gesture
//! classifications and host commands. Detection runs a set of
//! prioritized classifiers over each pose, stabilizes the raw winner
//! with hysteresis, validates it for confidence stability and duration,
//! and dispatches the result through an event bus to cooldown-throttled
//! handlers.

/// Error types used throughout the crate
pub mod error;

/// Shared constants and default parameters
pub mod constants;

/// Hand landmark model and geometry primitives
pub mod landmarks;

/// Smoothing and outlier-rejection filters
pub mod filters;

/// Gesture classifiers and the detection engine
pub mod gestures;

/// Validation stages for detector output
pub mod validators;

/// Continuous-gesture modality tracking
pub mod modality;

/// Event bus for decoupled dispatch
pub mod events;

/// Gesture-to-command handlers
pub mod handlers;

/// End-to-end pipeline assembly
pub mod pipeline;

/// Configuration loading and validation
pub mod config;

pub use error::{Error, Result};
