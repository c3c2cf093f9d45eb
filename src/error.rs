//! Error types for the gesture pipeline library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Gesture result constructed with a confidence outside [0, 1]
    #[error("Confidence must be within 0.0-1.0, got {0}")]
    InvalidConfidence(f64),

    /// A classifier failed while evaluating a pose
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// A handler failed while processing an event
    #[error("Handler error: {0}")]
    Handler(String),

    /// Event constructed with invalid fields
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Filter initialization or processing error
    #[error("Filter error: {0}")]
    Filter(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
