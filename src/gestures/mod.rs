//! Gesture classification infrastructure.
//!
//! A classifier is a named, prioritized predicate over a hand pose that
//! yields an optional scored result. The detector in [`detector`] owns the
//! registered classifiers and stabilizes their raw output with hysteresis.

/// Gesture detector with hysteresis stabilization
pub mod detector;

/// Static gestures (open palm, closed fist)
pub mod basic;

/// Continuous navigation gestures (pinch drag, V-gesture move)
pub mod navigation;

/// Advanced static gestures (pointing, thumbs up)
pub mod advanced;

use crate::landmarks::HandPose;
use crate::{Error, Result};
use std::collections::HashMap;

/// One classifier's verdict for a tick
#[derive(Debug, Clone, PartialEq)]
pub struct GestureResult {
    name: String,
    confidence: f64,
    data: HashMap<String, f64>,
    timestamp: f64,
}

impl GestureResult {
    /// Create a result, validating the confidence range
    pub fn new(name: impl Into<String>, confidence: f64, timestamp: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::InvalidConfidence(confidence));
        }
        Ok(Self {
            name: name.into(),
            confidence,
            data: HashMap::new(),
            timestamp,
        })
    }

    /// Attach a named numeric datum (builder style)
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: f64) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    #[must_use]
    pub fn data(&self) -> &HashMap<String, f64> {
        &self.data
    }

    #[must_use]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

impl std::fmt::Display for GestureResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2})", self.name, self.confidence)
    }
}

/// Context passed to classifiers during detection
pub struct DetectionContext<'a> {
    /// Tick timestamp in seconds, caller-supplied
    pub timestamp: f64,
    /// Recent confirmed results, newest last
    pub history: &'a [GestureResult],
}

/// A named, prioritized predicate over a hand pose.
///
/// `detect` returns `Ok(None)` when the predicate fails, `Ok(Some(..))`
/// with a scored result when it holds, and `Err` only for true failures
/// (which the detector logs and treats as "no result").
pub trait Gesture: Send {
    /// Unique gesture name
    fn name(&self) -> &str;

    /// Detection priority (higher = checked first)
    fn priority(&self) -> i32 {
        0
    }

    /// Human-readable description
    fn description(&self) -> String {
        format!("{} gesture", self.name())
    }

    /// Evaluate the pose, yielding an optional scored result
    fn detect(&mut self, pose: &HandPose, ctx: &DetectionContext<'_>) -> Result<Option<GestureResult>>;

    /// Clear any private tracking state (anchor positions etc.)
    fn reset(&mut self) {}
}
