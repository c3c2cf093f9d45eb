//! Validation stages applied to detector output before dispatch.
//!
//! Each validator is a small stateful gate: confidence stability across
//! consecutive ticks, landmark quality, and minimum gesture duration.

use crate::constants::{DEFAULT_MIN_DURATION, DEFAULT_MIN_VISIBILITY, DEFAULT_STABILITY_FRAMES};
use crate::gestures::GestureResult;
use crate::landmarks::HandPose;
use log::debug;

/// Passes a gesture only after it has been seen with sufficient confidence
/// for a number of consecutive ticks.
///
/// A differently-named result restarts the run; the new result itself
/// counts as the first tick of its own run.
pub struct ConfidenceValidator {
    min_confidence: f64,
    stability_frames: usize,
    current_name: Option<String>,
    run_length: usize,
}

impl ConfidenceValidator {
    #[must_use]
    pub fn new(min_confidence: f64, stability_frames: usize) -> Self {
        Self {
            min_confidence,
            stability_frames,
            current_name: None,
            run_length: 0,
        }
    }

    pub fn validate(&mut self, result: &GestureResult) -> bool {
        if result.confidence() < self.min_confidence {
            self.reset();
            return false;
        }

        if self.current_name.as_deref() == Some(result.name()) {
            self.run_length += 1;
        } else {
            self.current_name = Some(result.name().to_string());
            self.run_length = 1;
        }

        let passed = self.run_length >= self.stability_frames;
        if !passed {
            debug!(
                "Gesture {} stabilizing: {}/{}",
                result.name(),
                self.run_length,
                self.stability_frames
            );
        }
        passed
    }

    pub fn reset(&mut self) {
        self.current_name = None;
        self.run_length = 0;
    }
}

impl Default for ConfidenceValidator {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_MIN_CONFIDENCE, DEFAULT_STABILITY_FRAMES)
    }
}

/// Rejects poses whose tracking quality falls below a floor.
///
/// Two signals are checked: the provider's whole-hand track score and
/// the mean per-landmark visibility. Providers that supply no signal
/// report zeros; an absent signal passes rather than false-rejecting.
pub struct QualityValidator {
    min_visibility: f64,
}

impl QualityValidator {
    #[must_use]
    pub fn new(min_visibility: f64) -> Self {
        Self { min_visibility }
    }

    #[must_use]
    pub fn validate(&self, pose: &HandPose) -> bool {
        if pose.score > 0.0 && pose.score < self.min_visibility {
            return false;
        }

        let sum: f64 = pose.landmarks.iter().map(|lm| lm.visibility).sum();
        if sum == 0.0 {
            return true;
        }
        let mean = sum / pose.landmarks.len() as f64;
        mean >= self.min_visibility
    }
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_VISIBILITY)
    }
}

/// Passes a gesture only after it has been held for a minimum duration.
///
/// Tracks the timestamp at which the current gesture name first appeared;
/// a name change restarts the clock. With a zero minimum every result
/// passes immediately.
pub struct TemporalValidator {
    min_duration: f64,
    current_name: Option<String>,
    started_at: f64,
}

impl TemporalValidator {
    #[must_use]
    pub fn new(min_duration: f64) -> Self {
        Self {
            min_duration,
            current_name: None,
            started_at: 0.0,
        }
    }

    pub fn validate(&mut self, result: &GestureResult) -> bool {
        if self.current_name.as_deref() != Some(result.name()) {
            self.current_name = Some(result.name().to_string());
            self.started_at = result.timestamp();
        }
        result.timestamp() - self.started_at >= self.min_duration
    }

    pub fn reset(&mut self) {
        self.current_name = None;
        self.started_at = 0.0;
    }
}

impl Default for TemporalValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Handedness, Landmark, NUM_HAND_LANDMARKS};

    fn result(name: &str, confidence: f64, timestamp: f64) -> GestureResult {
        GestureResult::new(name, confidence, timestamp).unwrap()
    }

    #[test]
    fn test_confidence_validator_requires_stability() {
        let mut validator = ConfidenceValidator::new(0.6, 2);
        assert!(!validator.validate(&result("A", 0.9, 0.0)));
        assert!(validator.validate(&result("A", 0.9, 0.033)));
        assert!(validator.validate(&result("A", 0.9, 0.066)));
    }

    #[test]
    fn test_confidence_validator_name_change_restarts_run() {
        let mut validator = ConfidenceValidator::new(0.6, 2);
        validator.validate(&result("A", 0.9, 0.0));
        validator.validate(&result("A", 0.9, 0.033));
        assert!(!validator.validate(&result("B", 0.9, 0.066)));
        assert!(validator.validate(&result("B", 0.9, 0.1)));
    }

    #[test]
    fn test_confidence_validator_low_confidence_resets() {
        let mut validator = ConfidenceValidator::new(0.6, 2);
        validator.validate(&result("A", 0.9, 0.0));
        assert!(!validator.validate(&result("A", 0.3, 0.033)));
        assert!(!validator.validate(&result("A", 0.9, 0.066)));
        assert!(validator.validate(&result("A", 0.9, 0.1)));
    }

    #[test]
    fn test_quality_validator_visibility_floor() {
        let validator = QualityValidator::new(0.5);
        let mut pose = HandPose::new([Landmark::default(); NUM_HAND_LANDMARKS], Handedness::Right, 1.0);

        // All-zero visibility means no signal: pass
        assert!(validator.validate(&pose));

        for lm in &mut pose.landmarks {
            lm.visibility = 0.3;
        }
        assert!(!validator.validate(&pose));

        for lm in &mut pose.landmarks {
            lm.visibility = 0.8;
        }
        assert!(validator.validate(&pose));
    }

    #[test]
    fn test_quality_validator_track_score_floor() {
        let validator = QualityValidator::new(0.5);
        let mut pose = HandPose::new([Landmark::default(); NUM_HAND_LANDMARKS], Handedness::Right, 0.2);
        assert!(!validator.validate(&pose));

        pose.score = 0.9;
        assert!(validator.validate(&pose));

        // Zero score means the provider supplies none: pass
        pose.score = 0.0;
        assert!(validator.validate(&pose));
    }

    #[test]
    fn test_temporal_validator_duration_gate() {
        let mut validator = TemporalValidator::new(0.1);
        assert!(!validator.validate(&result("A", 0.9, 0.0)));
        assert!(!validator.validate(&result("A", 0.9, 0.05)));
        assert!(validator.validate(&result("A", 0.9, 0.1)));
        // Name change restarts the clock
        assert!(!validator.validate(&result("B", 0.9, 0.15)));
        assert!(validator.validate(&result("B", 0.9, 0.25)));
    }

    #[test]
    fn test_temporal_validator_zero_duration_passes_immediately() {
        let mut validator = TemporalValidator::new(0.0);
        assert!(validator.validate(&result("A", 0.9, 0.0)));
    }
}
