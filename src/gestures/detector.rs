//! Gesture detection engine with hysteresis stabilization.
//!
//! Runs every registered classifier against the tick's pose, picks the
//! highest-confidence result above the threshold as the raw classification,
//! and confirms it only once the recent raw window agrees. This prevents
//! oscillation at classification boundaries without requiring a full
//! re-agreement after a single-tick flicker back to the prior gesture.

use crate::constants::{DEFAULT_HYSTERESIS_WINDOW, DEFAULT_MIN_CONFIDENCE, MAX_GESTURE_HISTORY};
use crate::gestures::{DetectionContext, Gesture, GestureResult};
use crate::landmarks::HandPose;
use log::{debug, error, info, warn};
use std::collections::{HashMap, VecDeque};

/// Detector hysteresis state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorState {
    /// No hand present
    NoHand,
    /// Hand present, no gesture confirmed yet
    Stabilizing,
    /// A gesture has been confirmed and is the sticky candidate
    Confirmed(String),
}

/// Detection statistics snapshot
#[derive(Debug, Clone)]
pub struct DetectorStats {
    pub total_detections: u64,
    pub registered_gestures: usize,
    pub history_size: usize,
    pub gesture_counts: HashMap<String, u64>,
}

/// Main gesture detection engine.
///
/// Owns the classifier registry, performs per-tick detection, applies
/// hysteresis, and maintains a bounded history of emitted results.
pub struct GestureDetector {
    gestures: Vec<Box<dyn Gesture>>,
    min_confidence: f64,
    hysteresis_window: usize,
    raw_window: VecDeque<Option<String>>,
    state: DetectorState,
    history: Vec<GestureResult>,
    detection_count: u64,
}

impl GestureDetector {
    /// Create a detector with the given confidence floor and raw-window size
    ///
    /// # Panics
    ///
    /// Panics if `hysteresis_window` is zero
    #[must_use]
    pub fn new(min_confidence: f64, hysteresis_window: usize) -> Self {
        assert!(hysteresis_window > 0, "Hysteresis window must be greater than 0");
        info!("GestureDetector initialized with min_confidence={min_confidence}");
        Self {
            gestures: Vec::new(),
            min_confidence,
            hysteresis_window,
            raw_window: VecDeque::with_capacity(hysteresis_window),
            state: DetectorState::NoHand,
            history: Vec::new(),
            detection_count: 0,
        }
    }

    /// Register a classifier. A duplicate name replaces the old entry.
    pub fn register(&mut self, gesture: Box<dyn Gesture>) {
        if self.gestures.iter().any(|g| g.name() == gesture.name()) {
            warn!("Overwriting existing gesture: {}", gesture.name());
            self.gestures.retain(|g| g.name() != gesture.name());
        }

        debug!("Registered gesture: {} (priority={})", gesture.name(), gesture.priority());
        self.gestures.push(gesture);
        // Highest priority first; stable, so ties keep registration order
        self.gestures.sort_by_key(|g| std::cmp::Reverse(g.priority()));
    }

    /// Remove a classifier from detection
    pub fn unregister(&mut self, gesture_name: &str) {
        self.gestures.retain(|g| g.name() != gesture_name);
        debug!("Unregistered gesture: {gesture_name}");
    }

    /// Run all classifiers against a pose.
    ///
    /// Returns every result at or above the confidence floor, sorted by
    /// confidence (highest first). A failing classifier is logged and
    /// contributes no result; the others still run.
    pub fn detect(&mut self, pose: &HandPose, timestamp: f64) -> Vec<GestureResult> {
        let ctx = DetectionContext {
            timestamp,
            history: &self.history,
        };

        let mut results = Vec::new();
        for gesture in &mut self.gestures {
            match gesture.detect(pose, &ctx) {
                Ok(Some(result)) if result.confidence() >= self.min_confidence => results.push(result),
                Ok(_) => {}
                Err(e) => error!("Error detecting {}: {e}", gesture.name()),
            }
        }

        results.sort_by(|a, b| {
            b.confidence()
                .partial_cmp(&a.confidence())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        self.detection_count += 1;
        results
    }

    /// Detect the tick's best gesture, stabilized by hysteresis.
    ///
    /// A `None` pose is the "no hand" input: it clears the raw window, all
    /// classifier anchors, and the confirmed state.
    pub fn detect_best(&mut self, pose: Option<&HandPose>, timestamp: f64) -> Option<GestureResult> {
        let Some(pose) = pose else {
            self.clear_hand();
            return None;
        };

        if self.state == DetectorState::NoHand {
            self.state = DetectorState::Stabilizing;
        }

        let raw = self.detect(pose, timestamp).into_iter().next();

        if self.raw_window.len() >= self.hysteresis_window {
            self.raw_window.pop_front();
        }
        self.raw_window.push_back(raw.as_ref().map(|r| r.name().to_string()));

        let result = raw?;

        let agreed = self
            .raw_window
            .iter()
            .all(|entry| entry.as_deref() == Some(result.name()));

        if agreed {
            if !matches!(&self.state, DetectorState::Confirmed(name) if name == result.name()) {
                debug!("Confirmed gesture: {}", result.name());
            }
            self.state = DetectorState::Confirmed(result.name().to_string());
            self.remember(result.clone());
            return Some(result);
        }

        // Sticky: a flicker back to the confirmed gesture keeps reporting it
        if matches!(&self.state, DetectorState::Confirmed(name) if name == result.name()) {
            self.remember(result.clone());
            return Some(result);
        }

        None
    }

    fn remember(&mut self, result: GestureResult) {
        self.history.push(result);
        if self.history.len() > MAX_GESTURE_HISTORY {
            self.history.remove(0);
        }
    }

    /// Clear per-hand tracking: raw window, classifier anchors, confirmation
    pub fn clear_hand(&mut self) {
        self.raw_window.clear();
        self.state = DetectorState::NoHand;
        for gesture in &mut self.gestures {
            gesture.reset();
        }
    }

    /// Current hysteresis state
    #[must_use]
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// Get detection statistics
    #[must_use]
    pub fn stats(&self) -> DetectorStats {
        let mut gesture_counts: HashMap<String, u64> = HashMap::new();
        for result in &self.history {
            *gesture_counts.entry(result.name().to_string()).or_insert(0) += 1;
        }

        DetectorStats {
            total_detections: self.detection_count,
            registered_gestures: self.gestures.len(),
            history_size: self.history.len(),
            gesture_counts,
        }
    }

    /// Reset detection history, statistics, and hysteresis state
    pub fn reset(&mut self) {
        self.history.clear();
        self.detection_count = 0;
        self.clear_hand();
        info!("Detector reset");
    }
}
