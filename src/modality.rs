//! Modality management for continuous gestures.
//!
//! Continuous gestures steer one of two interaction modes: pinch drag
//! rotates, V-gesture pans. The manager tracks which mode is active and
//! owns the anchor used to turn absolute gesture positions into per-tick
//! deltas, so a mode switch never inherits the previous mode's anchor.

use crate::constants::{GESTURE_PINCH, GESTURE_V_MOVE};
use crate::gestures::GestureResult;
use log::debug;
use std::collections::HashMap;

/// Continuous interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// Orbit the viewport (pinch drag)
    Rotation,
    /// Pan the viewport (V-gesture)
    Navigation,
}

/// Standard trigger map: pinch rotates, V-gesture pans
#[must_use]
pub fn default_triggers() -> HashMap<String, Modality> {
    HashMap::from([
        (GESTURE_PINCH.to_string(), Modality::Rotation),
        (GESTURE_V_MOVE.to_string(), Modality::Navigation),
    ])
}

/// Movement sample produced by the modality manager for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalMovement {
    pub modality: Modality,
    pub dx: f64,
    pub dy: f64,
}

/// Tracks the active modality and converts gesture center positions into
/// movement deltas relative to a per-modality anchor.
pub struct ModalityManager {
    triggers: HashMap<String, Modality>,
    active: Option<Modality>,
    anchor: Option<(f64, f64)>,
}

impl Default for ModalityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalityManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_triggers(default_triggers())
    }

    /// Build a manager with a custom gesture-to-modality trigger map
    #[must_use]
    pub fn with_triggers(triggers: HashMap<String, Modality>) -> Self {
        Self {
            triggers,
            active: None,
            anchor: None,
        }
    }

    /// Currently active modality, if a continuous gesture is engaged
    #[must_use]
    pub fn active(&self) -> Option<Modality> {
        self.active
    }

    /// Feed a confirmed gesture result for the tick.
    ///
    /// Non-continuous gestures deactivate any running modality. A modality
    /// switch (or fresh engagement) re-anchors, so the first movement
    /// sample of a mode is always (0, 0).
    pub fn update(&mut self, result: &GestureResult) -> Option<ModalMovement> {
        let Some(modality) = self.triggers.get(result.name()).copied() else {
            self.clear();
            return None;
        };

        let center = (
            result.data().get("center_x").copied().unwrap_or(0.0),
            result.data().get("center_y").copied().unwrap_or(0.0),
        );

        if self.active != Some(modality) {
            debug!("Modality switch: {:?} -> {modality:?}", self.active);
            self.active = Some(modality);
            self.anchor = Some(center);
            return Some(ModalMovement {
                modality,
                dx: 0.0,
                dy: 0.0,
            });
        }

        let (ax, ay) = self.anchor.unwrap_or(center);
        let movement = ModalMovement {
            modality,
            dx: center.0 - ax,
            dy: center.1 - ay,
        };
        self.anchor = Some(center);
        Some(movement)
    }

    /// Drop the active modality and its anchor (hand lost, gesture ended)
    pub fn clear(&mut self) {
        if self.active.is_some() {
            debug!("Modality cleared");
        }
        self.active = None;
        self.anchor = None;
    }
}
