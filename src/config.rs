//! Configuration handling with YAML file support.

use crate::constants::{
    DEFAULT_HANDLER_COOLDOWN, DEFAULT_HYSTERESIS_WINDOW, DEFAULT_LANDMARK_WINDOW, DEFAULT_MIN_CONFIDENCE,
    DEFAULT_MIN_DURATION, DEFAULT_MIN_VISIBILITY, DEFAULT_STABILITY_FRAMES, GESTURE_FIST, GESTURE_PALM,
    GESTURE_PINCH, GESTURE_POINTING, GESTURE_THUMBS_UP, GESTURE_V_MOVE, PINCH_DISTANCE_THRESHOLD,
    V_FINGER_SPREAD_MAX, V_FINGER_SPREAD_MIN,
};
use crate::handlers::HandlerConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Example configuration in YAML format
pub const EXAMPLE_CONFIG: &str = r#"# Gesture pipeline configuration
detector:
  min_confidence: 0.6
  hysteresis_window: 2

filter:
  kind: moving_average
  landmark_window: 3

validators:
  min_confidence: 0.6
  stability_frames: 2
  min_duration: 0.0
  min_visibility: 0.5

gestures:
  enabled:
    - OPEN_PALM
    - CLOSED_FIST
    - PINCH_DRAG
    - V_GESTURE_MOVE
    - POINTING
    - THUMBS_UP
  pinch_threshold: 0.05
  v_spread_min: 0.03
  v_spread_max: 0.18

modality:
  triggers:
    PINCH_DRAG: rotation
    V_GESTURE_MOVE: navigation

handlers:
  viewport:
    enabled: true
    priority: 10
    gestures: [PINCH_DRAG, V_GESTURE_MOVE]
    cooldown: 0.0
    sensitivity: 1.0
    invert_x: false
    invert_y: false
  animation:
    enabled: true
    priority: 0
    gestures: [OPEN_PALM, CLOSED_FIST, POINTING]
    cooldown: 0.1
    sensitivity: 1.0
    invert_x: false
    invert_y: false
"#;

/// Detector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub min_confidence: f64,
    pub hysteresis_window: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            hysteresis_window: DEFAULT_HYSTERESIS_WINDOW,
        }
    }
}

/// Landmark filter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// One of "none", "moving_average", "one_euro", "outlier"
    pub kind: String,
    pub landmark_window: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: "moving_average".to_string(),
            landmark_window: DEFAULT_LANDMARK_WINDOW,
        }
    }
}

/// Validation stage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Confidence floor for the stability check, independent of the
    /// detector's own floor
    pub min_confidence: f64,
    pub stability_frames: usize,
    pub min_duration: f64,
    pub min_visibility: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            stability_frames: DEFAULT_STABILITY_FRAMES,
            min_duration: DEFAULT_MIN_DURATION,
            min_visibility: DEFAULT_MIN_VISIBILITY,
        }
    }
}

/// Modality trigger settings: gesture name to mode name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalityConfig {
    pub triggers: std::collections::HashMap<String, String>,
}

impl Default for ModalityConfig {
    fn default() -> Self {
        Self {
            triggers: std::collections::HashMap::from([
                (GESTURE_PINCH.to_string(), "rotation".to_string()),
                (GESTURE_V_MOVE.to_string(), "navigation".to_string()),
            ]),
        }
    }
}

/// Gesture classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GesturesConfig {
    /// Gesture names to register; unknown names are a validation error
    pub enabled: Vec<String>,
    pub pinch_threshold: f64,
    pub v_spread_min: f64,
    pub v_spread_max: f64,
}

impl Default for GesturesConfig {
    fn default() -> Self {
        Self {
            enabled: vec![
                GESTURE_PALM.to_string(),
                GESTURE_FIST.to_string(),
                GESTURE_PINCH.to_string(),
                GESTURE_V_MOVE.to_string(),
                GESTURE_POINTING.to_string(),
                GESTURE_THUMBS_UP.to_string(),
            ],
            pinch_threshold: PINCH_DISTANCE_THRESHOLD,
            v_spread_min: V_FINGER_SPREAD_MIN,
            v_spread_max: V_FINGER_SPREAD_MAX,
        }
    }
}

/// Handler settings, one section per built-in handler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlersConfig {
    pub viewport: HandlerConfig,
    pub animation: HandlerConfig,
}

impl Default for HandlersConfig {
    fn default() -> Self {
        Self {
            viewport: HandlerConfig {
                priority: 10,
                gestures: vec![GESTURE_PINCH.to_string(), GESTURE_V_MOVE.to_string()],
                cooldown: 0.0,
                ..HandlerConfig::default()
            },
            animation: HandlerConfig {
                gestures: vec![
                    GESTURE_PALM.to_string(),
                    GESTURE_FIST.to_string(),
                    GESTURE_POINTING.to_string(),
                ],
                cooldown: DEFAULT_HANDLER_COOLDOWN,
                ..HandlerConfig::default()
            },
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub filter: FilterConfig,
    pub validators: ValidatorConfig,
    pub gestures: GesturesConfig,
    pub handlers: HandlersConfig,
    pub modality: ModalityConfig,
}

const KNOWN_GESTURES: [&str; 6] = [
    GESTURE_PALM,
    GESTURE_FIST,
    GESTURE_PINCH,
    GESTURE_V_MOVE,
    GESTURE_POINTING,
    GESTURE_THUMBS_UP,
];

const KNOWN_FILTERS: [&str; 4] = ["none", "moving_average", "one_euro", "outlier"];

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&contents).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check all settings for consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detector.min_confidence) {
            return Err(Error::Config(format!(
                "detector.min_confidence must be within 0.0-1.0, got {}",
                self.detector.min_confidence
            )));
        }
        if self.detector.hysteresis_window == 0 {
            return Err(Error::Config("detector.hysteresis_window must be greater than 0".to_string()));
        }
        if !KNOWN_FILTERS.contains(&self.filter.kind.as_str()) {
            return Err(Error::Config(format!("Unknown filter kind: {}", self.filter.kind)));
        }
        if self.filter.landmark_window == 0 {
            return Err(Error::Config("filter.landmark_window must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.validators.min_confidence) {
            return Err(Error::Config(format!(
                "validators.min_confidence must be within 0.0-1.0, got {}",
                self.validators.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.validators.min_visibility) {
            return Err(Error::Config(format!(
                "validators.min_visibility must be within 0.0-1.0, got {}",
                self.validators.min_visibility
            )));
        }
        if self.validators.min_duration < 0.0 {
            return Err(Error::Config("validators.min_duration must not be negative".to_string()));
        }
        for name in &self.gestures.enabled {
            if !KNOWN_GESTURES.contains(&name.as_str()) {
                return Err(Error::Config(format!("Unknown gesture: {name}")));
            }
        }
        if self.gestures.pinch_threshold <= 0.0 {
            return Err(Error::Config("gestures.pinch_threshold must be positive".to_string()));
        }
        if self.gestures.v_spread_min >= self.gestures.v_spread_max {
            return Err(Error::Config("gestures.v_spread_min must be below v_spread_max".to_string()));
        }
        for (gesture, mode) in &self.modality.triggers {
            if !KNOWN_GESTURES.contains(&gesture.as_str()) {
                return Err(Error::Config(format!("Unknown gesture in modality.triggers: {gesture}")));
            }
            if mode != "rotation" && mode != "navigation" {
                return Err(Error::Config(format!("Unknown modality: {mode}")));
            }
        }
        for (name, handler) in [("viewport", &self.handlers.viewport), ("animation", &self.handlers.animation)] {
            if handler.cooldown < 0.0 {
                return Err(Error::Config(format!("handlers.{name}.cooldown must not be negative")));
            }
            if handler.sensitivity <= 0.0 {
                return Err(Error::Config(format!("handlers.{name}.sensitivity must be positive")));
            }
        }
        Ok(())
    }
}
