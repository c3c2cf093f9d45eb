//! Constants used throughout the application

/// Number of hand landmarks per tracked hand
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Default frames per second assumption
pub const DEFAULT_FPS: f64 = 30.0;

/// Gesture names
pub const GESTURE_PALM: &str = "OPEN_PALM";
pub const GESTURE_FIST: &str = "CLOSED_FIST";
pub const GESTURE_PINCH: &str = "PINCH_DRAG";
pub const GESTURE_V_MOVE: &str = "V_GESTURE_MOVE";
pub const GESTURE_POINTING: &str = "POINTING";
pub const GESTURE_THUMBS_UP: &str = "THUMBS_UP";

/// Default detector parameters
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_HYSTERESIS_WINDOW: usize = 2;

/// Maximum number of results retained in detector history
pub const MAX_GESTURE_HISTORY: usize = 30;

/// Default validator parameters
pub const DEFAULT_STABILITY_FRAMES: usize = 2;
pub const DEFAULT_MIN_DURATION: f64 = 0.0;
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;

/// Default window sizes for filters
pub const DEFAULT_LANDMARK_WINDOW: usize = 3;
pub const DEFAULT_OUTLIER_WINDOW: usize = 7;

/// Default filter parameters
pub const DEFAULT_ONE_EURO_MIN_CUTOFF: f64 = 1.0;
pub const DEFAULT_ONE_EURO_BETA: f64 = 0.0;
pub const DEFAULT_ONE_EURO_D_CUTOFF: f64 = 1.0;
pub const DEFAULT_OUTLIER_Z_THRESHOLD: f64 = 3.0;

/// One-euro clock-jump threshold: gaps beyond this reset the filter (seconds)
pub const ONE_EURO_RESET_GAP: f64 = 1.0;

/// Classifier thresholds
pub const PINCH_DISTANCE_THRESHOLD: f64 = 0.05;
pub const FIST_THUMB_TUCK_THRESHOLD: f64 = 0.06;
pub const ANCHOR_JITTER_FLOOR: f64 = 0.002;
pub const V_FINGER_SPREAD_MIN: f64 = 0.03;
pub const V_FINGER_SPREAD_MAX: f64 = 0.18;
pub const V_THUMB_EXTENSION_RATIO_MAX: f64 = 2.5;
pub const V_CURL_DISTANCE_THRESHOLD: f64 = 0.1;

/// Default handler parameters
pub const DEFAULT_HANDLER_COOLDOWN: f64 = 0.1;
pub const DEFAULT_FRAME_STEP: f64 = 1.0;
pub const DEFAULT_MOVEMENT_DEADZONE: f64 = 0.001;
pub const DEFAULT_PAN_SENSITIVITY: f64 = 150.0;
pub const DEFAULT_ROTATE_SENSITIVITY: f64 = 20.0;
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.85;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
