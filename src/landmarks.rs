//! Hand landmark data model and geometry primitives.
//!
//! Single source of truth for landmark indices, plus the pure geometric
//! predicates the classifiers are built from.

pub use crate::constants::NUM_HAND_LANDMARKS;
use serde::{Deserialize, Serialize};

/// One tracked keypoint in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized horizontal position (roughly 0..1)
    pub x: f64,
    /// Normalized vertical position (roughly 0..1)
    pub y: f64,
    /// Relative depth
    pub z: f64,
    /// Tracking visibility signal, 0.0 when the provider supplies none
    pub visibility: f64,
}

impl Landmark {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 0.0,
        }
    }
}

/// Which hand the pose belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One hand's full keypoint set for a single tick
#[derive(Debug, Clone)]
pub struct HandPose {
    /// Ordered landmark set, indexed by the constants below
    pub landmarks: [Landmark; NUM_HAND_LANDMARKS],
    pub handedness: Handedness,
    /// Track quality reported by the provider
    pub score: f64,
}

impl HandPose {
    #[must_use]
    pub fn new(landmarks: [Landmark; NUM_HAND_LANDMARKS], handedness: Handedness, score: f64) -> Self {
        Self {
            landmarks,
            handedness,
            score,
        }
    }

    /// Landmark accessor by index constant
    #[must_use]
    pub fn landmark(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }
}

// Landmark indices (MediaPipe hand topology)
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_FINGER_MCP: usize = 5;
pub const INDEX_FINGER_PIP: usize = 6;
pub const INDEX_FINGER_DIP: usize = 7;
pub const INDEX_FINGER_TIP: usize = 8;
pub const MIDDLE_FINGER_MCP: usize = 9;
pub const MIDDLE_FINGER_PIP: usize = 10;
pub const MIDDLE_FINGER_DIP: usize = 11;
pub const MIDDLE_FINGER_TIP: usize = 12;
pub const RING_FINGER_MCP: usize = 13;
pub const RING_FINGER_PIP: usize = 14;
pub const RING_FINGER_DIP: usize = 15;
pub const RING_FINGER_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Finger tips, thumb first
pub const FINGER_TIPS: [usize; 5] = [THUMB_TIP, INDEX_FINGER_TIP, MIDDLE_FINGER_TIP, RING_FINGER_TIP, PINKY_TIP];

/// Middle joints matching `FINGER_TIPS` (thumb uses IP)
pub const FINGER_PIPS: [usize; 5] = [THUMB_IP, INDEX_FINGER_PIP, MIDDLE_FINGER_PIP, RING_FINGER_PIP, PINKY_PIP];

/// Euclidean distance between two landmarks
#[must_use]
pub fn distance(p1: &Landmark, p2: &Landmark) -> f64 {
    distance_squared(p1, p2).sqrt()
}

/// Squared Euclidean distance, for comparisons that can skip the sqrt
#[must_use]
pub fn distance_squared(p1: &Landmark, p2: &Landmark) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    let dz = p1.z - p2.z;
    dz.mul_add(dz, dx.mul_add(dx, dy * dy))
}

/// Distance in the image plane, ignoring depth
#[must_use]
pub fn distance_2d(p1: &Landmark, p2: &Landmark) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    dx.mul_add(dx, dy * dy).sqrt()
}

/// A finger counts as extended when its tip is farther from the wrist
/// than its middle joint is.
#[must_use]
pub fn is_finger_extended(pose: &HandPose, tip: usize, pip: usize) -> bool {
    let wrist = pose.landmark(WRIST);
    distance_squared(pose.landmark(tip), wrist) > distance_squared(pose.landmark(pip), wrist)
}

#[must_use]
pub fn is_finger_curled(pose: &HandPose, tip: usize, pip: usize) -> bool {
    !is_finger_extended(pose, tip, pip)
}

/// Total spread: sum of distances between consecutive finger tips
#[must_use]
pub fn finger_spread(pose: &HandPose, tips: &[usize]) -> f64 {
    tips.windows(2)
        .map(|pair| distance(pose.landmark(pair[0]), pose.landmark(pair[1])))
        .sum()
}

/// Hand center: midpoint of wrist and middle-finger MCP
#[must_use]
pub fn hand_center(pose: &HandPose) -> (f64, f64, f64) {
    let wrist = pose.landmark(WRIST);
    let middle_mcp = pose.landmark(MIDDLE_FINGER_MCP);
    (
        (wrist.x + middle_mcp.x) / 2.0,
        (wrist.y + middle_mcp.y) / 2.0,
        (wrist.z + middle_mcp.z) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_pose() -> HandPose {
        HandPose::new(
            [Landmark::default(); NUM_HAND_LANDMARKS],
            Handedness::Right,
            1.0,
        )
    }

    #[test]
    fn test_distance() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(3.0, 4.0, 0.0);
        assert_eq!(distance(&a, &b), 5.0);
        assert_eq!(distance_squared(&a, &b), 25.0);
        assert_eq!(distance_2d(&a, &b), 5.0);
    }

    #[test]
    fn test_distance_uses_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.0, 0.0, 2.0);
        assert_eq!(distance(&a, &b), 2.0);
        assert_eq!(distance_2d(&a, &b), 0.0);
    }

    #[test]
    fn test_finger_extended() {
        let mut pose = flat_pose();
        pose.landmarks[INDEX_FINGER_PIP] = Landmark::new(0.0, 0.2, 0.0);
        pose.landmarks[INDEX_FINGER_TIP] = Landmark::new(0.0, 0.4, 0.0);
        assert!(is_finger_extended(&pose, INDEX_FINGER_TIP, INDEX_FINGER_PIP));

        // Tip folded back toward the wrist
        pose.landmarks[INDEX_FINGER_TIP] = Landmark::new(0.0, 0.1, 0.0);
        assert!(is_finger_curled(&pose, INDEX_FINGER_TIP, INDEX_FINGER_PIP));
    }

    #[test]
    fn test_finger_spread() {
        let mut pose = flat_pose();
        pose.landmarks[THUMB_TIP] = Landmark::new(0.0, 0.0, 0.0);
        pose.landmarks[INDEX_FINGER_TIP] = Landmark::new(0.1, 0.0, 0.0);
        pose.landmarks[MIDDLE_FINGER_TIP] = Landmark::new(0.2, 0.0, 0.0);
        let spread = finger_spread(&pose, &[THUMB_TIP, INDEX_FINGER_TIP, MIDDLE_FINGER_TIP]);
        assert!((spread - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_hand_center() {
        let mut pose = flat_pose();
        pose.landmarks[WRIST] = Landmark::new(0.0, 0.0, 0.0);
        pose.landmarks[MIDDLE_FINGER_MCP] = Landmark::new(0.4, 0.2, 0.1);
        let (cx, cy, cz) = hand_center(&pose);
        assert!((cx - 0.2).abs() < 1e-12);
        assert!((cy - 0.1).abs() < 1e-12);
        assert!((cz - 0.05).abs() < 1e-12);
    }
}
