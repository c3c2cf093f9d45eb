//! Continuous navigation gestures: pinch drag and V-gesture move.
//!
//! Both track an anchor position between ticks to produce movement deltas.
//! The anchor is cleared whenever the gesture's own predicate fails, so
//! re-acquisition never computes a delta against stale coordinates.

use crate::constants::{
    ANCHOR_JITTER_FLOOR, GESTURE_PINCH, GESTURE_V_MOVE, PINCH_DISTANCE_THRESHOLD, V_CURL_DISTANCE_THRESHOLD,
    V_FINGER_SPREAD_MAX, V_FINGER_SPREAD_MIN, V_THUMB_EXTENSION_RATIO_MAX,
};
use crate::gestures::{DetectionContext, Gesture, GestureResult};
use crate::landmarks::{
    distance, distance_2d, distance_squared, is_finger_curled, is_finger_extended, HandPose, INDEX_FINGER_PIP,
    INDEX_FINGER_TIP, MIDDLE_FINGER_PIP, MIDDLE_FINGER_TIP, PINKY_MCP, PINKY_PIP, PINKY_TIP, RING_FINGER_MCP,
    RING_FINGER_PIP, RING_FINGER_TIP, THUMB_MCP, THUMB_TIP, WRIST,
};
use crate::Result;

/// Anchor tracking shared by the continuous gestures
#[derive(Default)]
struct AnchorTracker {
    last: Option<(f64, f64)>,
}

impl AnchorTracker {
    /// Advance the anchor and return the delta, with tiny movements
    /// reported as zero to suppress tremor jitter.
    fn advance(&mut self, x: f64, y: f64) -> (f64, f64) {
        let (dx, dy) = match self.last {
            Some((lx, ly)) => {
                let dx = x - lx;
                let dy = y - ly;
                if dx.hypot(dy) < ANCHOR_JITTER_FLOOR {
                    (0.0, 0.0)
                } else {
                    (dx, dy)
                }
            }
            None => (0.0, 0.0),
        };
        self.last = Some((x, y));
        (dx, dy)
    }

    fn clear(&mut self) {
        self.last = None;
    }
}

/// Pinch drag: thumb and index tips held together, movement tracked for
/// rotation control.
pub struct PinchDrag {
    pinch_threshold: f64,
    anchor: AnchorTracker,
}

impl PinchDrag {
    #[must_use]
    pub fn new(pinch_threshold: f64) -> Self {
        Self {
            pinch_threshold,
            anchor: AnchorTracker::default(),
        }
    }
}

impl Default for PinchDrag {
    fn default() -> Self {
        Self::new(PINCH_DISTANCE_THRESHOLD)
    }
}

impl Gesture for PinchDrag {
    fn name(&self) -> &str {
        GESTURE_PINCH
    }

    fn priority(&self) -> i32 {
        10
    }

    fn detect(&mut self, pose: &HandPose, ctx: &DetectionContext<'_>) -> Result<Option<GestureResult>> {
        let thumb_tip = pose.landmark(THUMB_TIP);
        let index_tip = pose.landmark(INDEX_FINGER_TIP);

        let distance_3d = distance(thumb_tip, index_tip);
        // Depth can be noisy; a tight 2D match also counts as pinched
        let dist_2d = distance_2d(thumb_tip, index_tip);
        let is_pinched = distance_3d < self.pinch_threshold || dist_2d < self.pinch_threshold * 0.8;

        if !is_pinched {
            self.anchor.clear();
            return Ok(None);
        }

        // A middle finger this close to the thumb is some other gesture
        let middle_to_thumb = distance(pose.landmark(MIDDLE_FINGER_TIP), thumb_tip);
        if middle_to_thumb < self.pinch_threshold * 0.9 {
            self.anchor.clear();
            return Ok(None);
        }

        let center_x = (thumb_tip.x + index_tip.x) / 2.0;
        let center_y = (thumb_tip.y + index_tip.y) / 2.0;
        let (dx, dy) = self.anchor.advance(center_x, center_y);

        // Tighter pinch, higher confidence
        let tightness = 1.0 - distance_3d / self.pinch_threshold;
        let confidence = tightness.mul_add(0.3, 0.7).clamp(0.6, 1.0);

        Ok(Some(
            GestureResult::new(self.name(), confidence, ctx.timestamp)?
                .with_data("dx", dx)
                .with_data("dy", dy)
                .with_data("center_x", center_x)
                .with_data("center_y", center_y)
                .with_data("pinch_distance", distance_3d)
                .with_data("tightness", tightness),
        ))
    }

    fn reset(&mut self) {
        self.anchor.clear();
    }
}

/// V-gesture: index and middle extended, ring and pinky curled, movement
/// tracked for panning.
pub struct VGesture {
    spread_min: f64,
    spread_max: f64,
    thumb_ratio_max: f64,
    curl_threshold: f64,
    anchor: AnchorTracker,
}

impl VGesture {
    #[must_use]
    pub fn new(spread_min: f64, spread_max: f64, thumb_ratio_max: f64, curl_threshold: f64) -> Self {
        Self {
            spread_min,
            spread_max,
            thumb_ratio_max,
            curl_threshold,
            anchor: AnchorTracker::default(),
        }
    }
}

impl Default for VGesture {
    fn default() -> Self {
        Self::new(
            V_FINGER_SPREAD_MIN,
            V_FINGER_SPREAD_MAX,
            V_THUMB_EXTENSION_RATIO_MAX,
            V_CURL_DISTANCE_THRESHOLD,
        )
    }
}

impl Gesture for VGesture {
    fn name(&self) -> &str {
        GESTURE_V_MOVE
    }

    fn priority(&self) -> i32 {
        10
    }

    fn detect(&mut self, pose: &HandPose, ctx: &DetectionContext<'_>) -> Result<Option<GestureResult>> {
        let index_extended = is_finger_extended(pose, INDEX_FINGER_TIP, INDEX_FINGER_PIP);
        let middle_extended = is_finger_extended(pose, MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP);

        if !(index_extended && middle_extended) {
            self.anchor.clear();
            return Ok(None);
        }

        // Strict curl check, with a lenient tip-to-MCP fallback: a tip
        // folded against the palm is curled enough even if it sits farther
        // from the wrist than its PIP
        let mut ring_curled = is_finger_curled(pose, RING_FINGER_TIP, RING_FINGER_PIP);
        if !ring_curled {
            ring_curled = distance(pose.landmark(RING_FINGER_TIP), pose.landmark(RING_FINGER_MCP)) < self.curl_threshold;
        }
        let mut pinky_curled = is_finger_curled(pose, PINKY_TIP, PINKY_PIP);
        if !pinky_curled {
            pinky_curled = distance(pose.landmark(PINKY_TIP), pose.landmark(PINKY_MCP)) < self.curl_threshold;
        }

        if !(ring_curled && pinky_curled) {
            self.anchor.clear();
            return Ok(None);
        }

        // Thumb must not be extended like in the palm gesture
        let wrist = pose.landmark(WRIST);
        let dist_thumb_tip = distance_squared(pose.landmark(THUMB_TIP), wrist);
        let dist_thumb_mcp = distance_squared(pose.landmark(THUMB_MCP), wrist);
        let thumb_extension_ratio = dist_thumb_tip / (dist_thumb_mcp + 0.001);
        if thumb_extension_ratio > self.thumb_ratio_max {
            self.anchor.clear();
            return Ok(None);
        }

        let index_tip = pose.landmark(INDEX_FINGER_TIP);
        let middle_tip = pose.landmark(MIDDLE_FINGER_TIP);
        let center_x = (index_tip.x + middle_tip.x) / 2.0;
        let center_y = (index_tip.y + middle_tip.y) / 2.0;
        let (dx, dy) = self.anchor.advance(center_x, center_y);

        let spread = distance(index_tip, middle_tip);
        let confidence = if spread < self.spread_min {
            0.6
        } else if spread > self.spread_max {
            0.7
        } else {
            let spread_score = (spread - self.spread_min) / (self.spread_max - self.spread_min);
            spread_score.mul_add(0.2, 0.8)
        };

        Ok(Some(
            GestureResult::new(self.name(), confidence.clamp(0.6, 1.0), ctx.timestamp)?
                .with_data("dx", dx)
                .with_data("dy", dy)
                .with_data("center_x", center_x)
                .with_data("center_y", center_y)
                .with_data("finger_spread", spread)
                .with_data("thumb_extension_ratio", thumb_extension_ratio),
        ))
    }

    fn reset(&mut self) {
        self.anchor.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Handedness, Landmark, NUM_HAND_LANDMARKS};

    fn ctx() -> DetectionContext<'static> {
        DetectionContext {
            timestamp: 0.0,
            history: &[],
        }
    }

    /// Pinched hand with the pinch center at the given position
    fn pinch_hand(cx: f64, cy: f64) -> HandPose {
        let mut pose = HandPose::new([Landmark::default(); NUM_HAND_LANDMARKS], Handedness::Right, 1.0);
        pose.landmarks[WRIST] = Landmark::new(cx, cy + 0.3, 0.0);
        pose.landmarks[THUMB_TIP] = Landmark::new(cx - 0.01, cy, 0.0);
        pose.landmarks[INDEX_FINGER_TIP] = Landmark::new(cx + 0.01, cy, 0.0);
        // Middle finger well away from the thumb
        pose.landmarks[MIDDLE_FINGER_TIP] = Landmark::new(cx + 0.2, cy, 0.0);
        pose
    }

    /// V-sign hand with the index/middle midpoint at the given position
    fn v_hand(cx: f64, cy: f64) -> HandPose {
        let mut pose = HandPose::new([Landmark::default(); NUM_HAND_LANDMARKS], Handedness::Right, 1.0);
        pose.landmarks[WRIST] = Landmark::new(cx, cy + 0.4, 0.0);
        pose.landmarks[INDEX_FINGER_PIP] = Landmark::new(cx - 0.02, cy + 0.2, 0.0);
        pose.landmarks[INDEX_FINGER_TIP] = Landmark::new(cx - 0.04, cy, 0.0);
        pose.landmarks[MIDDLE_FINGER_PIP] = Landmark::new(cx + 0.02, cy + 0.2, 0.0);
        pose.landmarks[MIDDLE_FINGER_TIP] = Landmark::new(cx + 0.04, cy, 0.0);
        // Ring and pinky tips pulled back toward the wrist
        pose.landmarks[RING_FINGER_PIP] = Landmark::new(cx + 0.05, cy + 0.25, 0.0);
        pose.landmarks[RING_FINGER_TIP] = Landmark::new(cx + 0.05, cy + 0.33, 0.0);
        pose.landmarks[PINKY_PIP] = Landmark::new(cx + 0.08, cy + 0.27, 0.0);
        pose.landmarks[PINKY_TIP] = Landmark::new(cx + 0.08, cy + 0.34, 0.0);
        // Thumb close to the wrist so the extension ratio stays low
        pose.landmarks[THUMB_MCP] = Landmark::new(cx - 0.06, cy + 0.32, 0.0);
        pose.landmarks[THUMB_TIP] = Landmark::new(cx - 0.07, cy + 0.31, 0.0);
        pose
    }

    #[test]
    fn test_pinch_detected_with_zero_first_delta() {
        let mut gesture = PinchDrag::default();
        let result = gesture.detect(&pinch_hand(0.5, 0.5), &ctx()).unwrap().unwrap();
        assert_eq!(result.name(), GESTURE_PINCH);
        assert_eq!(result.data()["dx"], 0.0);
        assert_eq!(result.data()["dy"], 0.0);
    }

    #[test]
    fn test_pinch_tracks_movement_delta() {
        let mut gesture = PinchDrag::default();
        gesture.detect(&pinch_hand(0.5, 0.5), &ctx()).unwrap().unwrap();
        let result = gesture.detect(&pinch_hand(0.55, 0.48), &ctx()).unwrap().unwrap();
        assert!((result.data()["dx"] - 0.05).abs() < 1e-9);
        assert!((result.data()["dy"] + 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_jitter_floor() {
        let mut gesture = PinchDrag::default();
        gesture.detect(&pinch_hand(0.5, 0.5), &ctx()).unwrap().unwrap();
        let result = gesture.detect(&pinch_hand(0.5005, 0.5), &ctx()).unwrap().unwrap();
        assert_eq!(result.data()["dx"], 0.0);
        assert_eq!(result.data()["dy"], 0.0);
    }

    #[test]
    fn test_pinch_anchor_cleared_on_release() {
        let mut gesture = PinchDrag::default();
        gesture.detect(&pinch_hand(0.2, 0.2), &ctx()).unwrap().unwrap();

        // Fingers apart: predicate fails and the anchor must go with it
        let mut open = pinch_hand(0.2, 0.2);
        open.landmarks[INDEX_FINGER_TIP] = Landmark::new(0.5, 0.2, 0.0);
        assert!(gesture.detect(&open, &ctx()).unwrap().is_none());

        // Re-acquired far away: delta starts from zero, not from 0.2
        let result = gesture.detect(&pinch_hand(0.8, 0.8), &ctx()).unwrap().unwrap();
        assert_eq!(result.data()["dx"], 0.0);
        assert_eq!(result.data()["dy"], 0.0);
    }

    #[test]
    fn test_pinch_rejects_middle_finger_interference() {
        let mut gesture = PinchDrag::default();
        let mut pose = pinch_hand(0.5, 0.5);
        pose.landmarks[MIDDLE_FINGER_TIP] = Landmark::new(0.49, 0.5, 0.0);
        assert!(gesture.detect(&pose, &ctx()).unwrap().is_none());
    }

    #[test]
    fn test_v_gesture_detected() {
        let mut gesture = VGesture::default();
        let result = gesture.detect(&v_hand(0.5, 0.4), &ctx()).unwrap().unwrap();
        assert_eq!(result.name(), GESTURE_V_MOVE);
        assert!(result.confidence() >= 0.6);
    }

    #[test]
    fn test_v_gesture_tracks_movement() {
        let mut gesture = VGesture::default();
        gesture.detect(&v_hand(0.5, 0.4), &ctx()).unwrap().unwrap();
        let result = gesture.detect(&v_hand(0.53, 0.4), &ctx()).unwrap().unwrap();
        assert!((result.data()["dx"] - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_v_gesture_rejects_when_ring_extended() {
        let mut gesture = VGesture::default();
        let mut pose = v_hand(0.5, 0.4);
        pose.landmarks[RING_FINGER_TIP] = Landmark::new(0.55, 0.1, 0.0);
        assert!(gesture.detect(&pose, &ctx()).unwrap().is_none());
    }
}
