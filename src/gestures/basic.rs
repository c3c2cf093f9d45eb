//! Static gestures: open palm and closed fist.

use crate::constants::{FIST_THUMB_TUCK_THRESHOLD, GESTURE_FIST, GESTURE_PALM};
use crate::gestures::{DetectionContext, Gesture, GestureResult};
use crate::landmarks::{
    distance_squared, finger_spread, is_finger_curled, is_finger_extended, HandPose, FINGER_TIPS,
    INDEX_FINGER_MCP, INDEX_FINGER_PIP, INDEX_FINGER_TIP, MIDDLE_FINGER_MCP, MIDDLE_FINGER_PIP, MIDDLE_FINGER_TIP,
    PINKY_PIP, PINKY_TIP, RING_FINGER_PIP, RING_FINGER_TIP, THUMB_MCP, THUMB_TIP, WRIST,
};
use crate::Result;

/// Tip/PIP pairs for the four non-thumb fingers
const FINGER_CHECKS: [(usize, usize); 4] = [
    (INDEX_FINGER_TIP, INDEX_FINGER_PIP),
    (MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP),
    (RING_FINGER_TIP, RING_FINGER_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Open palm: all five fingers extended.
///
/// Confidence grows with finger spread, never a flat step, so downstream
/// smoothing keeps something to work with.
#[derive(Default)]
pub struct OpenPalm;

impl Gesture for OpenPalm {
    fn name(&self) -> &str {
        GESTURE_PALM
    }

    fn detect(&mut self, pose: &HandPose, ctx: &DetectionContext<'_>) -> Result<Option<GestureResult>> {
        let mut extended_count = FINGER_CHECKS
            .iter()
            .filter(|(tip, pip)| is_finger_extended(pose, *tip, *pip))
            .count();

        // Thumb has a different joint structure: compare tip vs MCP
        let wrist = pose.landmark(WRIST);
        let thumb_extended = distance_squared(pose.landmark(THUMB_TIP), wrist)
            > distance_squared(pose.landmark(THUMB_MCP), wrist);
        if thumb_extended {
            extended_count += 1;
        }

        if extended_count < 5 {
            return Ok(None);
        }

        // Typical palm spread is around 0.3-0.5; wider means more confident
        let spread = finger_spread(pose, &FINGER_TIPS);
        let spread_score = (spread / 0.4).min(1.0);
        let confidence = spread_score.mul_add(0.3, 0.7);

        Ok(Some(
            GestureResult::new(self.name(), confidence, ctx.timestamp)?
                .with_data("extended_fingers", extended_count as f64)
                .with_data("spread", spread)
                .with_data("spread_score", spread_score),
        ))
    }
}

/// Closed fist: four fingers curled with the thumb tucked against the hand.
#[derive(Default)]
pub struct ClosedFist;

impl Gesture for ClosedFist {
    fn name(&self) -> &str {
        GESTURE_FIST
    }

    fn detect(&mut self, pose: &HandPose, ctx: &DetectionContext<'_>) -> Result<Option<GestureResult>> {
        let curled_count = FINGER_CHECKS
            .iter()
            .filter(|(tip, pip)| is_finger_curled(pose, *tip, *pip))
            .count();

        if curled_count < 4 {
            return Ok(None);
        }

        // Thumb tip must sit close to the hand body (index or middle MCP)
        let thumb_tip = pose.landmark(THUMB_TIP);
        let dist_to_index = distance_squared(thumb_tip, pose.landmark(INDEX_FINGER_MCP));
        let dist_to_middle = distance_squared(thumb_tip, pose.landmark(MIDDLE_FINGER_MCP));
        let thumb_tucked = dist_to_index < FIST_THUMB_TUCK_THRESHOLD || dist_to_middle < FIST_THUMB_TUCK_THRESHOLD;

        if !thumb_tucked {
            return Ok(None);
        }

        // Tighter curl means lower mean tip-to-wrist distance
        let wrist = pose.landmark(WRIST);
        let avg_tip_distance = FINGER_CHECKS
            .iter()
            .map(|(tip, _)| distance_squared(pose.landmark(*tip), wrist))
            .sum::<f64>()
            / FINGER_CHECKS.len() as f64;

        let confidence = if avg_tip_distance < 0.03 {
            1.0
        } else if avg_tip_distance < 0.05 {
            0.9
        } else {
            0.75
        };

        Ok(Some(
            GestureResult::new(self.name(), confidence, ctx.timestamp)?
                .with_data("curled_fingers", curled_count as f64)
                .with_data("avg_tip_distance", avg_tip_distance),
        ))
    }
}
