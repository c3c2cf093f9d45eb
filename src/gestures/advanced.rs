//! Advanced static gestures: pointing and thumbs up.

use crate::constants::{GESTURE_POINTING, GESTURE_THUMBS_UP};
use crate::gestures::{DetectionContext, Gesture, GestureResult};
use crate::landmarks::{
    distance, is_finger_curled, is_finger_extended, HandPose, INDEX_FINGER_MCP, INDEX_FINGER_PIP, INDEX_FINGER_TIP,
    MIDDLE_FINGER_PIP, MIDDLE_FINGER_TIP, PINKY_PIP, PINKY_TIP, RING_FINGER_PIP, RING_FINGER_TIP, THUMB_MCP,
    THUMB_TIP, WRIST,
};
use crate::Result;

/// Pointing: index finger extended, all other fingers curled.
///
/// Confidence is tiered by how straight the index finger is, measured as
/// the ratio of the summed joint path length to the direct MCP-to-tip
/// distance (1.0 is perfectly straight).
#[derive(Default)]
pub struct Pointing;

impl Gesture for Pointing {
    fn name(&self) -> &str {
        GESTURE_POINTING
    }

    fn detect(&mut self, pose: &HandPose, ctx: &DetectionContext<'_>) -> Result<Option<GestureResult>> {
        if !is_finger_extended(pose, INDEX_FINGER_TIP, INDEX_FINGER_PIP) {
            return Ok(None);
        }

        let others_curled = is_finger_curled(pose, MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP)
            && is_finger_curled(pose, RING_FINGER_TIP, RING_FINGER_PIP)
            && is_finger_curled(pose, PINKY_TIP, PINKY_PIP);
        if !others_curled {
            return Ok(None);
        }

        let mcp = pose.landmark(INDEX_FINGER_MCP);
        let pip = pose.landmark(INDEX_FINGER_PIP);
        let tip = pose.landmark(INDEX_FINGER_TIP);
        let path_length = distance(mcp, pip) + distance(pip, tip);
        let direct = distance(mcp, tip).max(1e-6);
        let straightness = path_length / direct;

        let confidence = if straightness < 1.5 {
            1.0
        } else if straightness < 1.8 {
            0.85
        } else {
            0.7
        };

        Ok(Some(
            GestureResult::new(self.name(), confidence, ctx.timestamp)?
                .with_data("straightness", straightness)
                .with_data("tip_x", tip.x)
                .with_data("tip_y", tip.y),
        ))
    }
}

/// Thumbs up: thumb extended upward, all other fingers curled.
///
/// Confidence is tiered by verticality, the ratio of the thumb's vertical
/// rise over its horizontal drift.
#[derive(Default)]
pub struct ThumbsUp;

impl Gesture for ThumbsUp {
    fn name(&self) -> &str {
        GESTURE_THUMBS_UP
    }

    fn detect(&mut self, pose: &HandPose, ctx: &DetectionContext<'_>) -> Result<Option<GestureResult>> {
        let fingers_curled = is_finger_curled(pose, INDEX_FINGER_TIP, INDEX_FINGER_PIP)
            && is_finger_curled(pose, MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP)
            && is_finger_curled(pose, RING_FINGER_TIP, RING_FINGER_PIP)
            && is_finger_curled(pose, PINKY_TIP, PINKY_PIP);
        if !fingers_curled {
            return Ok(None);
        }

        let thumb_tip = pose.landmark(THUMB_TIP);
        let thumb_mcp = pose.landmark(THUMB_MCP);

        // Image y grows downward, so "up" means a smaller y than the MCP
        if thumb_tip.y >= thumb_mcp.y {
            return Ok(None);
        }

        let wrist = pose.landmark(WRIST);
        let thumb_extended = distance(thumb_tip, wrist) > distance(thumb_mcp, wrist);
        if !thumb_extended {
            return Ok(None);
        }

        let rise = thumb_mcp.y - thumb_tip.y;
        let drift = (thumb_tip.x - thumb_mcp.x).abs().max(1e-6);
        let verticality = rise / drift;

        let confidence = if verticality > 2.0 {
            1.0
        } else if verticality > 1.5 {
            0.9
        } else {
            0.75
        };

        Ok(Some(
            GestureResult::new(self.name(), confidence, ctx.timestamp)?.with_data("verticality", verticality),
        ))
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

    fn base_pose() -> HandPose {
        let mut pose = HandPose::new([Landmark::default(); NUM_HAND_LANDMARKS], Handedness::Right, 1.0);
        pose.landmarks[WRIST] = Landmark::new(0.5, 0.9, 0.0);
        // Curled fingers: tips closer to the wrist than the PIPs
        for (tip, pip) in [
            (MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP),
            (RING_FINGER_TIP, RING_FINGER_PIP),
            (PINKY_TIP, PINKY_PIP),
        ] {
            pose.landmarks[pip] = Landmark::new(0.5, 0.75, 0.0);
            pose.landmarks[tip] = Landmark::new(0.5, 0.82, 0.0);
        }
        pose
    }

    fn pointing_hand() -> HandPose {
        let mut pose = base_pose();
        pose.landmarks[INDEX_FINGER_MCP] = Landmark::new(0.5, 0.78, 0.0);
        pose.landmarks[INDEX_FINGER_PIP] = Landmark::new(0.5, 0.68, 0.0);
        pose.landmarks[INDEX_FINGER_TIP] = Landmark::new(0.5, 0.55, 0.0);
        pose
    }

    fn thumbs_up_hand() -> HandPose {
        let mut pose = base_pose();
        // Index curled too for this gesture
        pose.landmarks[INDEX_FINGER_PIP] = Landmark::new(0.5, 0.75, 0.0);
        pose.landmarks[INDEX_FINGER_TIP] = Landmark::new(0.5, 0.82, 0.0);
        // Thumb rising straight up from its MCP
        pose.landmarks[THUMB_MCP] = Landmark::new(0.44, 0.85, 0.0);
        pose.landmarks[THUMB_TIP] = Landmark::new(0.43, 0.65, 0.0);
        pose
    }

    #[test]
    fn test_pointing_detected_with_straight_finger() {
        let mut gesture = Pointing;
        let result = gesture.detect(&pointing_hand(), &ctx()).unwrap().unwrap();
        assert_eq!(result.name(), GESTURE_POINTING);
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn test_pointing_bent_finger_lowers_confidence() {
        let mut gesture = Pointing;
        let mut pose = pointing_hand();
        // Kink the PIP sideways so the joint path is much longer than the
        // direct line
        pose.landmarks[INDEX_FINGER_PIP] = Landmark::new(0.68, 0.67, 0.0);
        let result = gesture.detect(&pose, &ctx()).unwrap().unwrap();
        assert!(result.confidence() < 1.0);
    }

    #[test]
    fn test_pointing_rejects_when_middle_extended() {
        let mut gesture = Pointing;
        let mut pose = pointing_hand();
        pose.landmarks[MIDDLE_FINGER_TIP] = Landmark::new(0.5, 0.55, 0.0);
        assert!(gesture.detect(&pose, &ctx()).unwrap().is_none());
    }

    #[test]
    fn test_thumbs_up_detected() {
        let mut gesture = ThumbsUp;
        let result = gesture.detect(&thumbs_up_hand(), &ctx()).unwrap().unwrap();
        assert_eq!(result.name(), GESTURE_THUMBS_UP);
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn test_thumbs_up_rejects_sideways_thumb() {
        let mut gesture = ThumbsUp;
        let mut pose = thumbs_up_hand();
        pose.landmarks[THUMB_TIP] = Landmark::new(0.25, 0.84, 0.0);
        let result = gesture.detect(&pose, &ctx()).unwrap().unwrap();
        assert_eq!(result.confidence(), 0.75);
    }

    #[test]
    fn test_thumbs_up_rejects_thumb_down() {
        let mut gesture = ThumbsUp;
        let mut pose = thumbs_up_hand();
        pose.landmarks[THUMB_TIP] = Landmark::new(0.43, 0.95, 0.0);
        assert!(gesture.detect(&pose, &ctx()).unwrap().is_none());
    }
}
