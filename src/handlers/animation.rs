//! Animation playback control: open palm plays, closed fist stops,
//! pointing steps the timeline.

use crate::constants::{DEFAULT_FRAME_STEP, GESTURE_FIST, GESTURE_PALM, GESTURE_POINTING};
use crate::handlers::{Command, GestureHandler, HandlerContext};
use crate::Result;
use log::debug;

/// Playback control handler.
///
/// Play and stop are edge-triggered on the internal playing state, so a
/// held palm does not spam play commands every tick. Pointing emits a
/// `frame_step` each execution; the manager's cooldown sets the repeat
/// rate.
pub struct AnimationHandler {
    playing: bool,
    frame_step: f64,
}

impl AnimationHandler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            playing: false,
            frame_step: DEFAULT_FRAME_STEP,
        }
    }

    /// Set the number of frames a pointing gesture advances
    #[must_use]
    pub fn with_frame_step(mut self, frame_step: f64) -> Self {
        self.frame_step = frame_step;
        self
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Default for AnimationHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureHandler for AnimationHandler {
    fn name(&self) -> &str {
        "animation"
    }

    fn handle(&mut self, ctx: &HandlerContext) -> Result<Option<Command>> {
        match ctx.gesture.as_str() {
            GESTURE_PALM if !self.playing => {
                self.playing = true;
                debug!("Animation play triggered");
                Ok(Some(Command::new("play_animation")))
            }
            GESTURE_FIST if self.playing => {
                self.playing = false;
                debug!("Animation stop triggered");
                Ok(Some(Command::new("stop_animation")))
            }
            GESTURE_POINTING => Ok(Some(Command::new("frame_step").with_arg("step", self.frame_step))),
            _ => Ok(None),
        }
    }

    fn on_disable(&mut self) {
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(gesture: &str) -> HandlerContext {
        HandlerContext {
            gesture: gesture.to_string(),
            timestamp: 0.0,
            data: std::collections::HashMap::new(),
        }
    }

    #[test]
    fn test_palm_plays_once() {
        let mut handler = AnimationHandler::new();
        let command = handler.handle(&ctx(GESTURE_PALM)).unwrap().unwrap();
        assert_eq!(command.name(), "play_animation");
        // Held palm: no repeat
        assert!(handler.handle(&ctx(GESTURE_PALM)).unwrap().is_none());
        assert!(handler.is_playing());
    }

    #[test]
    fn test_fist_stops_only_when_playing() {
        let mut handler = AnimationHandler::new();
        assert!(handler.handle(&ctx(GESTURE_FIST)).unwrap().is_none());

        handler.handle(&ctx(GESTURE_PALM)).unwrap();
        let command = handler.handle(&ctx(GESTURE_FIST)).unwrap().unwrap();
        assert_eq!(command.name(), "stop_animation");
        assert!(!handler.is_playing());
    }

    #[test]
    fn test_pointing_steps_frames() {
        let mut handler = AnimationHandler::new();
        let command = handler.handle(&ctx(GESTURE_POINTING)).unwrap().unwrap();
        assert_eq!(command.name(), "frame_step");
        assert_eq!(command.args()["step"], 1.0);

        let mut handler = AnimationHandler::new().with_frame_step(5.0);
        let command = handler.handle(&ctx(GESTURE_POINTING)).unwrap().unwrap();
        assert_eq!(command.args()["step"], 5.0);
    }

    #[test]
    fn test_other_gestures_ignored() {
        let mut handler = AnimationHandler::new();
        assert!(handler.handle(&ctx("THUMBS_UP")).unwrap().is_none());
    }
}
