//! Viewport control: pinch drag rotates, V-gesture pans.

use crate::constants::{
    DEFAULT_MOVEMENT_DEADZONE, DEFAULT_PAN_SENSITIVITY, DEFAULT_ROTATE_SENSITIVITY, DEFAULT_SMOOTHING_ALPHA,
    GESTURE_PINCH, GESTURE_V_MOVE,
};
use crate::handlers::{Command, GestureHandler, HandlerConfig, HandlerContext};
use crate::Result;
use log::debug;

/// Exponential smoothing of movement deltas with a deadzone and axis
/// inversion.
///
/// Raw deltas below the deadzone produce no movement and reset the
/// smoothing state, so tremor never accumulates into drift. Above it,
/// the delta is scaled by sensitivity and blended with the previous
/// output: `out = alpha * scaled + (1 - alpha) * prev`.
pub struct MovementSmoother {
    deadzone: f64,
    sensitivity: f64,
    alpha: f64,
    invert_x: bool,
    invert_y: bool,
    smoothed: (f64, f64),
}

impl MovementSmoother {
    #[must_use]
    pub fn new(deadzone: f64, sensitivity: f64, alpha: f64, invert_x: bool, invert_y: bool) -> Self {
        Self {
            deadzone,
            sensitivity,
            alpha,
            invert_x,
            invert_y,
            smoothed: (0.0, 0.0),
        }
    }

    /// Smooth one raw delta into an output movement
    pub fn smooth(&mut self, dx: f64, dy: f64) -> (f64, f64) {
        if dx.hypot(dy) < self.deadzone {
            self.smoothed = (0.0, 0.0);
            return (0.0, 0.0);
        }

        let sx = if self.invert_x { -1.0 } else { 1.0 };
        let sy = if self.invert_y { -1.0 } else { 1.0 };
        let scaled = (dx * self.sensitivity * sx, dy * self.sensitivity * sy);

        self.smoothed = (
            self.alpha.mul_add(scaled.0, (1.0 - self.alpha) * self.smoothed.0),
            self.alpha.mul_add(scaled.1, (1.0 - self.alpha) * self.smoothed.1),
        );
        self.smoothed
    }

    pub fn reset(&mut self) {
        self.smoothed = (0.0, 0.0);
    }
}

impl Default for MovementSmoother {
    fn default() -> Self {
        Self::new(
            DEFAULT_MOVEMENT_DEADZONE,
            DEFAULT_PAN_SENSITIVITY,
            DEFAULT_SMOOTHING_ALPHA,
            false,
            false,
        )
    }
}

/// Turns continuous gesture deltas into viewport commands.
pub struct ViewportHandler {
    rotate: MovementSmoother,
    pan: MovementSmoother,
}

impl ViewportHandler {
    #[must_use]
    pub fn new(config: &HandlerConfig) -> Self {
        Self {
            rotate: MovementSmoother::new(
                DEFAULT_MOVEMENT_DEADZONE,
                DEFAULT_ROTATE_SENSITIVITY * config.sensitivity,
                DEFAULT_SMOOTHING_ALPHA,
                config.invert_x,
                config.invert_y,
            ),
            pan: MovementSmoother::new(
                DEFAULT_MOVEMENT_DEADZONE,
                DEFAULT_PAN_SENSITIVITY * config.sensitivity,
                DEFAULT_SMOOTHING_ALPHA,
                config.invert_x,
                config.invert_y,
            ),
        }
    }
}

impl GestureHandler for ViewportHandler {
    fn name(&self) -> &str {
        "viewport"
    }

    fn handle(&mut self, ctx: &HandlerContext) -> Result<Option<Command>> {
        let dx = ctx.datum("dx");
        let dy = ctx.datum("dy");

        let command = match ctx.gesture.as_str() {
            GESTURE_PINCH => {
                let (mx, my) = self.rotate.smooth(dx, dy);
                Command::new("rotate_viewport").with_arg("dx", mx).with_arg("dy", my)
            }
            GESTURE_V_MOVE => {
                let (mx, my) = self.pan.smooth(dx, dy);
                Command::new("pan_viewport").with_arg("dx", mx).with_arg("dy", my)
            }
            _ => return Ok(None),
        };

        Ok(Some(command))
    }

    fn on_disable(&mut self) {
        debug!("Viewport handler disabled, smoothing reset");
        self.rotate.reset();
        self.pan.reset();
    }
}
