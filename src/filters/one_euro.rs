use super::ScalarFilter;
use crate::constants::{
    DEFAULT_FPS, DEFAULT_ONE_EURO_BETA, DEFAULT_ONE_EURO_D_CUTOFF, DEFAULT_ONE_EURO_MIN_CUTOFF, ONE_EURO_RESET_GAP,
};
use log::debug;

/// First-order low-pass stage used by the one-euro filter
struct LowPass {
    last_value: f64,
    initialized: bool,
}

impl LowPass {
    const fn new() -> Self {
        Self {
            last_value: 0.0,
            initialized: false,
        }
    }

    fn filter(&mut self, value: f64, alpha: f64) -> f64 {
        if !self.initialized {
            self.last_value = value;
            self.initialized = true;
            return value;
        }
        self.last_value = alpha.mul_add(value, (1.0 - alpha) * self.last_value);
        self.last_value
    }

    fn reset(&mut self) {
        self.last_value = 0.0;
        self.initialized = false;
    }
}

/// Adaptive one-euro filter for a scalar signal.
///
/// Maintains a low-pass filter over the value and a second low-pass filter
/// over its derivative; the effective cutoff rises with signal speed, so
/// fast movement is smoothed less (less lag) and slow movement is smoothed
/// more (less jitter).
///
/// Non-finite inputs hold the last value. A gap longer than one second
/// between samples resets the filter so the new sample becomes the new
/// steady state instead of being dragged toward stale history.
pub struct OneEuroFilter {
    min_cutoff: f64,
    beta: f64,
    d_cutoff: f64,
    value_filter: LowPass,
    derivative_filter: LowPass,
    last_time: Option<f64>,
}

impl OneEuroFilter {
    /// Create a new one-euro filter
    ///
    /// # Panics
    ///
    /// Panics if `min_cutoff` or `d_cutoff` is not positive, or if `beta`
    /// is negative
    #[must_use]
    pub fn new(min_cutoff: f64, beta: f64, d_cutoff: f64) -> Self {
        assert!(min_cutoff > 0.0, "Minimum cutoff must be positive");
        assert!(beta >= 0.0, "Beta must be non-negative");
        assert!(d_cutoff > 0.0, "Derivative cutoff must be positive");
        Self {
            min_cutoff,
            beta,
            d_cutoff,
            value_filter: LowPass::new(),
            derivative_filter: LowPass::new(),
            last_time: None,
        }
    }

    /// Smoothing factor for a given sample interval and cutoff frequency
    fn alpha(dt: f64, cutoff: f64) -> f64 {
        let cutoff = if cutoff > 0.0 { cutoff } else { 0.001 };
        let tau = 1.0 / (2.0 * std::f64::consts::PI * cutoff);
        1.0 / (1.0 + tau / dt)
    }

    /// Filter one timestamped sample
    pub fn filter(&mut self, value: f64, timestamp: f64) -> f64 {
        // Hold last value on NaN/infinite input
        if !value.is_finite() {
            return if self.value_filter.initialized {
                self.value_filter.last_value
            } else {
                0.0
            };
        }

        let Some(last_time) = self.last_time else {
            self.last_time = Some(timestamp);
            return self.value_filter.filter(value, 1.0);
        };

        let dt = timestamp - last_time;

        // Zero or backwards time step: nothing to integrate over
        if dt <= 0.0 {
            return if self.value_filter.initialized {
                self.value_filter.last_value
            } else {
                value
            };
        }

        // Clock jump: treat the new sample as the new steady state
        if dt > ONE_EURO_RESET_GAP {
            debug!("One-euro filter reset after {dt:.3}s gap");
            self.value_filter.reset();
            self.derivative_filter.reset();
            self.last_time = Some(timestamp);
            return self.value_filter.filter(value, 1.0);
        }

        self.last_time = Some(timestamp);

        let dx = if self.value_filter.initialized {
            (value - self.value_filter.last_value) / dt
        } else {
            0.0
        };
        let dx_hat = self
            .derivative_filter
            .filter(dx, Self::alpha(dt, self.d_cutoff));

        let cutoff = self.beta.mul_add(dx_hat.abs(), self.min_cutoff);
        self.value_filter.filter(value, Self::alpha(dt, cutoff))
    }
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ONE_EURO_MIN_CUTOFF, DEFAULT_ONE_EURO_BETA, DEFAULT_ONE_EURO_D_CUTOFF)
    }
}

impl ScalarFilter for OneEuroFilter {
    fn apply(&mut self, value: f64) -> f64 {
        // Untimestamped use assumes a fixed tick rate
        let timestamp = self.last_time.map_or(0.0, |t| t + 1.0 / DEFAULT_FPS);
        self.filter(value, timestamp)
    }

    fn apply_at(&mut self, value: f64, timestamp: f64) -> f64 {
        self.filter(value, timestamp)
    }

    fn reset(&mut self) {
        self.value_filter.reset();
        self.derivative_filter.reset();
        self.last_time = None;
    }

    fn name(&self) -> &str {
        "OneEuroFilter"
    }
}
