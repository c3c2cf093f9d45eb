use super::ScalarFilter;
use crate::constants::NUM_HAND_LANDMARKS;
use crate::landmarks::{HandPose, Landmark};
use std::collections::VecDeque;

/// Moving average filter over a fixed-size window
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MovingAverageFilter {
    /// Create a new moving average filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }
}

impl ScalarFilter for MovingAverageFilter {
    fn apply(&mut self, value: f64) -> f64 {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);

        self.buffer.iter().sum::<f64>() / self.buffer.len() as f64
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}

/// Per-landmark windowed average over a whole hand pose.
///
/// Denoises raw keypoints before classification. Each of the 21 landmarks
/// keeps its own coordinate windows; the window fills progressively, so
/// early samples are averaged over what is available.
pub struct LandmarkFilter {
    window_size: usize,
    buffers: Vec<VecDeque<(f64, f64, f64)>>,
}

impl LandmarkFilter {
    /// Create a new landmark filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffers: vec![VecDeque::with_capacity(window_size); NUM_HAND_LANDMARKS],
        }
    }

    /// Smooth one pose, returning a new pose with averaged coordinates
    pub fn update(&mut self, pose: &HandPose) -> HandPose {
        let mut smoothed = pose.clone();

        for (i, buffer) in self.buffers.iter_mut().enumerate() {
            let lm = &pose.landmarks[i];
            if buffer.len() >= self.window_size {
                buffer.pop_front();
            }
            buffer.push_back((lm.x, lm.y, lm.z));

            let n = buffer.len() as f64;
            let (sx, sy, sz) = buffer
                .iter()
                .fold((0.0, 0.0, 0.0), |(ax, ay, az), (x, y, z)| (ax + x, ay + y, az + z));

            smoothed.landmarks[i] = Landmark {
                x: sx / n,
                y: sy / n,
                z: sz / n,
                visibility: lm.visibility,
            };
        }

        smoothed
    }

    /// Clear all landmark windows
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }
}
