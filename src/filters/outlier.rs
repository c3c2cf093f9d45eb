use super::ScalarFilter;
use crate::constants::EPSILON;
use std::collections::VecDeque;

/// Outlier filter based on the z-score of a sample against recent history.
///
/// A sample whose z-score exceeds the threshold is replaced with the median
/// of the window. The substituted value, not the outlier, is what enters
/// the history.
pub struct OutlierFilter {
    window_size: usize,
    z_threshold: f64,
    buffer: VecDeque<f64>,
}

impl OutlierFilter {
    /// Create a new outlier filter
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is less than 2 or `z_threshold` is negative
    #[must_use]
    pub fn new(window_size: usize, z_threshold: f64) -> Self {
        assert!(window_size >= 2, "Window size must be at least 2");
        assert!(z_threshold >= 0.0, "Threshold must be non-negative, got {z_threshold}");
        Self {
            window_size,
            z_threshold,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    fn median(values: &VecDeque<f64>) -> f64 {
        let mut sorted: Vec<f64> = values.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    fn z_score(values: &VecDeque<f64>, sample: f64) -> f64 {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        if std_dev < EPSILON {
            // Degenerate window: any deviation at all counts as extreme
            if (sample - mean).abs() < EPSILON {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            (sample - mean).abs() / std_dev
        }
    }
}

impl ScalarFilter for OutlierFilter {
    fn apply(&mut self, value: f64) -> f64 {
        // Not enough history to judge; accept the sample
        let accepted = if self.buffer.len() < 2 {
            value
        } else if Self::z_score(&self.buffer, value) > self.z_threshold {
            Self::median(&self.buffer)
        } else {
            value
        };

        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(accepted);

        accepted
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "OutlierFilter"
    }
}
