//! Signal filtering algorithms for smoothing tracking data.
//!
//! This module provides the filters applied upstream of classification:
//! windowed averaging for raw landmarks, an adaptive one-euro filter for
//! scalar signals, and z-score outlier rejection.

/// Moving average filters for scalars and whole landmark sets
pub mod moving_average;

/// Adaptive one-euro filter for scalar signals
pub mod one_euro;

/// Z-score based outlier rejection
pub mod outlier;

use crate::Result;

/// Trait for all scalar signal filters
pub trait ScalarFilter: Send + Sync {
    /// Apply filter to an input sample
    fn apply(&mut self, value: f64) -> f64;

    /// Apply filter to a timestamped sample (seconds).
    ///
    /// Time-aware filters use the timestamp for their dt computation;
    /// the default ignores it.
    fn apply_at(&mut self, value: f64, timestamp: f64) -> f64 {
        let _ = timestamp;
        self.apply(value)
    }

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl ScalarFilter for NoFilter {
    fn apply(&mut self, value: f64) -> f64 {
        value
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a scalar filter by type name
pub fn create_filter(filter_type: &str) -> Result<Box<dyn ScalarFilter>> {
    match filter_type.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "moving_average" | "movingaverage" => Ok(Box::new(moving_average::MovingAverageFilter::new(5))),
        "one_euro" | "oneeuro" => Ok(Box::new(one_euro::OneEuroFilter::default())),
        "outlier" => Ok(Box::new(outlier::OutlierFilter::new(7, 3.0))),
        _ => Err(crate::Error::Filter(format!("Unknown filter type: {filter_type}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter() {
        let mut filter = NoFilter;
        assert_eq!(filter.apply(10.0), 10.0);
    }

    #[test]
    fn test_create_filter() {
        assert!(create_filter("none").is_ok());
        assert!(create_filter("one_euro").is_ok());
        assert!(create_filter("outlier").is_ok());
        assert!(create_filter("unknown").is_err());
    }

    #[test]
    fn test_apply_at_reaches_time_aware_filters() {
        // Boxed one-euro must see the real timestamps, so a long gap
        // still resets it to the new sample
        let mut filter = create_filter("one_euro").unwrap();
        filter.apply_at(1.0, 0.0);
        filter.apply_at(1.0, 0.033);
        assert_eq!(filter.apply_at(5.0, 2.0), 5.0);
    }
}
