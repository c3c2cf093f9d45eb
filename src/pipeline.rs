//! End-to-end pipeline: pose in, commands out.
//!
//! One tick runs quality validation, landmark smoothing, gesture
//! detection with hysteresis, confidence and duration validation,
//! modality tracking, event publication, and handler dispatch. The
//! pipeline owns every stage; the caller only supplies poses and
//! timestamps.

use crate::config::Config;
use crate::constants::{GESTURE_FIST, GESTURE_PALM, GESTURE_PINCH, GESTURE_POINTING, GESTURE_THUMBS_UP, GESTURE_V_MOVE};
use crate::events::{Event, EventBus, EventType};
use crate::filters::moving_average::LandmarkFilter;
use crate::filters::{create_filter, ScalarFilter};
use crate::gestures::advanced::{Pointing, ThumbsUp};
use crate::gestures::basic::{ClosedFist, OpenPalm};
use crate::gestures::detector::{DetectorStats, GestureDetector};
use crate::gestures::navigation::{PinchDrag, VGesture};
use crate::gestures::GestureResult;
use crate::handlers::animation::AnimationHandler;
use crate::handlers::manager::{HandlerManager, HandlerStats};
use crate::handlers::viewport::ViewportHandler;
use crate::handlers::Command;
use crate::landmarks::HandPose;
use crate::modality::{Modality, ModalityManager};
use crate::validators::{ConfidenceValidator, QualityValidator, TemporalValidator};
use crate::{Error, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

/// Landmark smoothing stage, selected by `filter.kind`
enum PoseSmoother {
    /// Windowed mean over recent poses
    MovingAverage(LandmarkFilter),
    /// Independent scalar filter per landmark coordinate
    Scalar(Vec<Box<dyn ScalarFilter>>),
}

impl PoseSmoother {
    fn from_config(config: &Config) -> Result<Self> {
        match config.filter.kind.as_str() {
            "moving_average" => Ok(Self::MovingAverage(LandmarkFilter::new(config.filter.landmark_window))),
            kind => {
                let filters = (0..crate::landmarks::NUM_HAND_LANDMARKS * 3)
                    .map(|_| create_filter(kind))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Scalar(filters))
            }
        }
    }

    fn update(&mut self, pose: &HandPose, timestamp: f64) -> HandPose {
        match self {
            Self::MovingAverage(filter) => filter.update(pose),
            Self::Scalar(filters) => {
                let mut smoothed = pose.clone();
                for (i, lm) in smoothed.landmarks.iter_mut().enumerate() {
                    lm.x = filters[i * 3].apply_at(lm.x, timestamp);
                    lm.y = filters[i * 3 + 1].apply_at(lm.y, timestamp);
                    lm.z = filters[i * 3 + 2].apply_at(lm.z, timestamp);
                }
                smoothed
            }
        }
    }

    fn reset(&mut self) {
        match self {
            Self::MovingAverage(filter) => filter.reset(),
            Self::Scalar(filters) => {
                for filter in filters {
                    filter.reset();
                }
            }
        }
    }
}

/// What one pipeline tick produced
#[derive(Debug, Default)]
pub struct TickReport {
    /// Confirmed, validated gesture for the tick
    pub gesture: Option<GestureResult>,
    /// Commands emitted by the handlers
    pub commands: Vec<Command>,
}

/// Aggregate pipeline statistics
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub detector: DetectorStats,
    pub events_published: u64,
    pub handlers: HashMap<String, HandlerStats>,
}

/// The full gesture processing pipeline.
pub struct Pipeline {
    smoother: PoseSmoother,
    quality: QualityValidator,
    detector: GestureDetector,
    confidence: ConfidenceValidator,
    temporal: TemporalValidator,
    modality: ModalityManager,
    bus: Arc<EventBus>,
    handlers: HandlerManager,
    had_hand: bool,
}

impl Pipeline {
    /// Build a pipeline with every stage configured from `config`.
    ///
    /// The configuration must already be validated; an unknown gesture
    /// name still fails cleanly here.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut detector = GestureDetector::new(config.detector.min_confidence, config.detector.hysteresis_window);
        for name in &config.gestures.enabled {
            match name.as_str() {
                GESTURE_PALM => detector.register(Box::new(OpenPalm)),
                GESTURE_FIST => detector.register(Box::new(ClosedFist)),
                GESTURE_PINCH => detector.register(Box::new(PinchDrag::new(config.gestures.pinch_threshold))),
                GESTURE_V_MOVE => detector.register(Box::new(VGesture::new(
                    config.gestures.v_spread_min,
                    config.gestures.v_spread_max,
                    crate::constants::V_THUMB_EXTENSION_RATIO_MAX,
                    crate::constants::V_CURL_DISTANCE_THRESHOLD,
                ))),
                GESTURE_POINTING => detector.register(Box::new(Pointing)),
                GESTURE_THUMBS_UP => detector.register(Box::new(ThumbsUp)),
                other => return Err(Error::Config(format!("Unknown gesture: {other}"))),
            }
        }

        let mut handlers = HandlerManager::new();
        handlers.register(
            Box::new(ViewportHandler::new(&config.handlers.viewport)),
            config.handlers.viewport.clone(),
        );
        handlers.register(Box::new(AnimationHandler::new()), config.handlers.animation.clone());

        let triggers = config
            .modality
            .triggers
            .iter()
            .map(|(gesture, mode)| {
                let modality = match mode.as_str() {
                    "rotation" => Modality::Rotation,
                    "navigation" => Modality::Navigation,
                    other => return Err(Error::Config(format!("Unknown modality: {other}"))),
                };
                Ok((gesture.clone(), modality))
            })
            .collect::<Result<_>>()?;

        info!("Pipeline initialized with {} gestures", config.gestures.enabled.len());
        Ok(Self {
            smoother: PoseSmoother::from_config(config)?,
            quality: QualityValidator::new(config.validators.min_visibility),
            detector,
            confidence: ConfidenceValidator::new(config.validators.min_confidence, config.validators.stability_frames),
            temporal: TemporalValidator::new(config.validators.min_duration),
            modality: ModalityManager::with_triggers(triggers),
            bus: Arc::new(EventBus::new()),
            handlers,
            had_hand: false,
        })
    }

    /// Event bus for external subscribers
    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Process one tick.
    ///
    /// `None` means no hand this tick: all per-hand state is cleared and
    /// a system event announces the loss. A pose failing the quality
    /// gate is dropped for the tick without clearing tracking, since
    /// visibility dips are usually transient.
    pub fn tick(&mut self, pose: Option<&HandPose>, timestamp: f64) -> TickReport {
        let Some(pose) = pose else {
            self.clear_hand(timestamp);
            return TickReport::default();
        };

        if !self.quality.validate(pose) {
            debug!("Pose dropped by quality gate at t={timestamp:.3}");
            return TickReport::default();
        }
        self.had_hand = true;

        let smoothed = self.smoother.update(pose, timestamp);
        let Some(result) = self.detector.detect_best(Some(&smoothed), timestamp) else {
            return TickReport::default();
        };

        if !self.confidence.validate(&result) || !self.temporal.validate(&result) {
            return TickReport::default();
        }

        let movement = self.modality.update(&result);

        // Re-anchored modality deltas take precedence over the raw
        // classifier deltas, so a modality switch never jumps.
        let (dx, dy) = movement.map_or_else(
            || {
                (
                    result.data().get("dx").copied().unwrap_or(0.0),
                    result.data().get("dy").copied().unwrap_or(0.0),
                )
            },
            |m| (m.dx, m.dy),
        );

        let event = match Event::new(EventType::Gesture, "detector", result.name(), timestamp) {
            Ok(event) => event
                .with_data("confidence", result.confidence())
                .with_data("dx", dx)
                .with_data("dy", dy),
            Err(e) => {
                debug!("Skipping event publication: {e}");
                return TickReport {
                    gesture: Some(result),
                    commands: Vec::new(),
                };
            }
        };

        self.bus.publish(&event);
        let commands = self.handlers.process_event(&event);

        TickReport {
            gesture: Some(result),
            commands,
        }
    }

    fn clear_hand(&mut self, timestamp: f64) {
        if self.had_hand {
            self.had_hand = false;
            if let Ok(event) = Event::new(EventType::System, "pipeline", "hand_lost", timestamp) {
                self.bus.publish(&event);
            }
        }
        self.detector.detect_best(None, timestamp);
        self.modality.clear();
        self.confidence.reset();
        self.temporal.reset();
        self.smoother.reset();
    }

    /// Reset every stage, including history and statistics
    pub fn reset(&mut self) {
        self.detector.reset();
        self.modality.clear();
        self.confidence.reset();
        self.temporal.reset();
        self.smoother.reset();
        self.had_hand = false;
    }

    /// Snapshot of detection and dispatch statistics
    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            detector: self.detector.stats(),
            events_published: self.bus.events_published(),
            handlers: self.handlers.stats(),
        }
    }
}
