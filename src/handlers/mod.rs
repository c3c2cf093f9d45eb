//! Gesture handlers: the action side of the pipeline.
//!
//! A handler maps confirmed gesture events to commands for the host
//! application. Handlers are registered with a priority and a gesture
//! filter, throttled by a per-handler cooldown, and isolated from each
//! other: one failing handler never blocks the rest.

/// Handler registry and dispatch manager
pub mod manager;

/// Viewport control (rotate, pan) with movement smoothing
pub mod viewport;

/// Animation playback control
pub mod animation;

use crate::events::Event;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An action for the host application, produced by a handler
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    args: HashMap<String, f64>,
}

impl Command {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: HashMap::new(),
        }
    }

    /// Attach a named numeric argument (builder style)
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: f64) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn args(&self) -> &HashMap<String, f64> {
        &self.args
    }
}

/// Per-tick input to a handler, derived from a gesture event
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Gesture name that triggered dispatch
    pub gesture: String,
    /// Event timestamp in seconds
    pub timestamp: f64,
    /// Numeric payload carried by the event (deltas, confidence, ...)
    pub data: HashMap<String, f64>,
}

impl HandlerContext {
    /// Build a context from a gesture event
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            gesture: event.action().to_string(),
            timestamp: event.timestamp(),
            data: event.data().clone(),
        }
    }

    /// Numeric datum accessor with a default
    #[must_use]
    pub fn datum(&self, key: &str) -> f64 {
        self.data.get(key).copied().unwrap_or(0.0)
    }
}

/// Maps gesture events to host commands.
///
/// `handle` returns `Ok(None)` when the handler chooses not to act this
/// tick (edge triggering, sub-threshold movement). Errors are contained
/// by the manager and logged.
pub trait GestureHandler: Send {
    /// Unique handler name
    fn name(&self) -> &str;

    /// Produce a command for the tick, or nothing
    fn handle(&mut self, ctx: &HandlerContext) -> Result<Option<Command>>;

    /// Called when the manager enables this handler
    fn on_enable(&mut self) {}

    /// Called when the manager disables or removes this handler
    fn on_disable(&mut self) {}
}

/// Declarative handler settings.
///
/// An empty `gestures` list is a wildcard: the handler receives every
/// gesture event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub enabled: bool,
    pub priority: i32,
    pub gestures: Vec<String>,
    /// Minimum seconds between executions
    pub cooldown: f64,
    pub sensitivity: f64,
    pub invert_x: bool,
    pub invert_y: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 0,
            gestures: Vec::new(),
            cooldown: crate::constants::DEFAULT_HANDLER_COOLDOWN,
            sensitivity: 1.0,
            invert_x: false,
            invert_y: false,
        }
    }
}

impl HandlerConfig {
    /// Whether this handler wants events for the named gesture
    #[must_use]
    pub fn matches(&self, gesture: &str) -> bool {
        self.gestures.is_empty() || self.gestures.iter().any(|g| g == gesture)
    }
}
