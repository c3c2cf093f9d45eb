//! Handler registration, prioritization, and dispatch.

use crate::events::Event;
use crate::handlers::{Command, GestureHandler, HandlerConfig, HandlerContext};
use crate::{Error, Result};
use log::{debug, error, info, warn};
use std::collections::HashMap;

/// Builds a handler from its configuration
pub type HandlerFactory = Box<dyn Fn(&HandlerConfig) -> Box<dyn GestureHandler> + Send>;

/// Per-handler dispatch statistics
#[derive(Debug, Clone, Default)]
pub struct HandlerStats {
    pub executions: u64,
    pub errors: u64,
    pub skipped_cooldown: u64,
}

struct Entry {
    handler: Box<dyn GestureHandler>,
    config: HandlerConfig,
    last_run: Option<f64>,
    stats: HandlerStats,
}

/// Owns the registered handlers and routes gesture events to them.
///
/// Handlers run in priority order (highest first, ties in registration
/// order). Each handler has an independent cooldown; an event arriving
/// inside the cooldown window is skipped for that handler only.
#[derive(Default)]
pub struct HandlerManager {
    entries: Vec<Entry>,
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named factory for config-driven handler creation
    pub fn register_factory(&mut self, kind: impl Into<String>, factory: HandlerFactory) {
        let kind = kind.into();
        debug!("Registered handler factory: {kind}");
        self.factories.insert(kind, factory);
    }

    /// Build a handler from a registered factory and add it
    pub fn create_from_config(&mut self, kind: &str, config: HandlerConfig) -> Result<()> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| Error::Handler(format!("Unknown handler kind: {kind}")))?;
        let handler = factory(&config);
        self.register(handler, config);
        Ok(())
    }

    /// Add a handler. A duplicate name replaces the old entry (after
    /// firing its disable hook).
    pub fn register(&mut self, mut handler: Box<dyn GestureHandler>, config: HandlerConfig) {
        if let Some(pos) = self.entries.iter().position(|e| e.handler.name() == handler.name()) {
            warn!("Overwriting existing handler: {}", handler.name());
            let mut old = self.entries.remove(pos);
            old.handler.on_disable();
        }

        if config.enabled {
            handler.on_enable();
        }
        info!("Registered handler: {} (priority={})", handler.name(), config.priority);
        self.entries.push(Entry {
            handler,
            config,
            last_run: None,
            stats: HandlerStats::default(),
        });
        // Highest priority first; stable, so ties keep registration order
        self.entries.sort_by_key(|e| std::cmp::Reverse(e.config.priority));
    }

    /// Remove a handler by name, firing its disable hook
    pub fn unregister(&mut self, name: &str) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.handler.name() == name) {
            let mut entry = self.entries.remove(pos);
            entry.handler.on_disable();
            debug!("Unregistered handler: {name}");
            true
        } else {
            false
        }
    }

    /// Enable a handler, firing its enable hook on the transition
    pub fn enable(&mut self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    /// Disable a handler, firing its disable hook on the transition
    pub fn disable(&mut self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.handler.name() == name) else {
            return false;
        };
        if entry.config.enabled != enabled {
            entry.config.enabled = enabled;
            if enabled {
                entry.handler.on_enable();
            } else {
                entry.handler.on_disable();
            }
        }
        true
    }

    /// Dispatch a gesture event to every matching enabled handler.
    ///
    /// Returns the commands produced, in handler priority order. A
    /// handler error is logged and counted; dispatch continues.
    pub fn process_event(&mut self, event: &Event) -> Vec<Command> {
        let ctx = HandlerContext::from_event(event);
        let mut commands = Vec::new();

        for entry in &mut self.entries {
            if !entry.config.enabled || !entry.config.matches(&ctx.gesture) {
                continue;
            }

            if let Some(last_run) = entry.last_run {
                if event.timestamp() - last_run < entry.config.cooldown {
                    entry.stats.skipped_cooldown += 1;
                    continue;
                }
            }

            match entry.handler.handle(&ctx) {
                Ok(command) => {
                    entry.last_run = Some(event.timestamp());
                    entry.stats.executions += 1;
                    if let Some(command) = command {
                        commands.push(command);
                    }
                }
                Err(e) => {
                    entry.stats.errors += 1;
                    error!("Handler {} failed: {e}", entry.handler.name());
                }
            }
        }

        commands
    }

    /// Remove all handlers, firing disable hooks
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.handler.on_disable();
        }
        self.entries.clear();
    }

    /// Dispatch statistics per handler name
    #[must_use]
    pub fn stats(&self) -> HashMap<String, HandlerStats> {
        self.entries
            .iter()
            .map(|e| (e.handler.name().to_string(), e.stats.clone()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Handler that records every execution into a shared log
    struct Recorder {
        name: &'static str,
        log: Arc<std::sync::Mutex<Vec<&'static str>>>,
        enables: Arc<AtomicUsize>,
        disables: Arc<AtomicUsize>,
    }

    impl Recorder {
        fn new(name: &'static str, log: Arc<std::sync::Mutex<Vec<&'static str>>>) -> Self {
            Self {
                name,
                log,
                enables: Arc::new(AtomicUsize::new(0)),
                disables: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl GestureHandler for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn handle(&mut self, _ctx: &HandlerContext) -> Result<Option<Command>> {
            self.log.lock().unwrap().push(self.name);
            Ok(Some(Command::new(self.name)))
        }

        fn on_enable(&mut self) {
            self.enables.fetch_add(1, Ordering::SeqCst);
        }

        fn on_disable(&mut self) {
            self.disables.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Quiet;

    impl GestureHandler for Quiet {
        fn name(&self) -> &str {
            "quiet"
        }

        fn handle(&mut self, _ctx: &HandlerContext) -> Result<Option<Command>> {
            Ok(None)
        }
    }

    struct Failing;

    impl GestureHandler for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn handle(&mut self, _ctx: &HandlerContext) -> Result<Option<Command>> {
            Err(Error::Handler("synthetic failure".to_string()))
        }
    }

    fn event(action: &str, timestamp: f64) -> Event {
        Event::new(EventType::Gesture, "detector", action, timestamp).unwrap()
    }

    fn config(priority: i32, cooldown: f64) -> HandlerConfig {
        HandlerConfig {
            priority,
            cooldown,
            ..HandlerConfig::default()
        }
    }

    #[test]
    fn test_priority_order_with_stable_ties() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut manager = HandlerManager::new();
        manager.register(Box::new(Recorder::new("low", Arc::clone(&log))), config(1, 0.0));
        manager.register(Box::new(Recorder::new("high", Arc::clone(&log))), config(10, 0.0));
        manager.register(Box::new(Recorder::new("tie_a", Arc::clone(&log))), config(5, 0.0));
        manager.register(Box::new(Recorder::new("tie_b", Arc::clone(&log))), config(5, 0.0));

        manager.process_event(&event("OPEN_PALM", 0.0));
        assert_eq!(*log.lock().unwrap(), vec!["high", "tie_a", "tie_b", "low"]);
    }

    #[test]
    fn test_cooldown_throttles_executions() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut manager = HandlerManager::new();
        manager.register(Box::new(Recorder::new("throttled", Arc::clone(&log))), config(0, 0.5));

        // 0.0 runs, 0.1 is inside the window, 0.6 runs again
        manager.process_event(&event("OPEN_PALM", 0.0));
        manager.process_event(&event("OPEN_PALM", 0.1));
        manager.process_event(&event("OPEN_PALM", 0.6));

        assert_eq!(log.lock().unwrap().len(), 2);
        let stats = manager.stats();
        assert_eq!(stats["throttled"].executions, 2);
        assert_eq!(stats["throttled"].skipped_cooldown, 1);
    }

    #[test]
    fn test_commandless_execution_still_arms_cooldown() {
        let mut manager = HandlerManager::new();
        manager.register(Box::new(Quiet), config(0, 0.5));

        assert!(manager.process_event(&event("OPEN_PALM", 0.0)).is_empty());
        manager.process_event(&event("OPEN_PALM", 0.1));

        let stats = manager.stats();
        assert_eq!(stats["quiet"].executions, 1);
        assert_eq!(stats["quiet"].skipped_cooldown, 1);
    }

    #[test]
    fn test_failing_handler_does_not_block_others() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut manager = HandlerManager::new();
        manager.register(Box::new(Failing), config(10, 0.0));
        manager.register(Box::new(Recorder::new("survivor", Arc::clone(&log))), config(0, 0.0));

        let commands = manager.process_event(&event("OPEN_PALM", 0.0));
        assert_eq!(commands.len(), 1);
        assert_eq!(manager.stats()["failing"].errors, 1);
    }

    #[test]
    fn test_cooldowns_are_independent_per_handler() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut manager = HandlerManager::new();
        manager.register(Box::new(Recorder::new("slow", Arc::clone(&log))), config(1, 0.5));
        manager.register(Box::new(Recorder::new("fast", Arc::clone(&log))), config(0, 0.0));

        manager.process_event(&event("OPEN_PALM", 0.0));
        manager.process_event(&event("OPEN_PALM", 0.1));

        assert_eq!(*log.lock().unwrap(), vec!["slow", "fast", "fast"]);
    }

    #[test]
    fn test_gesture_filter() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut manager = HandlerManager::new();
        manager.register(
            Box::new(Recorder::new("palm_only", Arc::clone(&log))),
            HandlerConfig {
                gestures: vec!["OPEN_PALM".to_string()],
                cooldown: 0.0,
                ..HandlerConfig::default()
            },
        );

        manager.process_event(&event("CLOSED_FIST", 0.0));
        assert!(log.lock().unwrap().is_empty());
        manager.process_event(&event("OPEN_PALM", 0.1));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_enable_disable_hooks_fire_on_transition() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorder = Recorder::new("toggle", Arc::clone(&log));
        let enables = Arc::clone(&recorder.enables);
        let disables = Arc::clone(&recorder.disables);

        let mut manager = HandlerManager::new();
        manager.register(Box::new(recorder), config(0, 0.0));
        assert_eq!(enables.load(Ordering::SeqCst), 1);

        assert!(manager.disable("toggle"));
        assert_eq!(disables.load(Ordering::SeqCst), 1);
        // Already disabled: no second hook
        assert!(manager.disable("toggle"));
        assert_eq!(disables.load(Ordering::SeqCst), 1);

        manager.process_event(&event("OPEN_PALM", 0.0));
        assert!(log.lock().unwrap().is_empty());

        assert!(manager.enable("toggle"));
        assert_eq!(enables.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_creation() {
        let mut manager = HandlerManager::new();
        manager.register_factory(
            "recorder",
            Box::new(|_config| {
                Box::new(Recorder::new("made", Arc::new(std::sync::Mutex::new(Vec::new()))))
            }),
        );

        assert!(manager.create_from_config("recorder", HandlerConfig::default()).is_ok());
        assert_eq!(manager.len(), 1);
        assert!(matches!(
            manager.create_from_config("bogus", HandlerConfig::default()),
            Err(Error::Handler(_))
        ));
    }

    #[test]
    fn test_duplicate_registration_replaces() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut manager = HandlerManager::new();
        manager.register(Box::new(Recorder::new("dup", Arc::clone(&log))), config(0, 0.0));
        manager.register(Box::new(Recorder::new("dup", Arc::clone(&log))), config(0, 0.0));
        assert_eq!(manager.len(), 1);
    }
}
