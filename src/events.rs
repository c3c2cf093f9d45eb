//! Event bus decoupling gesture detection from handler dispatch.
//!
//! Subscribers register per event type, optionally with a predicate.
//! Publishing snapshots the subscriber list under the lock and invokes
//! callbacks after releasing it, so a callback can subscribe or
//! unsubscribe without deadlocking. A panicking callback is contained
//! and logged; the remaining subscribers still run.

use crate::{Error, Result};
use log::{debug, error};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A confirmed, validated gesture
    Gesture,
    /// Pipeline lifecycle (start, stop, hand lost)
    System,
    /// A contained failure worth reporting downstream
    Error,
}

/// Immutable event record.
///
/// Construction validates that source and action are non-empty; after
/// that the event never changes, so it can be shared freely across
/// subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    event_type: EventType,
    source: String,
    action: String,
    timestamp: f64,
    data: HashMap<String, f64>,
}

impl Event {
    pub fn new(
        event_type: EventType,
        source: impl Into<String>,
        action: impl Into<String>,
        timestamp: f64,
    ) -> Result<Self> {
        let source = source.into();
        let action = action.into();
        if source.is_empty() {
            return Err(Error::InvalidEvent("source must not be empty".to_string()));
        }
        if action.is_empty() {
            return Err(Error::InvalidEvent("action must not be empty".to_string()));
        }
        Ok(Self {
            event_type,
            source,
            action,
            timestamp,
            data: HashMap::new(),
        })
    }

    /// Attach a named numeric datum (builder style)
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: f64) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    #[must_use]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    #[must_use]
    pub fn data(&self) -> &HashMap<String, f64> {
        &self.data
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&Event) + Send + Sync>;
type Predicate = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    callback: Callback,
    predicate: Option<Predicate>,
}

/// Publish/subscribe bus keyed by event type.
pub struct EventBus {
    subscribers: Mutex<HashMap<EventType, Vec<Subscriber>>>,
    next_id: AtomicU64,
    events_published: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            events_published: AtomicU64::new(0),
        }
    }

    /// Register a callback for an event type, with an optional predicate
    /// that filters which events reach it.
    pub fn subscribe<F>(&self, event_type: EventType, callback: F, predicate: Option<Predicate>) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.entry(event_type).or_default().push(Subscriber {
            id,
            callback: Arc::new(callback),
            predicate,
        });
        debug!("Subscribed {id:?} to {event_type:?}");
        id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap();
        for list in subscribers.values_mut() {
            let before = list.len();
            list.retain(|s| s.id != id);
            if list.len() != before {
                debug!("Unsubscribed {id:?}");
                return true;
            }
        }
        false
    }

    /// Drop all subscribers for one event type, or for every type
    pub fn clear_subscribers(&self, event_type: Option<EventType>) {
        let mut subscribers = self.subscribers.lock().unwrap();
        match event_type {
            Some(event_type) => {
                subscribers.remove(&event_type);
            }
            None => subscribers.clear(),
        }
    }

    /// Deliver an event to every matching subscriber.
    ///
    /// The subscriber list is snapshotted under the lock and callbacks run
    /// after it is released. Returns the number of callbacks invoked.
    pub fn publish(&self, event: &Event) -> usize {
        let snapshot: Vec<(SubscriptionId, Callback)> = {
            let subscribers = self.subscribers.lock().unwrap();
            subscribers
                .get(&event.event_type())
                .map(|list| {
                    list.iter()
                        .filter(|s| s.predicate.as_ref().map_or(true, |p| p(event)))
                        .map(|s| (s.id, Arc::clone(&s.callback)))
                        .collect()
                })
                .unwrap_or_default()
        };

        self.events_published.fetch_add(1, Ordering::Relaxed);

        let mut delivered = 0;
        for (id, callback) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                error!("Subscriber {id:?} panicked handling {}.{}", event.source(), event.action());
            } else {
                delivered += 1;
            }
        }
        delivered
    }

    /// Total number of events published since creation
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Current subscriber count per event type
    #[must_use]
    pub fn subscriber_counts(&self) -> HashMap<EventType, usize> {
        let subscribers = self.subscribers.lock().unwrap();
        subscribers.iter().map(|(k, v)| (*k, v.len())).collect()
    }
}
