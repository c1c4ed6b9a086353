// In-process publish/subscribe channel between view regions.
//
// The roster display publishes `OpenSuggestions` when the user asks for the
// detailed view of a filled role; the detail view subscribes and reacts.
// Delivery is synchronous, in subscription order, with no queueing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::debug;

use crate::draft::{Role, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    OpenSuggestions,
}

/// Payload of a detail-view request for an already-filled role.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSuggestions {
    pub champion: String,
    pub role: Role,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    OpenSuggestions(OpenSuggestions),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::OpenSuggestions(_) => Topic::OpenSuggestions,
        }
    }
}

type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Registration {
    id: u64,
    topic: Topic,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    handlers: Mutex<Vec<Registration>>,
}

impl Registry {
    fn handlers(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.handlers.lock().expect("event registry mutex poisoned")
    }

    fn remove(&self, id: u64) -> bool {
        let mut handlers = self.handlers();
        let before = handlers.len();
        handlers.retain(|r| r.id != id);
        handlers.len() != before
    }
}

/// Explicitly constructed bus; clone it into every component that publishes
/// or subscribes.
#[derive(Clone, Default)]
pub struct EventChannel {
    registry: Arc<Registry>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`. The handler stays registered until the
    /// returned `Subscription` is released or dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.handlers().push(Registration {
            id,
            topic,
            handler: Arc::new(handler),
        });
        debug!(?topic, id, "subscribed");
        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Invoke every handler registered for the event's topic, in
    /// registration order, before returning. Returns the number invoked.
    ///
    /// Handlers run outside the registry lock, so they may subscribe or
    /// unsubscribe; such changes apply from the next publish.
    pub fn publish(&self, event: &Event) -> usize {
        let topic = event.topic();
        let targets: Vec<Handler> = self
            .registry
            .handlers()
            .iter()
            .filter(|r| r.topic == topic)
            .map(|r| Arc::clone(&r.handler))
            .collect();

        debug!(?topic, subscribers = targets.len(), "publishing event");
        for handler in &targets {
            handler(event);
        }
        targets.len()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.registry
            .handlers()
            .iter()
            .filter(|r| r.topic == topic)
            .count()
    }
}

/// Capability to deregister a handler. Released on drop.
pub struct Subscription {
    registry: Weak<Registry>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.remove(self.id) {
                debug!(id = self.id, "unsubscribed");
            }
        }
    }
}
