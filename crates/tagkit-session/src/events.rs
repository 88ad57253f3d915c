//! Fan-out event channel.
//!
//! Every subscriber owns an unbounded queue, so a slow subscriber never
//! holds up publishing or other subscribers, and each one sees every event
//! published after it subscribed, in publish order.
//!
//! ```text
//!                 ┌──────────────┐      ┌───────────────┐
//!                 │              │─────►│ Subscription  │  (tags only)
//! SessionManager ─┤ EventChannel │      └───────────────┘
//!   publish()     │              │      ┌───────────────┐
//!                 │              │─────►│ Subscription  │  (all kinds)
//!                 └──────────────┘      └───────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use tagkit_core::{TagSnapshot, WriteProgress, WriteResult};
use tokio::sync::mpsc;
use tracing::trace;

/// Event published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "payload")]
pub enum NfcEvent {
    /// A tag was read during a read session.
    TagDiscovered(TagSnapshot),

    /// A write-mode operation started or finished.
    WriteProgress(WriteProgress),

    /// Outcome of a write, erase, format or lock attempt.
    WriteResult(WriteResult),
}

impl NfcEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::TagDiscovered(_) => EventKind::TagDiscovered,
            Self::WriteProgress(_) => EventKind::WriteProgress,
            Self::WriteResult(_) => EventKind::WriteResult,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    TagDiscovered,
    WriteProgress,
    WriteResult,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagDiscovered => write!(f, "TagDiscovered"),
            Self::WriteProgress => write!(f, "WriteProgress"),
            Self::WriteResult => write!(f, "WriteResult"),
        }
    }
}

/// Which event kinds a subscription receives.
///
/// # Examples
///
/// ```
/// use tagkit_session::events::{EventFilter, EventKind};
///
/// let filter = EventFilter::only(EventKind::WriteProgress).with(EventKind::WriteResult);
/// assert!(filter.accepts(EventKind::WriteResult));
/// assert!(!filter.accepts(EventKind::TagDiscovered));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    tag_discovered: bool,
    write_progress: bool,
    write_result: bool,
}

impl EventFilter {
    pub fn all() -> Self {
        Self {
            tag_discovered: true,
            write_progress: true,
            write_result: true,
        }
    }

    pub fn only(kind: EventKind) -> Self {
        Self::default().with(kind)
    }

    pub fn with(mut self, kind: EventKind) -> Self {
        *self.slot(kind) = true;
        self
    }

    pub fn accepts(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::TagDiscovered => self.tag_discovered,
            EventKind::WriteProgress => self.write_progress,
            EventKind::WriteResult => self.write_result,
        }
    }

    fn slot(&mut self, kind: EventKind) -> &mut bool {
        match kind {
            EventKind::TagDiscovered => &mut self.tag_discovered,
            EventKind::WriteProgress => &mut self.write_progress,
            EventKind::WriteResult => &mut self.write_result,
        }
    }
}

#[derive(Debug)]
struct Subscriber {
    filter: EventFilter,
    tx: mpsc::UnboundedSender<NfcEvent>,
}

#[derive(Debug, Default)]
struct Registry {
    subscribers: Mutex<BTreeMap<u64, Subscriber>>,
    next_id: AtomicU64,
}

impl Registry {
    fn subscribers(&self) -> MutexGuard<'_, BTreeMap<u64, Subscriber>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Publish side of the event channel. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct EventChannel {
    registry: Arc<Registry>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for the kinds `filter` accepts.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry.subscribers().insert(id, Subscriber { filter, tx });
        trace!(subscription = id, "Subscriber registered");

        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
            removed: false,
        }
    }

    /// Deliver `event` to every matching subscriber.
    ///
    /// Returns the number of subscribers that received it. Subscribers whose
    /// receiving end is gone are dropped from the registry.
    pub fn publish(&self, event: NfcEvent) -> usize {
        let kind = event.kind();
        let mut subscribers = self.registry.subscribers();
        let mut delivered = 0;

        subscribers.retain(|_, subscriber| {
            if !subscriber.filter.accepts(kind) {
                return !subscriber.tx.is_closed();
            }
            match subscriber.tx.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });

        trace!(%kind, delivered, "Event published");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.subscribers().len()
    }
}

/// Receive side of one subscriber.
///
/// Dropping a subscription removes it from the channel.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<NfcEvent>,
    registry: Weak<Registry>,
    removed: bool,
}

impl Subscription {
    /// Wait for the next event.
    ///
    /// Returns `None` once the subscription is removed and its queue is
    /// drained, or once the channel itself is gone.
    pub async fn recv(&mut self) -> Option<NfcEvent> {
        self.rx.recv().await
    }

    /// Next queued event, without waiting.
    pub fn try_recv(&mut self) -> Option<NfcEvent> {
        self.rx.try_recv().ok()
    }

    /// Stop receiving events. Safe to call more than once; other
    /// subscribers are unaffected.
    pub fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        self.rx.close();
        if let Some(registry) = self.registry.upgrade() {
            registry.subscribers().remove(&self.id);
            trace!(subscription = self.id, "Subscriber removed");
        }
    }

    pub fn is_active(&self) -> bool {
        !self.removed && self.registry.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
