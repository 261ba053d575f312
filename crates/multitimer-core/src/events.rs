use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dispatch::lock;
use crate::state::TimerState;

/// Identifies one observer registration; returned by `subscribe`.
pub type SubscriptionId = u64;

/// Every observable change on a timer produces an event carrying the old and
/// new value. Delivery for one mutation finishes before the next mutation of
/// the same timer publishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerEvent {
    StateChanged {
        from: TimerState,
        to: TimerState,
        at: DateTime<Utc>,
    },
    ProgressChanged {
        from: f64,
        to: f64,
        at: DateTime<Utc>,
    },
    RemainingChanged {
        from_ms: u64,
        to_ms: u64,
        at: DateTime<Utc>,
    },
    NameChanged {
        from: String,
        to: String,
        at: DateTime<Utc>,
    },
    IntervalChanged {
        from_secs: u64,
        to_secs: u64,
        at: DateTime<Utc>,
    },
    WarnAfterChanged {
        from_secs: u64,
        to_secs: u64,
        at: DateTime<Utc>,
    },
    RepeatChanged {
        from: bool,
        to: bool,
        at: DateTime<Utc>,
    },
}

/// Group-level counterpart of [`TimerEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GroupEvent {
    StateChanged {
        from: TimerState,
        to: TimerState,
        at: DateTime<Utc>,
    },
    TimerAdded {
        name: String,
        index: usize,
        at: DateTime<Utc>,
    },
    TimerRemoved {
        name: String,
        at: DateTime<Utc>,
    },
    DelayStartChanged {
        from: bool,
        to: bool,
        at: DateTime<Utc>,
    },
    MinutesOffsetChanged {
        from: u8,
        to: u8,
        at: DateTime<Utc>,
    },
}

pub(crate) type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Subscription registry shared by timers and groups. Callbacks are cloned
/// out before invocation, so observers may subscribe or unsubscribe from
/// inside a callback without deadlocking.
pub(crate) struct Observers<E> {
    entries: Mutex<Vec<(SubscriptionId, Callback<E>)>>,
    next_id: AtomicU64,
}

impl<E> Observers<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn subscribe(&self, callback: Callback<E>) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.entries).push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Registered callbacks, in subscription order.
    pub(crate) fn snapshot(&self) -> Vec<Callback<E>> {
        lock(&self.entries).iter().map(|(_, cb)| Arc::clone(cb)).collect()
    }
}
