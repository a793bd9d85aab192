//! Where snapshots go: the [`SnapshotSink`] seam and the fan-out
//! [`Broadcaster`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, trace, warn};

use crate::snapshot::Snapshot;

/// Receives every snapshot the controller emits.
///
/// Publishing is fire-and-forget: implementations swallow their own delivery
/// failures and must not mutate anything the controller owns.
pub trait SnapshotSink {
    fn publish(&self, snapshot: &Snapshot);
}

impl<T: SnapshotSink + ?Sized> SnapshotSink for Arc<T> {
    fn publish(&self, snapshot: &Snapshot) {
        (**self).publish(snapshot);
    }
}

impl<T: SnapshotSink + ?Sized> SnapshotSink for &T {
    fn publish(&self, snapshot: &Snapshot) {
        (**self).publish(snapshot);
    }
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl SnapshotSink for NoopSink {
    fn publish(&self, _snapshot: &Snapshot) {}
}

/// Handle returned by [`Broadcaster::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// Frames queued per subscriber before new ones are dropped for it.
pub const SUBSCRIBER_BACKLOG: usize = 64;

struct Subscriber {
    id: SubscriberId,
    tx: SyncSender<Arc<str>>,
}

/// Registry of attached subscribers.
///
/// Each published snapshot is serialized to JSON once and the same frame is
/// handed to every subscriber. Subscribers attach and detach from any thread
/// at any time. A subscriber whose receiver has been dropped is removed on
/// the next publish; the others still get the frame. Each queue holds at
/// most [`SUBSCRIBER_BACKLOG`] frames, and a subscriber that falls that far
/// behind misses frames until it catches up.
#[derive(Default)]
pub struct Broadcaster {
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new subscriber. Frames published from now on arrive on
    /// the returned receiver.
    pub fn attach(&self) -> (SubscriberId, Receiver<Arc<str>>) {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::sync_channel(SUBSCRIBER_BACKLOG);
        self.lock().push(Subscriber { id, tx });
        (id, rx)
    }

    /// Remove a subscriber. Returns `false` if it was not attached.
    pub fn detach(&self, id: SubscriberId) -> bool {
        let mut subs = self.lock();
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }
}

impl SnapshotSink for Broadcaster {
    fn publish(&self, snapshot: &Snapshot) {
        let frame: Arc<str> = match snapshot.to_json() {
            Ok(json) => json.into(),
            Err(e) => {
                error!("failed to serialize snapshot: {e}");
                return;
            }
        };
        let mut subs = self.lock();
        subs.retain(|s| match s.tx.try_send(Arc::clone(&frame)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("subscriber {:?} is behind, skipping frame", s.id);
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("subscriber {:?} disconnected, dropping it", s.id);
                false
            }
        });
        trace!("published frame to {} subscribers", subs.len());
    }
}
