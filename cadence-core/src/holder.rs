use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::{data::Event, util::Sequence};

/// A published event together with the holder version it was stored under.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub version: u64,
    pub event: Arc<Event<T>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            event: self.event.clone(),
        }
    }
}

struct Slot<T> {
    latest: Option<Snapshot<T>>,
    versions: Sequence<u64>,
    subscribers: Vec<Sender<Snapshot<T>>>,
}

/// Single-slot observable.  Every post replaces the stored event and is forwarded to all live
/// subscribers; the last post wins.
pub struct StateHolder<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> StateHolder<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                latest: None,
                versions: Sequence::new(1),
                subscribers: Vec::new(),
            }),
        }
    }

    /// Stores `event` and returns its version.  Never blocks on subscribers.
    pub fn post(&self, event: Event<T>) -> u64 {
        let mut slot = self.slot.lock();
        let version = slot.versions.advance();
        let snapshot = Snapshot {
            version,
            event: Arc::new(event),
        };
        // Senders are unbounded, so this only fails for dropped receivers.
        slot.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
        slot.latest = Some(snapshot);
        version
    }

    pub fn latest(&self) -> Option<Snapshot<T>> {
        self.slot.lock().latest.clone()
    }

    pub fn latest_event(&self) -> Option<Arc<Event<T>>> {
        self.latest().map(|snapshot| snapshot.event)
    }

    /// Version of the stored event, or 0 if nothing was posted yet.
    pub fn version(&self) -> u64 {
        self.slot
            .lock()
            .latest
            .as_ref()
            .map_or(0, |snapshot| snapshot.version)
    }

    /// Receives every later post.  The current event, if any, is delivered first.
    pub fn subscribe(&self) -> Receiver<Snapshot<T>> {
        let (send, recv) = unbounded();
        let mut slot = self.slot.lock();
        if let Some(latest) = &slot.latest {
            let _ = send.send(latest.clone());
        }
        slot.subscribers.push(send);
        recv
    }
}

impl<T: Clone> StateHolder<T> {
    /// Payload of the stored envelope, whether it succeeded or not.
    pub fn latest_state(&self) -> Option<T> {
        self.latest_event()
            .and_then(|event| event.envelope.data().cloned())
    }
}

impl<T> Default for StateHolder<T> {
    fn default() -> Self {
        Self::new()
    }
}
