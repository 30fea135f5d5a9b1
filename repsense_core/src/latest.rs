//! Single-slot, latest-value-wins handoff between the frame loop and a
//! consumer.
//!
//! The publisher overwrites; it never waits for a reader and never queues.
//! A reader sees at most one pending value: whatever was published last.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    version: u64,
}

fn lock<T>(slot: &Mutex<Slot<T>>) -> MutexGuard<'_, Slot<T>> {
    // A panicking reader cannot leave the slot half-written
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Create a connected publisher/subscriber pair
pub fn channel<T: Clone>() -> (Publisher<T>, Subscriber<T>) {
    let slot = Arc::new(Mutex::new(Slot {
        value: None,
        version: 0,
    }));
    let subscriber = Subscriber {
        slot: Arc::clone(&slot),
        seen: 0,
    };
    (Publisher { slot }, subscriber)
}

/// Writing half, owned by the dispatch loop
#[derive(Debug)]
pub struct Publisher<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T: Clone> Publisher<T> {
    /// Replace whatever is in the slot
    pub fn publish(&self, value: T) {
        let mut slot = lock(&self.slot);
        slot.value = Some(value);
        slot.version += 1;
    }

    /// Empty the slot; readers see this as a change
    pub fn clear(&self) {
        let mut slot = lock(&self.slot);
        if slot.value.take().is_some() {
            slot.version += 1;
        }
    }

    /// A new reader that has not seen the current value yet
    pub fn subscribe(&self) -> Subscriber<T> {
        Subscriber {
            slot: Arc::clone(&self.slot),
            seen: 0,
        }
    }
}

/// Reading half; every clone tracks what it has seen independently
#[derive(Debug, Clone)]
pub struct Subscriber<T> {
    slot: Arc<Mutex<Slot<T>>>,
    seen: u64,
}

impl<T: Clone> Subscriber<T> {
    /// Current value, whether or not it was read before
    pub fn latest(&self) -> Option<T> {
        lock(&self.slot).value.clone()
    }

    /// Whether something was published or cleared since the last `fresh`
    pub fn has_changed(&self) -> bool {
        lock(&self.slot).version != self.seen
    }

    /// The current value if it changed since the last call, else `None`
    pub fn fresh(&mut self) -> Option<T> {
        let slot = lock(&self.slot);
        if slot.version == self.seen {
            return None;
        }
        self.seen = slot.version;
        slot.value.clone()
    }
}
