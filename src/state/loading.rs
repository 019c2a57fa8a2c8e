//! Loading state aggregation.
//!
//! Any plugin may mark itself busy; the host shows a single loading
//! indicator while at least one operation is in flight.

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

/// Slot allocator that always hands out the lowest free index.
#[derive(Debug, Default)]
struct SlotPool {
    /// Occupancy per slot
    slots: Vec<bool>,
    /// Indices of unoccupied slots
    free: BTreeSet<usize>,
}

impl SlotPool {
    fn acquire(&mut self) -> usize {
        match self.free.pop_first() {
            Some(slot) => {
                self.slots[slot] = true;
                slot
            }
            None => {
                self.slots.push(true);
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(occupied) if *occupied => {
                *occupied = false;
                self.free.insert(slot);
                true
            }
            _ => false,
        }
    }

    fn in_flight(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

/// Aggregates busy tokens into one boolean status.
#[derive(Debug)]
pub struct LoadingAggregator {
    pool: Mutex<SlotPool>,
    status: watch::Sender<bool>,
}

impl LoadingAggregator {
    /// Create an idle aggregator.
    pub fn new() -> Self {
        let (status, _) = watch::channel(false);
        Self {
            pool: Mutex::new(SlotPool::default()),
            status,
        }
    }

    /// Mark one operation as in flight.
    pub fn begin(self: &Arc<Self>) -> LoadingToken {
        let slot = {
            let mut pool = self.pool.lock();
            let slot = pool.acquire();
            self.publish(&pool);
            slot
        };
        trace!(slot, "Loading slot acquired");

        LoadingToken {
            slot,
            released: AtomicBool::new(false),
            aggregator: Arc::clone(self),
        }
    }

    /// Whether any operation is in flight.
    pub fn is_busy(&self) -> bool {
        *self.status.borrow()
    }

    /// Number of operations in flight.
    pub fn in_flight(&self) -> usize {
        self.pool.lock().in_flight()
    }

    /// Watch the aggregate status.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.status.subscribe()
    }

    fn release(&self, slot: usize) {
        let mut pool = self.pool.lock();
        if pool.release(slot) {
            self.publish(&pool);
            trace!(slot, "Loading slot released");
        }
    }

    fn publish(&self, pool: &SlotPool) {
        let busy = pool.in_flight() > 0;
        self.status.send_if_modified(|current| {
            if *current == busy {
                return false;
            }
            *current = busy;
            true
        });
    }
}

impl Default for LoadingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot handle for an in-flight operation.
///
/// Dropping the token does not release it; call [`LoadingToken::release`].
#[derive(Debug)]
pub struct LoadingToken {
    slot: usize,
    released: AtomicBool,
    aggregator: Arc<LoadingAggregator>,
}

impl LoadingToken {
    /// Pool slot held by this token.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Clear the slot. Later calls do nothing.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.aggregator.release(self.slot);
        }
    }

    /// Whether `release` has been called.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_by_default() {
        let aggregator = Arc::new(LoadingAggregator::new());
        assert!(!aggregator.is_busy());
        assert_eq!(aggregator.in_flight(), 0);
    }

    #[test]
    fn test_busy_until_all_released() {
        let aggregator = Arc::new(LoadingAggregator::new());
        let a = aggregator.begin();
        let b = aggregator.begin();
        assert!(aggregator.is_busy());

        a.release();
        assert!(aggregator.is_busy());

        b.release();
        assert!(!aggregator.is_busy());
    }

    #[test]
    fn test_release_out_of_order() {
        let aggregator = Arc::new(LoadingAggregator::new());
        let tokens: Vec<_> = (0..4).map(|_| aggregator.begin()).collect();

        for index in [2, 0, 3] {
            tokens[index].release();
            assert!(aggregator.is_busy());
        }
        tokens[1].release();
        assert!(!aggregator.is_busy());
    }

    #[test]
    fn test_lowest_free_slot_is_reused() {
        let aggregator = Arc::new(LoadingAggregator::new());
        let a = aggregator.begin();
        let b = aggregator.begin();
        let c = aggregator.begin();
        assert_eq!((a.slot(), b.slot(), c.slot()), (0, 1, 2));

        c.release();
        a.release();

        let d = aggregator.begin();
        assert_eq!(d.slot(), 0);
        let e = aggregator.begin();
        assert_eq!(e.slot(), 2);
        let f = aggregator.begin();
        assert_eq!(f.slot(), 3);
    }

    #[test]
    fn test_double_release_is_noop() {
        let aggregator = Arc::new(LoadingAggregator::new());
        let first = aggregator.begin();
        first.release();

        // The freed slot is taken again by a new operation.
        let second = aggregator.begin();
        assert_eq!(second.slot(), first.slot());

        first.release();
        assert!(first.is_released());
        assert!(aggregator.is_busy());
        assert_eq!(aggregator.in_flight(), 1);

        second.release();
        assert!(!aggregator.is_busy());
    }

    #[test]
    fn test_dropping_token_keeps_slot() {
        let aggregator = Arc::new(LoadingAggregator::new());
        drop(aggregator.begin());
        assert!(aggregator.is_busy());
    }

    #[tokio::test]
    async fn test_subscriber_sees_transitions() {
        let aggregator = Arc::new(LoadingAggregator::new());
        let mut status = aggregator.subscribe();

        let token = aggregator.begin();
        status.changed().await.unwrap();
        assert!(*status.borrow_and_update());

        token.release();
        status.changed().await.unwrap();
        assert!(!*status.borrow_and_update());
    }
}
