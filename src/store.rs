//! Bounded rolling store of classified events.
//!
//! The store is the single shared history of the system: a FIFO ring of
//! the most recent classified events plus a "latest" slot. One ingest
//! task appends; arbitrarily many reader tasks query concurrently. The
//! whole structure sits behind one `RwLock`, held only for the duration
//! of a single short update, so readers never observe a partially
//! appended or partially evicted state.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

use crate::telemetry::ClassifiedEvent;

/// Default rolling-history capacity.
pub const DEFAULT_CAPACITY: usize = 1000;

struct StoreInner {
    events: VecDeque<Arc<ClassifiedEvent>>,
    latest: Option<(u64, Arc<ClassifiedEvent>)>,
    next_seq: u64,
}

/// Thread-safe, capacity-bounded event history.
///
/// Events are immutable once appended; the only mutation besides append
/// is FIFO eviction when the capacity is exceeded. The store is created
/// empty and lives for the process lifetime.
pub struct EventStore {
    inner: RwLock<StoreInner>,
    capacity: usize,
}

impl EventStore {
    /// Create a store holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                events: VecDeque::with_capacity(capacity.max(1)),
                latest: None,
                next_seq: 1,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Configured capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append one event, evicting from the head when over capacity.
    ///
    /// Atomic with respect to concurrent readers. Assigns the event the
    /// next position in the store's monotonically increasing sequence and
    /// returns it alongside the shared handle under which the event was
    /// stored, so the caller can publish the exact stored value.
    pub fn append(&self, event: ClassifiedEvent) -> (u64, Arc<ClassifiedEvent>) {
        let event = Arc::new(event);
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.events.push_back(Arc::clone(&event));
        while inner.events.len() > self.capacity {
            inner.events.pop_front();
        }
        inner.latest = Some((seq, Arc::clone(&event)));
        (seq, event)
    }

    /// The most recent event, if any reading has been ingested yet.
    pub fn latest(&self) -> Option<Arc<ClassifiedEvent>> {
        self.latest_sequenced().map(|(_, event)| event)
    }

    /// The most recent event together with its sequence number.
    pub fn latest_sequenced(&self) -> Option<(u64, Arc<ClassifiedEvent>)> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.latest.clone()
    }

    /// The last `min(limit, len)` events in insertion order, oldest of
    /// the window first. A non-positive `limit` returns nothing rather
    /// than erroring, to stay robust against external callers.
    pub fn recent(&self, limit: i64) -> Vec<Arc<ClassifiedEvent>> {
        if limit <= 0 {
            return Vec::new();
        }
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let len = inner.events.len();
        let window = (limit as usize).min(len);
        inner.events.iter().skip(len - window).cloned().collect()
    }

    /// A consistent copy of the entire retained history, oldest first.
    pub fn snapshot(&self) -> Vec<Arc<ClassifiedEvent>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.events.iter().cloned().collect()
    }

    /// Number of events currently retained.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.events.len()
    }

    /// Whether any event has been retained.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{classify, MissionMode, Sample, Status, ThresholdSet};

    fn event(timestamp: i64) -> ClassifiedEvent {
        let sample = Sample {
            timestamp,
            temperature: 22.0,
            humidity: 45.0,
            gas_level: 200,
            ir_detection: 0,
            distance: 100,
        };
        let (status, alarms) = classify(&sample, &ThresholdSet::default());
        ClassifiedEvent {
            sample,
            status,
            alarms,
            mode: MissionMode::Eva,
            connected: true,
        }
    }

    #[test]
    fn starts_empty_with_no_latest() {
        let store = EventStore::default();
        assert!(store.is_empty());
        assert!(store.latest().is_none());
        assert!(store.recent(100).is_empty());
    }

    #[test]
    fn append_updates_latest_and_length() {
        let store = EventStore::new(10);
        store.append(event(1));
        store.append(event(2));
        assert_eq!(store.len(), 2);
        assert_eq!(store.latest().unwrap().sample.timestamp, 2);
        assert_eq!(store.latest().unwrap().status, Status::Ok);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let store = EventStore::new(3);
        for ts in 1..=4 {
            store.append(event(ts));
        }
        assert_eq!(store.len(), 3);
        let timestamps: Vec<i64> = store
            .snapshot()
            .iter()
            .map(|e| e.sample.timestamp)
            .collect();
        assert_eq!(timestamps, vec![2, 3, 4]);
        assert_eq!(store.latest().unwrap().sample.timestamp, 4);
    }

    #[test]
    fn never_exceeds_capacity_under_many_appends() {
        let store = EventStore::new(5);
        for ts in 0..100 {
            store.append(event(ts));
            assert!(store.len() <= 5);
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn recent_returns_window_in_insertion_order() {
        let store = EventStore::new(10);
        for ts in 1..=6 {
            store.append(event(ts));
        }
        let window: Vec<i64> = store
            .recent(3)
            .iter()
            .map(|e| e.sample.timestamp)
            .collect();
        assert_eq!(window, vec![4, 5, 6]);
    }

    #[test]
    fn recent_clamps_to_available_events() {
        let store = EventStore::new(10);
        store.append(event(1));
        assert_eq!(store.recent(100).len(), 1);
    }

    #[test]
    fn sequence_numbers_increase_monotonically_across_eviction() {
        let store = EventStore::new(2);
        let mut seqs = Vec::new();
        for ts in 1..=4 {
            let (seq, _) = store.append(event(ts));
            seqs.push(seq);
        }
        assert_eq!(seqs, vec![1, 2, 3, 4]);
        let (latest_seq, latest) = store.latest_sequenced().unwrap();
        assert_eq!(latest_seq, 4);
        assert_eq!(latest.sample.timestamp, 4);
    }

    #[test]
    fn non_positive_limit_returns_nothing() {
        let store = EventStore::new(10);
        store.append(event(1));
        assert!(store.recent(0).is_empty());
        assert!(store.recent(-5).is_empty());
    }
}
