//! Publish/subscribe fan-out for classified events.
//!
//! Each newly stored event is delivered to every live subscriber through
//! a tokio broadcast channel. Delivery is best-effort per subscriber: a
//! slow consumer's bounded buffer drops its oldest entries (the channel's
//! lag semantics) instead of stalling the publisher or other subscribers.
//! Dropped receivers are reclaimed by the channel itself, so the ingest
//! path never tracks consumer lifecycle.
//!
//! A new subscription immediately replays the current latest event, if
//! one exists, before anything published afterwards, so a freshly
//! attached dashboard never starts blank. Events travel with the store's
//! sequence number so a subscription can reconcile the replayed event
//! against whatever was already queued when it attached.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::store::EventStore;
use crate::telemetry::ClassifiedEvent;

/// Default per-subscriber buffer depth.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fan-out hub delivering every published event to all subscribers.
pub struct Broadcaster {
    tx: broadcast::Sender<(u64, Arc<ClassifiedEvent>)>,
}

impl Broadcaster {
    /// Create a broadcaster whose subscribers buffer up to `capacity`
    /// undelivered events each.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Deliver an event to every currently active subscription under the
    /// sequence number the store assigned it.
    ///
    /// Fire-and-forget: publishing with zero subscribers is not an error.
    /// Returns the number of subscribers the event was queued for.
    pub fn publish(&self, seq: u64, event: Arc<ClassifiedEvent>) -> usize {
        match self.tx.send((seq, event)) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("no live subscribers; event not fanned out");
                0
            }
        }
    }

    /// Open a subscription, replaying the store's latest event first.
    ///
    /// The receiver is registered before the latest slot is read, so any
    /// events published in between sit in the queue while the newest of
    /// them is also the replay. The subscription skips every queued event
    /// at or before the replayed sequence number, keeping the
    /// per-subscriber stream strictly ordered with no duplicates no
    /// matter how many publishes land inside that window.
    pub fn subscribe(&self, store: &EventStore) -> Subscription {
        let rx = self.tx.subscribe();
        let replay = store.latest_sequenced();
        Subscription {
            replay,
            skip_through: 0,
            rx,
        }
    }

    /// Number of currently active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

/// One subscriber's ordered view of the event stream.
pub struct Subscription {
    replay: Option<(u64, Arc<ClassifiedEvent>)>,
    skip_through: u64,
    rx: broadcast::Receiver<(u64, Arc<ClassifiedEvent>)>,
}

impl Subscription {
    /// Receive the next event, or `None` once the publisher is gone and
    /// the buffer is drained.
    ///
    /// When this subscriber has lagged past its buffer, the oldest
    /// buffered events are dropped and reception continues in order with
    /// no duplicates.
    pub async fn recv(&mut self) -> Option<Arc<ClassifiedEvent>> {
        if let Some((seq, event)) = self.replay.take() {
            self.skip_through = seq;
            return Some(event);
        }
        loop {
            match self.rx.recv().await {
                Ok((seq, event)) => {
                    // Anything at or before the replayed sequence was
                    // already delivered through the latest slot.
                    if seq <= self.skip_through {
                        continue;
                    }
                    return Some(event);
                }
                Err(broadcast::error::RecvError::Lagged(dropped)) => {
                    warn!(dropped, "subscriber lagged; oldest buffered events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
