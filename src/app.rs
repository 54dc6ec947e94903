//! Application hub tying the core components together.
//!
//! `SentinelApp` owns the event store, the broadcaster, the mission
//! controller, and the source-liveness flag, and exposes the outward
//! surface external collaborators (HTTP layers, dashboards, exporters)
//! consume. Nothing here is a global: collaborators receive an
//! `Arc<SentinelApp>` explicitly.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::broadcast::{Broadcaster, Subscription};
use crate::config::Config;
use crate::error::{AppResult, SentinelError};
use crate::export;
use crate::mission::MissionController;
use crate::store::EventStore;
use crate::telemetry::{classify, ClassifiedEvent, MissionMode, Sample, ThresholdSet};

/// Default window size for event queries when the caller supplies none.
pub const DEFAULT_EVENT_LIMIT: i64 = 100;

/// Snapshot of system health for the status query.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct StatusReport {
    /// Whether the reading source is currently live.
    pub connected: bool,
    /// Active mission mode.
    pub mode: MissionMode,
    /// Total events currently retained.
    pub sensor_count: usize,
    /// Timestamp of the latest event, or 0 before first ingestion.
    pub last_update: i64,
}

/// Central hub owning the shared state of the monitor.
pub struct SentinelApp {
    store: EventStore,
    broadcaster: Broadcaster,
    mission: MissionController,
    connected: AtomicBool,
}

impl SentinelApp {
    /// Build a hub with explicit capacities.
    pub fn new(store_capacity: usize, channel_capacity: usize) -> Self {
        Self {
            store: EventStore::new(store_capacity),
            broadcaster: Broadcaster::new(channel_capacity),
            mission: MissionController::default(),
            connected: AtomicBool::new(false),
        }
    }

    /// Build a hub from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.store.capacity, config.broadcast.channel_capacity)
    }

    /// The rolling event history.
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// The mission/threshold controller.
    pub fn mission(&self) -> &MissionController {
        &self.mission
    }

    /// Current source liveness.
    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Record source liveness; called by the ingest loop.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    /// Classify, store, and publish one validated sample.
    ///
    /// The event reaches the store before it reaches any subscriber, so a
    /// subscriber never observes a published event that `latest()` does
    /// not yet reflect. Returns the stored event.
    pub fn ingest(&self, sample: Sample) -> Arc<ClassifiedEvent> {
        let (mode, thresholds) = self.mission.current();
        let (status, alarms) = classify(&sample, &thresholds);
        let event = ClassifiedEvent {
            sample,
            status,
            alarms,
            mode,
            connected: self.connected(),
        };
        let (seq, stored) = self.store.append(event);
        self.broadcaster.publish(seq, Arc::clone(&stored));
        stored
    }

    /// The status query: connectivity, mode, retained count, last update.
    pub fn status(&self) -> StatusReport {
        StatusReport {
            connected: self.connected(),
            mode: self.mission.mode(),
            sensor_count: self.store.len(),
            last_update: self
                .store
                .latest()
                .map_or(0, |event| event.sample.timestamp),
        }
    }

    /// The events query: last `limit` events, oldest of the window first.
    pub fn recent_events(&self, limit: i64) -> Vec<Arc<ClassifiedEvent>> {
        self.store.recent(limit)
    }

    /// The mode-change command. Unknown names are rejected.
    pub fn set_mode(&self, name: &str) -> Result<ThresholdSet, SentinelError> {
        let thresholds = self.mission.set_mode(name)?;
        tracing::info!(mode = name, "mission mode changed");
        Ok(thresholds)
    }

    /// The threshold-update command. Unknown keys are ignored.
    pub fn set_thresholds(&self, overrides: &HashMap<String, f64>) -> ThresholdSet {
        self.mission.set_thresholds(overrides)
    }

    /// Open a live subscription with immediate latest-event replay.
    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe(&self.store)
    }

    /// Render the full retained history as CSV.
    pub fn export_csv(&self) -> AppResult<String> {
        export::render_csv(&self.store.snapshot())
    }
}

impl Default for SentinelApp {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
