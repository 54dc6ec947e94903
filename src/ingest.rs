//! The ingest loop driving the telemetry pipeline.
//!
//! One dedicated task reads lines from the [`ReadingSource`] and, for
//! each valid line, runs parse -> classify -> store -> publish. It is the
//! sole writer to the event store and the sole publisher. A malformed
//! line is logged and skipped; the loop never terminates because of bad
//! input. Shutdown arrives over a watch channel and is observed between
//! reads, so in-flight events complete and the store is never left in a
//! partial state.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::app::SentinelApp;
use crate::error::AppResult;
use crate::source::ReadingSource;
use crate::telemetry::parse_line;

/// Emit a periodic status line every this many processed events.
pub const STATUS_LOG_INTERVAL: u64 = 50;

/// Drives parsing, classification, storage, and publication for every
/// line the reading source yields.
pub struct IngestLoop {
    source: Box<dyn ReadingSource>,
    app: Arc<SentinelApp>,
    processed: u64,
}

impl IngestLoop {
    /// Bind a source to an application hub.
    pub fn new(source: Box<dyn ReadingSource>, app: Arc<SentinelApp>) -> Self {
        Self {
            source,
            app,
            processed: 0,
        }
    }

    /// Run until the source fails or `shutdown` signals true.
    ///
    /// Returns the number of successfully processed events. A source
    /// failure marks the system disconnected but does not discard any
    /// stored history; queries and exports keep serving the last known
    /// state.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> AppResult<u64> {
        self.app.set_connected(self.source.is_connected());
        info!(source = %self.source.describe(), "ingest loop started");

        loop {
            let read = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                read = self.source.next_line() => read,
            };

            match read {
                Ok(Some(line)) => self.handle_line(&line),
                // Read timeout; loop again so shutdown stays observable.
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "reading source failed; serving last known state");
                    self.app.set_connected(false);
                    break;
                }
            }
        }

        if let Err(e) = self.source.close().await {
            warn!(error = %e, "error closing reading source");
        }
        info!(events = self.processed, "ingest loop stopped");
        Ok(self.processed)
    }

    fn handle_line(&mut self, line: &str) {
        let now_ms = Utc::now().timestamp_millis();
        match parse_line(line, now_ms) {
            Ok(Some(sample)) => {
                let event = self.app.ingest(sample);
                self.processed += 1;
                if self.processed % STATUS_LOG_INTERVAL == 0 {
                    info!(
                        events = self.processed,
                        status = %event.status,
                        gas_ppm = event.sample.gas_level,
                        distance_cm = event.sample.distance,
                        "telemetry status"
                    );
                }
            }
            Ok(None) => debug!(line, "skipped non-data line"),
            Err(e) => warn!(error = %e, "data conversion error"),
        }
    }
}
