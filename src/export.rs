//! CSV rendering of the retained event history.
//!
//! A thin formatter over the store snapshot: fixed column order, alarm
//! reasons joined with `|`. Serialization of live events to JSON happens
//! via serde on the event types themselves; this module only covers the
//! bulk export.

use std::sync::Arc;

use crate::error::{AppResult, SentinelError};
use crate::telemetry::ClassifiedEvent;

/// Fixed export column order.
pub const CSV_HEADER: [&str; 9] = [
    "timestamp",
    "temperature",
    "humidity",
    "gas_level",
    "ir_detection",
    "distance",
    "status",
    "alarms",
    "mode",
];

/// Render events as CSV with the fixed column order, oldest first.
pub fn render_csv(events: &[Arc<ClassifiedEvent>]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| SentinelError::Export(e.to_string()))?;

    for event in events {
        let alarms = event
            .alarms
            .iter()
            .map(|reason| reason.as_str())
            .collect::<Vec<_>>()
            .join("|");
        writer
            .write_record(&[
                event.sample.timestamp.to_string(),
                format_float(event.sample.temperature),
                format_float(event.sample.humidity),
                event.sample.gas_level.to_string(),
                event.sample.ir_detection.to_string(),
                event.sample.distance.to_string(),
                event.status.to_string(),
                alarms,
                event.mode.to_string(),
            ])
            .map_err(|e| SentinelError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SentinelError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SentinelError::Export(e.to_string()))
}

/// Keep a trailing `.0` on whole-number readings so exported columns
/// always look like floats.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
