//! Sensor telemetry data model.
//!
//! Everything between a raw serial line and a classified event lives here:
//! the wire-format parser ([`sample`]), the threshold boundaries and
//! mission-mode presets ([`thresholds`]), and the pure classification
//! engine ([`classify`]).

pub mod classify;
pub mod sample;
pub mod thresholds;

pub use classify::{classify, AlarmReason, ClassifiedEvent, Status};
pub use sample::{parse_line, ParseError, Sample};
pub use thresholds::{MissionMode, ThresholdSet};
