//! The threshold-classification engine.
//!
//! [`classify`] is a pure function from a sample and a threshold snapshot
//! to a safety status plus an ordered list of alarm reasons. Evaluation
//! order is fixed (temperature, humidity, gas, distance, then IR) because
//! the alarm-list order is observable downstream in exports and live
//! feeds. `DANGER` is sticky: once any metric raises it, no later check
//! downgrades it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::sample::Sample;
use super::thresholds::{MissionMode, ThresholdSet};

/// Overall safety status of one reading, ordered by severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// All metrics within bounds.
    Ok,
    /// At least one metric in its warning range.
    Warn,
    /// At least one metric in its danger range.
    Danger,
}

impl Status {
    /// Wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Danger => "DANGER",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed enumerated tag naming which safety condition fired.
///
/// Each metric contributes at most one reason per classification, so
/// duplicates are impossible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmReason {
    /// Temperature above the danger bound.
    #[serde(rename = "Temperature Critical")]
    TemperatureCritical,
    /// Temperature above the warning bound.
    #[serde(rename = "Temperature Warning")]
    TemperatureWarning,
    /// Humidity above the danger bound.
    #[serde(rename = "Humidity Critical")]
    HumidityCritical,
    /// Humidity above the warning bound.
    #[serde(rename = "Humidity Warning")]
    HumidityWarning,
    /// Gas concentration above the danger bound.
    #[serde(rename = "Gas Contamination Critical")]
    GasContaminationCritical,
    /// Gas concentration above the warning bound.
    #[serde(rename = "Gas Contamination Warning")]
    GasContaminationWarning,
    /// Obstacle closer than the danger bound.
    #[serde(rename = "Obstacle Too Close")]
    ObstacleTooClose,
    /// Obstacle closer than the warning bound.
    #[serde(rename = "Obstacle Warning")]
    ObstacleWarning,
    /// IR sensor detected an edge or drop-off.
    #[serde(rename = "Edge/Fall Risk Detected")]
    EdgeFallRisk,
}

impl AlarmReason {
    /// Human-readable label, as shown on dashboards and in CSV exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TemperatureCritical => "Temperature Critical",
            Self::TemperatureWarning => "Temperature Warning",
            Self::HumidityCritical => "Humidity Critical",
            Self::HumidityWarning => "Humidity Warning",
            Self::GasContaminationCritical => "Gas Contamination Critical",
            Self::GasContaminationWarning => "Gas Contamination Warning",
            Self::ObstacleTooClose => "Obstacle Too Close",
            Self::ObstacleWarning => "Obstacle Warning",
            Self::EdgeFallRisk => "Edge/Fall Risk Detected",
        }
    }
}

impl fmt::Display for AlarmReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sample plus everything derived from it at classification time.
///
/// Immutable once created; serializes flat with the dashboard wire names.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    /// The underlying validated reading.
    #[serde(flatten)]
    pub sample: Sample,
    /// Derived safety status.
    pub status: Status,
    /// Ordered alarm reasons; empty implies `OK`.
    pub alarms: Vec<AlarmReason>,
    /// Mission mode active at classification time.
    pub mode: MissionMode,
    /// Source liveness at ingestion time.
    pub connected: bool,
}

/// Classify one sample against a threshold snapshot.
///
/// Deterministic and side-effect free: classifying the same pair twice
/// yields identical results. Danger bounds are checked before warn bounds
/// per metric, so a reading never double-counts. IR is evaluated last and
/// is unconditionally `DANGER` when tripped; it never merely warns.
pub fn classify(sample: &Sample, thresholds: &ThresholdSet) -> (Status, Vec<AlarmReason>) {
    let mut status = Status::Ok;
    let mut alarms = Vec::new();

    if sample.temperature > thresholds.temp_danger {
        status = Status::Danger;
        alarms.push(AlarmReason::TemperatureCritical);
    } else if sample.temperature > thresholds.temp_warn {
        if status != Status::Danger {
            status = Status::Warn;
        }
        alarms.push(AlarmReason::TemperatureWarning);
    }

    if sample.humidity > thresholds.humidity_danger {
        status = Status::Danger;
        alarms.push(AlarmReason::HumidityCritical);
    } else if sample.humidity > thresholds.humidity_warn {
        if status != Status::Danger {
            status = Status::Warn;
        }
        alarms.push(AlarmReason::HumidityWarning);
    }

    let gas = sample.gas_level as f64;
    if gas > thresholds.gas_danger {
        status = Status::Danger;
        alarms.push(AlarmReason::GasContaminationCritical);
    } else if gas > thresholds.gas_warn {
        if status != Status::Danger {
            status = Status::Warn;
        }
        alarms.push(AlarmReason::GasContaminationWarning);
    }

    let distance = sample.distance as f64;
    if distance < thresholds.distance_danger {
        status = Status::Danger;
        alarms.push(AlarmReason::ObstacleTooClose);
    } else if distance < thresholds.distance_warn {
        if status != Status::Danger {
            status = Status::Warn;
        }
        alarms.push(AlarmReason::ObstacleWarning);
    }

    // IR edge detection is evaluated last and never merely warns.
    if sample.ir_detection as f64 >= thresholds.ir_danger {
        status = Status::Danger;
        alarms.push(AlarmReason::EdgeFallRisk);
    }

    (status, alarms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temperature: f64, humidity: f64, gas: i64, ir: i64, distance: i64) -> Sample {
        Sample {
            timestamp: 0,
            temperature,
            humidity,
            gas_level: gas,
            ir_detection: ir,
            distance,
        }
    }

    fn scenario_thresholds() -> ThresholdSet {
        ThresholdSet {
            temp_warn: 35.0,
            temp_danger: 45.0,
            humidity_warn: 70.0,
            humidity_danger: 85.0,
            gas_warn: 300.0,
            gas_danger: 600.0,
            distance_warn: 50.0,
            distance_danger: 20.0,
            ir_danger: 1.0,
        }
    }

    #[test]
    fn nominal_reading_is_ok_with_no_alarms() {
        let (status, alarms) = classify(&sample(22.0, 45.0, 200, 0, 100), &scenario_thresholds());
        assert_eq!(status, Status::Ok);
        assert!(alarms.is_empty());
    }

    #[test]
    fn multi_metric_danger_preserves_alarm_order() {
        let (status, alarms) = classify(&sample(47.8, 45.0, 650, 1, 15), &scenario_thresholds());
        assert_eq!(status, Status::Danger);
        assert_eq!(
            alarms,
            vec![
                AlarmReason::TemperatureCritical,
                AlarmReason::GasContaminationCritical,
                AlarmReason::ObstacleTooClose,
                AlarmReason::EdgeFallRisk,
            ]
        );
    }

    #[test]
    fn single_warning_reading() {
        let (status, alarms) = classify(&sample(36.0, 45.0, 100, 0, 100), &scenario_thresholds());
        assert_eq!(status, Status::Warn);
        assert_eq!(alarms, vec![AlarmReason::TemperatureWarning]);
    }

    #[test]
    fn danger_is_sticky_across_later_warn_checks() {
        // Temperature trips danger; gas only warns afterwards. Status must
        // stay DANGER while both alarms are recorded in order.
        let (status, alarms) = classify(&sample(50.0, 45.0, 400, 0, 100), &scenario_thresholds());
        assert_eq!(status, Status::Danger);
        assert_eq!(
            alarms,
            vec![
                AlarmReason::TemperatureCritical,
                AlarmReason::GasContaminationWarning,
            ]
        );
    }

    #[test]
    fn ir_danger_includes_earlier_warn_alarms() {
        let (status, alarms) = classify(&sample(36.0, 45.0, 100, 1, 100), &scenario_thresholds());
        assert_eq!(status, Status::Danger);
        assert_eq!(
            alarms,
            vec![AlarmReason::TemperatureWarning, AlarmReason::EdgeFallRisk]
        );
    }

    #[test]
    fn comparisons_are_strict_at_the_bounds() {
        // Exactly at a bound does not trip that bound.
        let (status, alarms) = classify(&sample(45.0, 45.0, 300, 0, 50), &scenario_thresholds());
        assert_eq!(status, Status::Warn);
        assert_eq!(alarms, vec![AlarmReason::TemperatureWarning]);

        // IR uses greater-or-equal.
        let (status, _) = classify(&sample(22.0, 45.0, 100, 1, 100), &scenario_thresholds());
        assert_eq!(status, Status::Danger);
    }

    #[test]
    fn distance_trips_below_its_bounds() {
        let (status, alarms) = classify(&sample(22.0, 45.0, 100, 0, 30), &scenario_thresholds());
        assert_eq!(status, Status::Warn);
        assert_eq!(alarms, vec![AlarmReason::ObstacleWarning]);

        let (status, alarms) = classify(&sample(22.0, 45.0, 100, 0, 10), &scenario_thresholds());
        assert_eq!(status, Status::Danger);
        assert_eq!(alarms, vec![AlarmReason::ObstacleTooClose]);
    }

    #[test]
    fn humidity_participates_in_evaluation_order() {
        let (status, alarms) = classify(&sample(36.0, 90.0, 400, 0, 30), &scenario_thresholds());
        assert_eq!(status, Status::Danger);
        assert_eq!(
            alarms,
            vec![
                AlarmReason::TemperatureWarning,
                AlarmReason::HumidityCritical,
                AlarmReason::GasContaminationWarning,
                AlarmReason::ObstacleWarning,
            ]
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let s = sample(47.8, 72.0, 650, 1, 15);
        let t = scenario_thresholds();
        let first = classify(&s, &t);
        let second = classify(&s, &t);
        assert_eq!(first, second);
    }

    #[test]
    fn event_serializes_with_wire_field_names() {
        let (status, alarms) = classify(&sample(36.0, 45.0, 100, 0, 100), &scenario_thresholds());
        let event = ClassifiedEvent {
            sample: sample(36.0, 45.0, 100, 0, 100),
            status,
            alarms,
            mode: MissionMode::Eva,
            connected: true,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["status"], "WARN");
        assert_eq!(value["alarms"][0], "Temperature Warning");
        assert_eq!(value["mode"], "eva");
        assert_eq!(value["gas_level"], 100);
        assert_eq!(value["ir_detection"], 0);
        assert_eq!(value["connected"], true);
    }
}
