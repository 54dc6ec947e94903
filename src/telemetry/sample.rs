//! Wire-format parsing for raw sensor lines.
//!
//! The device emits one comma-separated line per reading. Two arities are
//! accepted, selected by field count:
//!
//! - Full format (6 fields): `timestamp_ms,temperature,humidity,gas_ppm,ir_flag,distance_cm`
//! - Reduced format (5 fields): `timestamp_ms,temperature,gas_ppm,ir_flag,distance_cm`
//!
//! Lines containing diagnostic chatter (column headers, initialization
//! notices, debug markers) are discarded as non-data, not errors. Lines
//! with any other field count are treated as garbled noise and silently
//! dropped, so a flaky device cannot terminate the stream. A malformed
//! numeric field on an otherwise well-formed line is a [`ParseError`]
//! carrying the offending line; the caller logs it and continues.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Substituted when the temperature channel reads as disconnected
/// (at or below -50 degrees).
pub const DEFAULT_TEMPERATURE_C: f64 = 22.0;

/// Substituted when humidity is negative or absent from the wire format.
pub const DEFAULT_HUMIDITY_PCT: f64 = 50.0;

/// Case-insensitive substrings marking informational device chatter.
const CHATTER_MARKERS: [&str; 4] = ["temp", "format:", "initialized", "debug:"];

/// One validated sensor reading, prior to classification.
///
/// Every field is present: it was either parsed from the wire or replaced
/// by a defined fallback constant. The timestamp is assigned from the
/// ingestion clock, never the device clock, so ordering stays consistent
/// across device restarts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since epoch, assigned at ingestion time.
    pub timestamp: i64,
    /// Degrees Celsius, rounded to two decimals.
    pub temperature: f64,
    /// Relative humidity percent, rounded to two decimals.
    pub humidity: f64,
    /// Gas concentration in parts per million.
    pub gas_level: i64,
    /// IR edge-detection flag (0/1, tolerated as any integer).
    pub ir_detection: i64,
    /// Obstacle distance in centimeters.
    pub distance: i64,
}

/// A malformed numeric field on a telemetry line.
///
/// Carries the full raw line for operator logs plus the underlying
/// conversion failure.
#[derive(Debug, Error)]
#[error("data conversion error on field '{field}': {kind} | line: {line}")]
pub struct ParseError {
    /// The raw line as received from the device.
    pub line: String,
    /// Which positional field failed to convert.
    pub field: &'static str,
    /// The underlying numeric conversion failure.
    #[source]
    pub kind: NumericError,
}

/// Underlying numeric conversion failure inside a [`ParseError`].
#[derive(Debug, Error)]
pub enum NumericError {
    /// Float field could not be parsed.
    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),
    /// Integer field could not be parsed.
    #[error(transparent)]
    Int(#[from] std::num::ParseIntError),
}

/// Parse one raw line into a [`Sample`].
///
/// Returns `Ok(None)` for chatter and garbled lines (no sample, no
/// error), `Ok(Some(sample))` for valid data, and `Err` only when a
/// well-formed line carries an unconvertible numeric field. `now_ms`
/// becomes the sample timestamp regardless of the wire timestamp field.
pub fn parse_line(raw: &str, now_ms: i64) -> Result<Option<Sample>, ParseError> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let lowered = line.to_ascii_lowercase();
    if CHATTER_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split(',').collect();
    let (temp_str, humidity_str, gas_str, ir_str, dist_str) = match parts.as_slice() {
        [_ts, temp, humidity, gas, ir, dist] => (*temp, Some(*humidity), *gas, *ir, *dist),
        [_ts, temp, gas, ir, dist] => (*temp, None, *gas, *ir, *dist),
        _ => return Ok(None),
    };

    let parsed_temp = parse_f64(line, "temperature", temp_str)?;
    // Readings at or below -50 mean the channel is disconnected; degrade
    // to room temperature instead of rejecting the line.
    let temperature = if parsed_temp > -50.0 {
        parsed_temp
    } else {
        DEFAULT_TEMPERATURE_C
    };

    let humidity = match humidity_str {
        Some(raw_humidity) => {
            let parsed = parse_f64(line, "humidity", raw_humidity)?;
            if parsed >= 0.0 {
                parsed
            } else {
                DEFAULT_HUMIDITY_PCT
            }
        }
        None => DEFAULT_HUMIDITY_PCT,
    };

    Ok(Some(Sample {
        timestamp: now_ms,
        temperature: round2(temperature),
        humidity: round2(humidity),
        gas_level: parse_i64(line, "gas_level", gas_str)?,
        ir_detection: parse_i64(line, "ir_detection", ir_str)?,
        distance: parse_i64(line, "distance", dist_str)?,
    }))
}

fn parse_f64(line: &str, field: &'static str, value: &str) -> Result<f64, ParseError> {
    value.trim().parse::<f64>().map_err(|e| ParseError {
        line: line.to_string(),
        field,
        kind: e.into(),
    })
}

fn parse_i64(line: &str, field: &'static str, value: &str) -> Result<i64, ParseError> {
    value.trim().parse::<i64>().map_err(|e| ParseError {
        line: line.to_string(),
        field,
        kind: e.into(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_755_000_000_000;

    #[test]
    fn parses_full_format_line() {
        let sample = parse_line("1700000000000,23.75,48.2,310,0,85", NOW)
            .unwrap()
            .unwrap();
        assert_eq!(sample.timestamp, NOW);
        assert_eq!(sample.temperature, 23.75);
        assert_eq!(sample.humidity, 48.2);
        assert_eq!(sample.gas_level, 310);
        assert_eq!(sample.ir_detection, 0);
        assert_eq!(sample.distance, 85);
    }

    #[test]
    fn parses_reduced_format_with_default_humidity() {
        let sample = parse_line("1700000000000,25.5,400,1,60", NOW).unwrap().unwrap();
        assert_eq!(sample.humidity, DEFAULT_HUMIDITY_PCT);
        assert_eq!(sample.gas_level, 400);
        assert_eq!(sample.ir_detection, 1);
    }

    #[test]
    fn out_of_range_temperature_falls_back_to_room_temp() {
        // Reduced-format line with a disconnected temperature channel.
        let sample = parse_line("1700000000000,-60,300,0,80", NOW).unwrap().unwrap();
        assert_eq!(sample.temperature, DEFAULT_TEMPERATURE_C);
        assert_eq!(sample.humidity, DEFAULT_HUMIDITY_PCT);
        assert_eq!(sample.gas_level, 300);
        assert_eq!(sample.ir_detection, 0);
        assert_eq!(sample.distance, 80);
    }

    #[test]
    fn boundary_temperature_exactly_minus_fifty_falls_back() {
        let sample = parse_line("0,-50,45,300,0,80", NOW).unwrap().unwrap();
        assert_eq!(sample.temperature, DEFAULT_TEMPERATURE_C);
    }

    #[test]
    fn negative_humidity_falls_back() {
        let sample = parse_line("0,24.0,-3.5,300,0,80", NOW).unwrap().unwrap();
        assert_eq!(sample.humidity, DEFAULT_HUMIDITY_PCT);
        assert_eq!(sample.temperature, 24.0);
    }

    #[test]
    fn chatter_lines_are_skipped_without_error() {
        for line in [
            "Temp,Humidity,Gas,IR,Distance",
            "FORMAT: csv",
            "sensors initialized ok",
            "DEBUG: loop 12",
        ] {
            assert!(parse_line(line, NOW).unwrap().is_none(), "line: {line}");
        }
    }

    #[test]
    fn wrong_arity_is_noise_not_error() {
        assert!(parse_line("1,2,3", NOW).unwrap().is_none());
        assert!(parse_line("1,2,3,4,5,6,7", NOW).unwrap().is_none());
        assert!(parse_line("", NOW).unwrap().is_none());
    }

    #[test]
    fn malformed_gas_field_is_a_parse_error() {
        let err = parse_line("1700000000000,24.0,45.0,xyz,0,80", NOW).unwrap_err();
        assert_eq!(err.field, "gas_level");
        assert!(err.line.contains("xyz"));
        assert!(matches!(err.kind, NumericError::Int(_)));
    }

    #[test]
    fn malformed_distance_field_is_a_parse_error() {
        let err = parse_line("1700000000000,24.0,45.0,300,0,far", NOW).unwrap_err();
        assert_eq!(err.field, "distance");
    }

    #[test]
    fn float_fields_are_rounded_to_two_decimals() {
        let sample = parse_line("0,23.4567,48.9912,300,0,80", NOW).unwrap().unwrap();
        assert_eq!(sample.temperature, 23.46);
        assert_eq!(sample.humidity, 48.99);
    }

    #[test]
    fn fractional_gas_is_rejected() {
        // Gas, IR, and distance have no fallback; conversion failure is
        // fatal to the line.
        assert!(parse_line("0,24.0,45.0,300.5,0,80", NOW).is_err());
    }
}
