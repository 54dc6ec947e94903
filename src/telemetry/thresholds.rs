//! Classification boundaries and mission-mode presets.
//!
//! A [`ThresholdSet`] is an immutable-per-use snapshot of the numeric
//! boundaries the classifier evaluates against. Mission modes are named
//! presets that override a subset of the danger thresholds; everything a
//! preset does not name persists from whatever was previously configured.
//!
//! Warn/danger ordering is deliberately not enforced: a set with
//! `warn > danger` is legal and simply yields unusual classifications.
//! This matches the permissiveness of the deployed system and is an
//! accepted risk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Named numeric boundaries used by the classifier.
///
/// Temperature, humidity, and gas trip above their bounds; distance trips
/// below (closer is worse); IR trips at or above `ir_danger`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Temperature warning bound, degrees C.
    pub temp_warn: f64,
    /// Temperature danger bound, degrees C.
    pub temp_danger: f64,
    /// Humidity warning bound, percent.
    pub humidity_warn: f64,
    /// Humidity danger bound, percent.
    pub humidity_danger: f64,
    /// Gas warning bound, ppm.
    pub gas_warn: f64,
    /// Gas danger bound, ppm.
    pub gas_danger: f64,
    /// Distance warning bound, cm.
    pub distance_warn: f64,
    /// Distance danger bound, cm.
    pub distance_danger: f64,
    /// IR edge-detection danger bound.
    pub ir_danger: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
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
}

impl ThresholdSet {
    /// Set one threshold by its wire name. Unknown names are ignored and
    /// reported as `false`, not errors, so partial updates from external
    /// callers stay permissive.
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        match key {
            "temp_warn" => self.temp_warn = value,
            "temp_danger" => self.temp_danger = value,
            "humidity_warn" => self.humidity_warn = value,
            "humidity_danger" => self.humidity_danger = value,
            "gas_warn" => self.gas_warn = value,
            "gas_danger" => self.gas_danger = value,
            "distance_warn" => self.distance_warn = value,
            "distance_danger" => self.distance_danger = value,
            "ir_danger" => self.ir_danger = value,
            _ => return false,
        }
        true
    }

    /// Merge a partial override map onto this set. Unknown keys are
    /// ignored.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, f64>) {
        for (key, value) in overrides {
            self.set(key, *value);
        }
    }

    /// Merge a mission preset onto this set. Only the keys the preset
    /// defines are replaced.
    pub fn apply_preset(&mut self, preset: &ModePreset) {
        self.temp_danger = preset.temp_danger;
        self.gas_danger = preset.gas_danger;
        self.distance_danger = preset.distance_danger;
    }
}

/// The danger overrides a mission mode applies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModePreset {
    /// Temperature danger bound, degrees C.
    pub temp_danger: f64,
    /// Gas danger bound, ppm.
    pub gas_danger: f64,
    /// Distance danger bound, cm.
    pub distance_danger: f64,
}

/// A named mission profile selecting a threshold preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionMode {
    /// Extravehicular activity (baseline).
    Eva,
    /// Mars surface operations.
    Mars,
    /// Emergency response profile.
    Emergency,
    /// Training exercises with relaxed bounds.
    Training,
}

impl MissionMode {
    /// Look up a mode by its wire name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "eva" => Some(Self::Eva),
            "mars" => Some(Self::Mars),
            "emergency" => Some(Self::Emergency),
            "training" => Some(Self::Training),
            _ => None,
        }
    }

    /// Wire name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eva => "eva",
            Self::Mars => "mars",
            Self::Emergency => "emergency",
            Self::Training => "training",
        }
    }

    /// The danger overrides this mode applies when selected.
    pub fn preset(&self) -> ModePreset {
        match self {
            Self::Eva => ModePreset {
                temp_danger: 45.0,
                gas_danger: 600.0,
                distance_danger: 20.0,
            },
            Self::Mars => ModePreset {
                temp_danger: 40.0,
                gas_danger: 500.0,
                distance_danger: 25.0,
            },
            Self::Emergency => ModePreset {
                temp_danger: 50.0,
                gas_danger: 400.0,
                distance_danger: 15.0,
            },
            Self::Training => ModePreset {
                temp_danger: 60.0,
                gas_danger: 800.0,
                distance_danger: 10.0,
            },
        }
    }
}

impl fmt::Display for MissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_eva_baseline() {
        let defaults = ThresholdSet::default();
        let eva = MissionMode::Eva.preset();
        assert_eq!(defaults.temp_danger, eva.temp_danger);
        assert_eq!(defaults.gas_danger, eva.gas_danger);
        assert_eq!(defaults.distance_danger, eva.distance_danger);
    }

    #[test]
    fn preset_only_replaces_danger_keys_it_defines() {
        let mut set = ThresholdSet::default();
        set.temp_warn = 30.0;
        set.humidity_danger = 90.0;
        set.apply_preset(&MissionMode::Mars.preset());

        assert_eq!(set.temp_danger, 40.0);
        assert_eq!(set.gas_danger, 500.0);
        assert_eq!(set.distance_danger, 25.0);
        // Untouched keys persist.
        assert_eq!(set.temp_warn, 30.0);
        assert_eq!(set.humidity_danger, 90.0);
        assert_eq!(set.ir_danger, 1.0);
    }

    #[test]
    fn unknown_override_keys_are_ignored() {
        let mut set = ThresholdSet::default();
        let mut overrides = HashMap::new();
        overrides.insert("gas_danger".to_string(), 550.0);
        overrides.insert("warp_core".to_string(), 9000.0);
        set.apply_overrides(&overrides);

        assert_eq!(set.gas_danger, 550.0);
        assert_eq!(set, {
            let mut expected = ThresholdSet::default();
            expected.gas_danger = 550.0;
            expected
        });
    }

    #[test]
    fn misconfigured_warn_above_danger_is_accepted() {
        let mut set = ThresholdSet::default();
        assert!(set.set("temp_warn", 80.0));
        assert_eq!(set.temp_warn, 80.0);
    }

    #[test]
    fn mode_names_round_trip() {
        for name in ["eva", "mars", "emergency", "training"] {
            let mode = MissionMode::parse(name).unwrap();
            assert_eq!(mode.as_str(), name);
            assert_eq!(mode.to_string(), name);
        }
        assert!(MissionMode::parse("orbital").is_none());
        assert!(MissionMode::parse("EVA").is_none());
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&MissionMode::Mars).unwrap();
        assert_eq!(json, "\"mars\"");
    }
}
