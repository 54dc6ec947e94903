//! Mission-mode ownership and atomic threshold reconfiguration.
//!
//! The controller owns the active mission mode and the active
//! [`ThresholdSet`]. Every classification reads a whole-set snapshot, and
//! both update operations replace the set under a single short write
//! lock, so a classification observes either the pre-update or the
//! post-update set in its entirety, never a mix.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::SentinelError;
use crate::telemetry::{MissionMode, ThresholdSet};

struct MissionState {
    mode: MissionMode,
    thresholds: ThresholdSet,
}

/// Owner of the active mission mode and threshold set.
pub struct MissionController {
    inner: RwLock<MissionState>,
}

impl MissionController {
    /// Create a controller with an explicit starting mode and set.
    pub fn new(mode: MissionMode, thresholds: ThresholdSet) -> Self {
        Self {
            inner: RwLock::new(MissionState { mode, thresholds }),
        }
    }

    /// Switch to a named mission mode.
    ///
    /// The preset's danger overrides are merged onto the currently active
    /// set; keys the preset does not define persist unchanged. An unknown
    /// name returns [`SentinelError::InvalidMode`] and leaves all state
    /// untouched. Returns the resulting active set.
    pub fn set_mode(&self, name: &str) -> Result<ThresholdSet, SentinelError> {
        let mode = MissionMode::parse(name)
            .ok_or_else(|| SentinelError::InvalidMode(name.to_string()))?;
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.mode = mode;
        state.thresholds.apply_preset(&mode.preset());
        Ok(state.thresholds)
    }

    /// Apply a partial threshold override map.
    ///
    /// Known keys replace the corresponding field; unknown keys are
    /// ignored. The active mode name is not changed. Values are accepted
    /// as-is: ordering between warn and danger bounds is deliberately not
    /// validated. Returns the resulting active set.
    pub fn set_thresholds(&self, overrides: &HashMap<String, f64>) -> ThresholdSet {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.thresholds.apply_overrides(overrides);
        state.thresholds
    }

    /// The active mode and a whole-set threshold snapshot.
    pub fn current(&self) -> (MissionMode, ThresholdSet) {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        (state.mode, state.thresholds)
    }

    /// The active mode.
    pub fn mode(&self) -> MissionMode {
        self.current().0
    }

    /// A snapshot of the active threshold set.
    pub fn thresholds(&self) -> ThresholdSet {
        self.current().1
    }
}

impl Default for MissionController {
    fn default() -> Self {
        Self::new(MissionMode::Eva, ThresholdSet::default())
    }
}
