//! Configuration loading using Figment.
//!
//! Strongly-typed configuration merged from two sources:
//! 1. A TOML file (default `config/sentinel.toml`; missing file falls
//!    back to defaults)
//! 2. Environment variables prefixed with `MARS_SENTINEL_` (double
//!    underscore separates nesting, e.g.
//!    `MARS_SENTINEL_APPLICATION__LOG_LEVEL=debug`)
//!
//! Every field has a serde default so a partial file is always valid;
//! `validate()` catches semantic mistakes after loading.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SentinelError;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application-level settings.
    pub application: ApplicationConfig,
    /// Reading-source settings.
    pub source: SourceConfig,
    /// Event store settings.
    pub store: StoreConfig,
    /// Subscriber fan-out settings.
    pub broadcast: BroadcastConfig,
}

/// Application-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Display name used in logs.
    pub name: String,
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// Reading-source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Serial port path (e.g. `/dev/ttyUSB0`, `COM3`).
    pub port: String,
    /// Serial baud rate.
    pub baud: u32,
    /// Read timeout in milliseconds; bounds how long the ingest loop
    /// blocks between shutdown checks.
    pub read_timeout_ms: u64,
    /// Use the synthetic generator instead of hardware.
    pub synthetic: bool,
    /// Interval between synthetic readings in milliseconds.
    pub synthetic_interval_ms: u64,
}

/// Event store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Rolling-history capacity in events.
    pub capacity: usize,
}

/// Subscriber fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Per-subscriber buffer depth in events.
    pub channel_capacity: usize,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "Mars Sentinel".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud: 9600,
            read_timeout_ms: 1000,
            synthetic: false,
            synthetic_interval_ms: 500,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            source: SourceConfig::default(),
            store: StoreConfig::default(),
            broadcast: BroadcastConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default file location plus environment overrides.
    pub fn load() -> Result<Self, SentinelError> {
        Self::load_from("config/sentinel.toml")
    }

    /// Load from a specific file path plus environment overrides.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SentinelError> {
        let config: Config = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("MARS_SENTINEL_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.source.baud == 0 {
            return Err("Serial baud rate must be greater than 0".to_string());
        }

        if self.source.read_timeout_ms == 0 {
            return Err("Read timeout must be greater than 0 ms".to_string());
        }

        if self.store.capacity == 0 {
            return Err("Event store capacity must be greater than 0".to_string());
        }

        if self.broadcast.channel_capacity == 0 {
            return Err("Broadcast channel capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}
