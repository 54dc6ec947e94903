//! # Mars Sentinel Core Library
//!
//! This crate contains the core pipeline of the Mars Sentinel astronaut
//! safety monitor: it ingests environmental-sensor telemetry from a
//! serial-connected device (or a synthetic generator), classifies every
//! reading against configurable safety thresholds, retains a bounded
//! rolling history, and republishes each classified reading to any number
//! of live subscribers. Web dashboards and HTTP layers are external
//! collaborators that consume this library's API.
//!
//! ## Crate Structure
//!
//! - **`app`**: The `SentinelApp` hub owning the event store, broadcaster,
//!   and mission controller, and exposing the outward query surface
//!   (status, event windows, mode/threshold commands, CSV export,
//!   subscriptions).
//! - **`broadcast`**: Publish/subscribe fan-out with per-subscriber
//!   bounded buffering and latest-event replay on connect.
//! - **`config`**: Strongly-typed configuration loaded from TOML files
//!   and environment variables. See [`config::Config`].
//! - **`error`**: The central [`error::SentinelError`] type.
//! - **`export`**: CSV rendering of the retained event history.
//! - **`ingest`**: The ingest loop driving line parsing, classification,
//!   storage, and publication for each incoming reading.
//! - **`logging`**: Structured, async-aware tracing initialization.
//! - **`mission`**: Mission-mode presets and atomic threshold
//!   reconfiguration.
//! - **`source`**: The `ReadingSource` abstraction plus serial and
//!   synthetic implementations.
//! - **`store`**: The bounded, concurrency-safe rolling event store.
//! - **`telemetry`**: Wire-format parsing, threshold sets, and the
//!   classification engine.

pub mod app;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod mission;
pub mod source;
pub mod store;
pub mod telemetry;
