//! Reading-source abstraction and implementations.
//!
//! The ingest loop consumes raw lines through the [`ReadingSource`]
//! trait. Three implementations exist:
//!
//! - [`SerialSource`] (feature `serial`): a real device on a serial port.
//! - [`SyntheticSource`]: a random-data generator matching the device
//!   wire format, for operating without hardware.
//! - [`ScriptedSource`]: replays a fixed list of lines, for tests and
//!   demos.
//!
//! Reconnection and retry policy deliberately live with the caller, not
//! here; a source that drops simply reports the failure and the system
//! keeps serving whatever history it already holds.

use async_trait::async_trait;
use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;

use crate::error::{AppResult, SentinelError};

/// A supplier of raw telemetry lines.
///
/// `next_line` returning `Ok(None)` means "nothing yet" (a read timeout);
/// the caller loops, which is how shutdown stays observable. An `Err` is
/// terminal for the source.
#[async_trait]
pub trait ReadingSource: Send {
    /// Human-readable description for logs.
    fn describe(&self) -> String;

    /// Whether the underlying transport is currently live.
    fn is_connected(&self) -> bool;

    /// Wait for the next raw line, bounded by the source's read timeout.
    async fn next_line(&mut self) -> AppResult<Option<String>>;

    /// Release the underlying transport.
    async fn close(&mut self) -> AppResult<()>;
}

/// Random telemetry generator in the device wire format.
///
/// Produces realistic nominal readings (temperature 20.5-30.5 C, humidity
/// 35-70 %, gas 200-400 ppm, distance 30-100 cm, IR mostly clear) with a
/// 5 % chance per reading of injecting a danger burst on temperature,
/// gas, or distance. Reports `connected = false` since no hardware is
/// attached.
pub struct SyntheticSource {
    interval: Duration,
    rng: StdRng,
}

impl SyntheticSource {
    /// Create a generator emitting one line per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests.
    pub fn with_seed(interval: Duration, seed: u64) -> Self {
        Self {
            interval,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn generate_line(&mut self) -> String {
        let mut temperature = 22.5 + self.rng.gen_range(-2.0..8.0);
        let humidity = 45.0 + self.rng.gen_range(-10.0..25.0);
        let mut gas: i64 = self.rng.gen_range(200..=400);
        let ir = i64::from(self.rng.gen_range(0..4) == 3);
        let mut distance: i64 = self.rng.gen_range(30..=100);

        // Occasionally simulate a danger condition.
        if self.rng.gen::<f64>() < 0.05 {
            match self.rng.gen_range(0..3) {
                0 => temperature = 47.0 + self.rng.gen_range(0.0..8.0),
                1 => gas = self.rng.gen_range(650..=900),
                _ => distance = self.rng.gen_range(5..=18),
            }
        }

        let timestamp = Utc::now().timestamp_millis();
        format!("{timestamp},{temperature:.2},{humidity:.2},{gas},{ir},{distance}")
    }
}

#[async_trait]
impl ReadingSource for SyntheticSource {
    fn describe(&self) -> String {
        format!("synthetic generator ({} ms interval)", self.interval.as_millis())
    }

    fn is_connected(&self) -> bool {
        false
    }

    async fn next_line(&mut self) -> AppResult<Option<String>> {
        tokio::time::sleep(self.interval).await;
        Ok(Some(self.generate_line()))
    }

    async fn close(&mut self) -> AppResult<()> {
        Ok(())
    }
}

/// Replays a fixed sequence of lines, then fails like a dropped device.
///
/// Used by integration tests and demos to drive the full pipeline with
/// known input.
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    /// Build a source that yields `lines` in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ReadingSource for ScriptedSource {
    fn describe(&self) -> String {
        format!("scripted source ({} lines remaining)", self.lines.len())
    }

    fn is_connected(&self) -> bool {
        !self.lines.is_empty()
    }

    async fn next_line(&mut self) -> AppResult<Option<String>> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None => Err(SentinelError::Source("end of scripted input".to_string())),
        }
    }

    async fn close(&mut self) -> AppResult<()> {
        Ok(())
    }
}

/// A real device on a serial port.
#[cfg(feature = "serial")]
pub use self::serial::SerialSource;

#[cfg(feature = "serial")]
mod serial {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader, Lines};
    use tokio_serial::{SerialPortBuilderExt, SerialStream};

    /// Line-oriented reader over a serial-attached sensor device.
    pub struct SerialSource {
        lines: Lines<BufReader<SerialStream>>,
        port_name: String,
        read_timeout: Duration,
        connected: bool,
    }

    impl SerialSource {
        /// Open `port` at `baud`. Reads are bounded by `read_timeout` so
        /// the ingest loop can observe shutdown between lines.
        pub fn open(port: &str, baud: u32, read_timeout: Duration) -> AppResult<Self> {
            let stream = tokio_serial::new(port, baud)
                .open_native_async()
                .map_err(|e| {
                    SentinelError::Source(format!("failed to open {port}: {e}"))
                })?;
            Ok(Self {
                lines: BufReader::new(stream).lines(),
                port_name: port.to_string(),
                read_timeout,
                connected: true,
            })
        }
    }

    #[async_trait]
    impl ReadingSource for SerialSource {
        fn describe(&self) -> String {
            format!("serial port {}", self.port_name)
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn next_line(&mut self) -> AppResult<Option<String>> {
            match tokio::time::timeout(self.read_timeout, self.lines.next_line()).await {
                Err(_elapsed) => Ok(None),
                Ok(Ok(Some(line))) => Ok(Some(line)),
                Ok(Ok(None)) => {
                    self.connected = false;
                    Err(SentinelError::Source(format!(
                        "unexpected EOF from {}",
                        self.port_name
                    )))
                }
                Ok(Err(e)) => {
                    self.connected = false;
                    Err(SentinelError::Io(e))
                }
            }
        }

        async fn close(&mut self) -> AppResult<()> {
            self.connected = false;
            Ok(())
        }
    }
}
