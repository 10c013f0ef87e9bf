//! Telemetry stream processor for cold-storage monitoring
//!
//! Turns raw gateway payloads (DHT22 temperature/humidity readings, door
//! contacts, link metadata) into a continuously updated, bounded in-memory
//! model: per-sensor history windows, tri-state door tracking, a rule-based
//! anomaly score, and timeout-based offline detection.
//!
//! Key constraints:
//! - Bounded memory: fixed-capacity windows and tables, no heap in the
//!   processing path
//! - Single logical thread: one ingest call is an atomic unit of work,
//!   liveness is polled, never timer-driven
//! - Nothing is fatal: the worst outcome of any input is a skipped update
//!   or an offline snapshot
//!
//! ```no_run
//! use coldwatch_core::{TelemetryIngestor, time::{SystemClock, TimeSource}};
//!
//! let clock = SystemClock;
//! let mut ingestor: TelemetryIngestor = TelemetryIngestor::new();
//!
//! // Raw document from the transport layer
//! let raw = r#"{"deviceId": "cs-gw-01", "dht22": [{"id": 0, "temperature": 18.5, "humidity": 71.0}]}"#;
//! match ingestor.ingest_json(raw, clock.now()) {
//!     Ok(snapshot) => { /* hand to the rendering layer */ }
//!     Err(_) => { /* logged and swallowed; next payload proceeds */ }
//! }
//!
//! // Called periodically by the host event loop
//! if let Some(offline) = ingestor.poll(clock.now()) {
//!     // render the offline state
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod doors;
pub mod errors;
pub mod ingest;
pub mod payload;
pub mod scoring;
pub mod series;
pub mod snapshot;
pub mod time;
pub mod watchdog;

#[cfg(feature = "std")]
pub mod wire;

// Public API
pub use config::{Config, ConfigPatch, ConfigStore};
pub use doors::{DoorPosition, DoorState, DoorStateTracker};
pub use errors::{IngestError, IngestResult};
pub use ingest::TelemetryIngestor;
pub use payload::{DoorEvent, Payload, PayloadSummary, SensorReading};
pub use scoring::{score, AnomalyResult, Severity};
pub use series::{SeriesBuffer, SeriesPoint, SeriesTable};
pub use snapshot::{SensorWindow, Snapshot};
pub use time::Timestamp;
pub use watchdog::{ConnectivityState, ConnectivityWatchdog};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
