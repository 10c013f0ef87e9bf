//! Error types for telemetry ingestion
//!
//! The taxonomy is deliberately small and every variant is recoverable:
//!
//! - `MalformedPayload` aborts one ingest call, prior state untouched,
//!   no snapshot emitted. Logged and swallowed by the caller's loop.
//! - `UnknownSensor` / `UnknownDoor` skip a single entry while the rest
//!   of the payload is still processed.
//!
//! Transport failures are not represented here at all: the core only
//! reacts to the *absence* of payloads, via the connectivity watchdog.
//! No error from this crate is ever fatal to the process.
//!
//! Variants are kept small and `Copy` (only `&'static str` and integer
//! ids inline), matching how errors travel through the hot path.

use thiserror_no_std::Error;

/// Result type for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Ingestion errors - all recoverable
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestError {
    /// Payload was not a JSON object (or a non-empty array of objects)
    #[error("malformed payload: {reason}")]
    MalformedPayload {
        /// What the decoder rejected, as a static description
        reason: &'static str,
    },

    /// Sensor id outside the tracked set; the reading was skipped
    #[error("sensor {id} is not tracked, reading skipped")]
    UnknownSensor {
        /// Offending sensor id from the payload
        id: u32,
    },

    /// Door id outside the tracked set; the event was skipped
    #[error("door {id} is not tracked, event skipped")]
    UnknownDoor {
        /// Offending door id from the payload
        id: u32,
    },
}

impl IngestError {
    /// True for errors that skip one entry rather than the whole payload
    pub const fn is_entry_level(&self) -> bool {
        matches!(
            self,
            IngestError::UnknownSensor { .. } | IngestError::UnknownDoor { .. }
        )
    }
}
