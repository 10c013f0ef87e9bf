//! Typed payload model
//!
//! ## Overview
//!
//! Everything downstream of the wire decoder works on the types in this
//! module, never on raw JSON. The decoder either produces a fully-formed
//! [`Payload`] or fails with `MalformedPayload`; after that point there is
//! no optional-field probing anywhere in the core.
//!
//! ## Memory model
//!
//! Payloads are transient (consumed by one ingest call) but still bounded:
//! readings and door events use `heapless::Vec` with the batch caps from
//! [`crate::constants`], and the identity strings use small inline buffers.
//! Nothing in a payload touches the heap.

use core::fmt::{self, Write};

use crate::constants::{MAX_BATCH_READINGS, MAX_DOOR_EVENTS, MS_PER_SECOND};
use crate::doors::DoorId;
use crate::time::Timestamp;

/// Maximum length of a chart label (fits "mmmm:ss" with margin)
pub const MAX_LABEL_LEN: usize = 11;

/// Small copyable inline string for chart labels
///
/// Series points are stored in fixed arrays, so the label must be `Copy`
/// and heap-free. Labels longer than [`MAX_LABEL_LEN`] are rejected at
/// construction, never truncated mid-character.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Label {
    len: u8,
    data: [u8; MAX_LABEL_LEN],
}

impl Label {
    /// Create from a string slice; `None` if it does not fit
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_LABEL_LEN {
            return None;
        }

        let mut data = [0u8; MAX_LABEL_LEN];
        data[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Format a `m:ss` label from elapsed milliseconds
    ///
    /// Same label scheme the charts used historically: minutes unpadded,
    /// seconds zero-padded.
    pub fn from_elapsed(elapsed_ms: u64) -> Self {
        let minutes = elapsed_ms / (60 * MS_PER_SECOND);
        let seconds = (elapsed_ms % (60 * MS_PER_SECOND)) / MS_PER_SECOND;

        let mut buf = heapless::String::<MAX_LABEL_LEN>::new();
        // Only unrepresentable if minutes exceeds the buffer, in which
        // case the label degrades to empty rather than panicking.
        let _ = write!(buf, "{}:{:02}", minutes, seconds);
        Self::new(&buf).unwrap_or_default()
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Label {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One (temperature, humidity) pair tagged with its sensor id
///
/// A missing sub-value arrives as the `f32::NAN` sentinel so that both
/// series of the window stay equal length; `NaN` never crosses a scoring
/// threshold and is rendered as "no data".
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SensorReading {
    /// Sensor identifier as reported by the device
    pub sensor_id: u32,
    /// Measured temperature in Celsius
    pub temperature_c: f32,
    /// Measured relative humidity in percent
    pub humidity_pct: f32,
}

/// One door contact transition reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorEvent {
    /// Door identifier (0-based; 0 renders as "Door 1")
    pub door_id: DoorId,
    /// Whether the contact reports the door open
    pub is_open: bool,
    /// Device-side transition time, if it reported one
    pub changed_at: Option<Timestamp>,
}

/// Gateway identity and link metadata, copied into snapshots for display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PayloadSummary {
    /// Device identifier
    pub device_id: heapless::String<32>,
    /// Installation site label
    pub location: heapless::String<48>,
    /// Firmware version string
    pub firmware_version: heapless::String<16>,
    /// Device-reported event time, unix seconds
    pub ts: u64,
    /// Gateway link strength in dBm, if reported
    pub rssi: Option<i32>,
}

/// One validated inbound telemetry event
///
/// Produced by [`crate::wire::decode`], consumed exactly once by
/// [`crate::ingest::TelemetryIngestor::ingest`].
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    /// Identity and link metadata for status display
    pub summary: PayloadSummary,
    /// Sensor readings from this event
    pub readings: heapless::Vec<SensorReading, MAX_BATCH_READINGS>,
    /// Door events from this event
    pub doors: heapless::Vec<DoorEvent, MAX_DOOR_EVENTS>,
    /// Optional threshold update carried inside the payload
    pub config: Option<crate::config::ConfigPatch>,
}

/// Copy a string into a bounded inline buffer, clipping at a char boundary
pub(crate) fn clip<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
