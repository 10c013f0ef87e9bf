//! Wire Payload Decoding
//!
//! ## Overview
//!
//! The gateway delivers JSON payloads whose shape drifted across firmware
//! revisions. This module is the single place that knows about that
//! history: it validates an inbound document against an explicit serde
//! schema and produces a typed [`Payload`], so downstream code never
//! probes optional fields ad hoc.
//!
//! Tolerated variants, all observed on the wire:
//!
//! - the payload may arrive wrapped in a one-element array; the first
//!   element is substituted as the effective payload
//! - door events as an array of objects, or as legacy flat `door1` /
//!   `door2` booleans at the top level
//! - numeric fields carrying non-numeric junk; these decode to "absent"
//!   instead of failing the whole payload
//!
//! The `dht22` readings array is required - a document without it is
//! rejected as malformed, which aborts that one ingest call and nothing
//! else.

use serde::Deserialize;

use crate::config::ConfigPatch;
use crate::errors::{IngestError, IngestResult};
use crate::payload::{clip, DoorEvent, Payload, PayloadSummary, SensorReading};
use crate::time::Timestamp;

/// Wire `state` value that means "door open"
///
/// Majority convention across device firmware revisions; at least one
/// revision inverted it. Confirm against the device contract before
/// changing - this constant is the only place the polarity lives.
pub const DOOR_OPEN_STATE: i64 = 1;

#[derive(Debug, Deserialize)]
struct WirePayload {
    #[serde(rename = "deviceId", default)]
    device_id: String,
    #[serde(default)]
    location: String,
    #[serde(rename = "firmwareVersion", default)]
    firmware_version: String,
    #[serde(default)]
    ts: u64,
    #[serde(default, deserialize_with = "lenient_i64")]
    rssi: Option<i64>,
    /// Device-asserted liveness; parsed and discarded, the watchdog owns
    /// liveness
    #[serde(default)]
    #[allow(dead_code)]
    status: Option<String>,
    dht22: Vec<WireReading>,
    #[serde(default)]
    doors: Option<Vec<WireDoor>>,
    #[serde(default)]
    door1: Option<bool>,
    #[serde(default)]
    door2: Option<bool>,
    #[serde(default)]
    config: Option<WireConfig>,
}

#[derive(Debug, Deserialize)]
struct WireReading {
    id: u32,
    #[serde(default, deserialize_with = "lenient_f32")]
    temperature: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    humidity: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct WireDoor {
    id: u32,
    #[serde(default, deserialize_with = "lenient_i64")]
    state: Option<i64>,
    #[serde(rename = "changedAt", default)]
    changed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireConfig {
    #[serde(rename = "baseTemp", default, deserialize_with = "lenient_f32")]
    base_temp: Option<f32>,
    #[serde(rename = "baseHum", default, deserialize_with = "lenient_f32")]
    base_hum: Option<f32>,
    #[serde(rename = "sensorLimit", default, deserialize_with = "lenient_f32")]
    sensor_limit: Option<f32>,
    #[serde(rename = "sensorDiff", default, deserialize_with = "lenient_f32")]
    sensor_diff: Option<f32>,
    #[serde(rename = "sensorScore", default, deserialize_with = "lenient_f32")]
    sensor_score: Option<f32>,
    #[serde(rename = "diffScore", default, deserialize_with = "lenient_f32")]
    diff_score: Option<f32>,
}

/// Accept any JSON value, keeping it only if it is a number
///
/// The reference firmware occasionally shipped numeric fields as strings
/// or nulls; those must keep the previous value, not fail ingestion.
fn lenient_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).map(|f| f as f32))
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

fn parse_changed_at(raw: &str) -> Option<Timestamp> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp_millis())
        .filter(|ms| *ms >= 0)
        .map(|ms| ms as Timestamp)
}

/// Decode a raw wire document into a typed payload
///
/// A one-element (or longer) array substitutes its first element as the
/// effective payload. Anything that is not ultimately a JSON object with
/// a `dht22` array fails with [`IngestError::MalformedPayload`].
pub fn decode(raw: &str) -> IngestResult<Payload> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|_| IngestError::MalformedPayload { reason: "not valid JSON" })?;

    let value = match value {
        serde_json::Value::Array(mut items) => {
            if items.is_empty() {
                return Err(IngestError::MalformedPayload { reason: "empty payload batch" });
            }
            items.swap_remove(0)
        }
        other => other,
    };

    if !value.is_object() {
        return Err(IngestError::MalformedPayload { reason: "payload is not an object" });
    }

    let wire: WirePayload = serde_json::from_value(value)
        .map_err(|_| IngestError::MalformedPayload { reason: "missing or mistyped fields" })?;

    Ok(from_wire(wire))
}

fn from_wire(wire: WirePayload) -> Payload {
    let summary = PayloadSummary {
        device_id: clip(&wire.device_id),
        location: clip(&wire.location),
        firmware_version: clip(&wire.firmware_version),
        ts: wire.ts,
        rssi: wire.rssi.map(|v| v as i32),
    };

    let mut readings = heapless::Vec::new();
    for entry in &wire.dht22 {
        let reading = SensorReading {
            sensor_id: entry.id,
            // NaN sentinel keeps both sub-series aligned when one value
            // is missing; it never crosses a scoring threshold
            temperature_c: entry.temperature.unwrap_or(f32::NAN),
            humidity_pct: entry.humidity.unwrap_or(f32::NAN),
        };
        if readings.push(reading).is_err() {
            #[cfg(feature = "log")]
            log::warn!("payload carried more than {} readings, rest dropped", readings.len());
            break;
        }
    }

    let mut doors = heapless::Vec::new();
    if let Some(events) = &wire.doors {
        for entry in events {
            let door_id = match u8::try_from(entry.id) {
                Ok(id) => id,
                // Will never match the tracked set; skip here
                Err(_) => continue,
            };
            let state = match entry.state {
                Some(state) => state,
                None => continue,
            };
            let event = DoorEvent {
                door_id,
                is_open: state == DOOR_OPEN_STATE,
                changed_at: entry.changed_at.as_deref().and_then(parse_changed_at),
            };
            if doors.push(event).is_err() {
                break;
            }
        }
    } else {
        // Legacy firmware: flat booleans for the two fixed doors
        for (door_id, flag) in [(0u8, wire.door1), (1u8, wire.door2)] {
            if let Some(is_open) = flag {
                let _ = doors.push(DoorEvent {
                    door_id,
                    is_open,
                    changed_at: None,
                });
            }
        }
    }

    let config = wire.config.map(|c| ConfigPatch {
        base_temperature_c: c.base_temp,
        base_humidity_pct: c.base_hum,
        sensor_limit: c.sensor_limit,
        sensor_diff_threshold: c.sensor_diff,
        per_sensor_score_weight: c.sensor_score,
        diff_score_weight: c.diff_score,
    });

    Payload {
        summary,
        readings,
        doors,
        config,
    }
}
