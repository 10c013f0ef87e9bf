//! Rule-Based Anomaly Scoring
//!
//! ## Overview
//!
//! The scorer is a pure function from (readings, door states, config) to a
//! composite score in `[0, 1]` plus human-readable reasons. It holds no
//! state of its own; every ingest cycle recomputes the result from scratch.
//!
//! ## Algorithm
//!
//! Rules are independent and *additive*: each fired rule adds its weight
//! to a running total, and the total is clamped to `[0, 1]` at the end.
//! This is deliberately not a max or an average - the reference threshold
//! bands (see [`Severity`]) are calibrated against accumulated weights,
//! and two mild deviations should outrank one.
//!
//! Per reading (labelled `TH1`, `TH2`, ... by position in the batch):
//!
//! 1. deviation >= `sensor_limit` on temperature or humidity: out of
//!    range, `per_sensor_score_weight` each
//! 2. both out of range at once: combined deviation, `diff_score_weight`
//! 3. deviation >= `sensor_diff_threshold`: major drift from baseline,
//!    `diff_score_weight` each
//!
//! Door states contribute reason text only: a door counts as open unless
//! it has explicitly been observed closed (so `Unknown` reads as open,
//! which is the reference's per-cycle default). When nothing fires at all,
//! a single "everything normal" reason is emitted so the reason list is
//! never empty.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::Config;
use crate::doors::{DoorPosition, DoorState};
use crate::payload::SensorReading;

/// Maximum length of one reason string
pub const MAX_REASON_LEN: usize = 64;

/// Upper bound on reasons per cycle (5 rules per reading plus doors)
pub const MAX_REASONS: usize = 48;

/// One human-readable scoring reason
pub type Reason = String<MAX_REASON_LEN>;

/// Presentation bands derived from the composite score
///
/// Banding is a display concern, but it must be computed from the same
/// clamped value consumers see, so it lives next to the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    Normal,
    Observe,
    Warning,
    Risk,
    Critical,
}

impl Severity {
    /// Band for a clamped score
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            Severity::Critical
        } else if score >= 0.6 {
            Severity::Risk
        } else if score >= 0.4 {
            Severity::Warning
        } else if score >= 0.2 {
            Severity::Observe
        } else {
            Severity::Normal
        }
    }
}

/// Composite scoring result for one ingest cycle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnomalyResult {
    /// Accumulated rule weights, clamped to `[0, 1]`
    pub score: f32,
    /// Presentation band for `score`
    pub severity: Severity,
    /// Why the score is what it is; never empty
    pub reasons: Vec<Reason, MAX_REASONS>,
}

#[cfg(feature = "std")]
fn abs(v: f32) -> f32 {
    v.abs()
}

#[cfg(not(feature = "std"))]
fn abs(v: f32) -> f32 {
    libm::fabsf(v)
}

fn push_reason(reasons: &mut Vec<Reason, MAX_REASONS>, args: core::fmt::Arguments<'_>) {
    let mut reason = Reason::new();
    // Overlong text is truncated at capacity rather than dropped
    let _ = reason.write_fmt(args);
    let _ = reasons.push(reason);
}

/// Compute the composite anomaly score for one cycle
///
/// Pure and deterministic: equal inputs always produce equal results.
/// `NaN` sub-values (missing readings) never cross a threshold because
/// every rule is a `>=` comparison against a finite limit.
pub fn score(readings: &[SensorReading], doors: &[DoorState], config: &Config) -> AnomalyResult {
    let mut total = 0.0f32;
    let mut reasons: Vec<Reason, MAX_REASONS> = Vec::new();

    for (index, reading) in readings.iter().enumerate() {
        let sensor_no = index + 1;
        let temp_delta = abs(reading.temperature_c - config.base_temperature_c);
        let hum_delta = abs(reading.humidity_pct - config.base_humidity_pct);

        let temp_out = temp_delta >= config.sensor_limit;
        let hum_out = hum_delta >= config.sensor_limit;

        if temp_out {
            push_reason(
                &mut reasons,
                format_args!("TH{} temperature out of range", sensor_no),
            );
            total += config.per_sensor_score_weight;
        }
        if hum_out {
            push_reason(
                &mut reasons,
                format_args!("TH{} humidity out of range", sensor_no),
            );
            total += config.per_sensor_score_weight;
        }
        if temp_out && hum_out {
            push_reason(
                &mut reasons,
                format_args!("TH{} temperature & humidity deviated together", sensor_no),
            );
            total += config.diff_score_weight;
        }
        if temp_delta >= config.sensor_diff_threshold {
            push_reason(
                &mut reasons,
                format_args!(
                    "TH{} temperature major drift {:.1} from baseline",
                    sensor_no, temp_delta
                ),
            );
            total += config.diff_score_weight;
        }
        if hum_delta >= config.sensor_diff_threshold {
            push_reason(
                &mut reasons,
                format_args!(
                    "TH{} humidity major drift {:.1} from baseline",
                    sensor_no, hum_delta
                ),
            );
            total += config.diff_score_weight;
        }
    }

    // Door contribution is reason-only in the reference behavior
    let door_open = |id: u8| {
        doors
            .iter()
            .find(|s| s.door_id == id)
            .map(|s| s.position != DoorPosition::Closed)
            .unwrap_or(true)
    };
    let door1_open = door_open(0);
    let door2_open = door_open(1);

    if door1_open && door2_open {
        push_reason(&mut reasons, format_args!("Door 1 & Door 2 are open"));
    } else if door1_open {
        push_reason(&mut reasons, format_args!("Door 1 is open"));
    } else if door2_open {
        push_reason(&mut reasons, format_args!("Door 2 is open"));
    }

    if reasons.is_empty() {
        push_reason(
            &mut reasons,
            format_args!("Temperature, humidity, and door states are normal"),
        );
    }

    let score = total.clamp(0.0, 1.0);
    AnomalyResult {
        score,
        severity: Severity::from_score(score),
        reasons,
    }
}
