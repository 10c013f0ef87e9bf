//! Process-wide constants for the telemetry core
//!
//! Every tunable that is fixed at initialization lives here so call sites
//! never carry magic numbers. Runtime-tunable thresholds live in
//! [`crate::config::Config`] instead; the values here are their defaults
//! plus the structural bounds of the bounded in-memory model.

// ---------------------------------------------------------------------------
// Buffers
// ---------------------------------------------------------------------------

/// Points kept per sensor series window (chart history depth).
///
/// Matches the dashboard's 12-point mini charts. Larger windows cost
/// `size_of::<SeriesPoint>()` bytes per extra slot per sensor.
pub const SERIES_WINDOW_CAPACITY: usize = 12;

/// Upper bound on lazily-registered sensor series.
///
/// Must be a power of two (backing index map requirement). A payload
/// referencing more distinct sensor ids than this has the extras skipped
/// as unknown entities.
pub const MAX_TRACKED_SENSORS: usize = 8;

/// Maximum sensor readings accepted from a single payload.
pub const MAX_BATCH_READINGS: usize = 16;

/// Maximum door events accepted from a single payload.
pub const MAX_DOOR_EVENTS: usize = 4;

/// Doors modeled per device. The tracked set itself is
/// [`crate::doors::TRACKED_DOORS`].
pub const MAX_DOORS: usize = 2;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Milliseconds per second, for rate and label math.
pub const MS_PER_SECOND: u64 = 1000;

/// Silence period after which the device is declared offline.
///
/// Observed gateway variants used 15-20s; 15s is the tighter bound.
pub const OFFLINE_TIMEOUT_MS: u64 = 15_000;

// ---------------------------------------------------------------------------
// Scoring defaults (runtime-patchable via config updates)
// ---------------------------------------------------------------------------

/// Baseline cold-room temperature in Celsius.
pub const DEFAULT_BASE_TEMPERATURE_C: f32 = 20.0;

/// Baseline relative humidity in percent.
pub const DEFAULT_BASE_HUMIDITY_PCT: f32 = 70.0;

/// Deviation from baseline at which a reading is out of range.
pub const DEFAULT_SENSOR_LIMIT: f32 = 6.0;

/// Deviation from baseline counted as major drift.
pub const DEFAULT_SENSOR_DIFF_THRESHOLD: f32 = 10.0;

/// Score added per out-of-range reading.
pub const DEFAULT_PER_SENSOR_SCORE_WEIGHT: f32 = 0.25;

/// Score added per combined-deviation or major-drift rule.
pub const DEFAULT_DIFF_SCORE_WEIGHT: f32 = 0.15;
