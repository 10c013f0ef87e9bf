//! Render-ready snapshots
//!
//! A snapshot is the only externally observable output of the core: one is
//! produced per successful ingest cycle, and one per watchdog expiry. It
//! is an immutable copy - consumers can hold it as long as they like
//! without seeing later mutations, and the core never depends on what they
//! do with it.
//!
//! Not-available is modeled with `Option::None` (summary, anomaly) and
//! [`DoorPosition::Unknown`](crate::doors::DoorPosition), deliberately
//! distinct from zero values, so an offline dashboard renders "no data"
//! rather than a fake healthy reading.

use heapless::Vec;

use crate::constants::{MAX_DOORS, MAX_TRACKED_SENSORS, SERIES_WINDOW_CAPACITY};
use crate::doors::DoorState;
use crate::payload::PayloadSummary;
use crate::scoring::AnomalyResult;
use crate::series::SeriesPoint;
use crate::watchdog::ConnectivityState;

/// One sensor's charted window, oldest point first
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SensorWindow<const N: usize = SERIES_WINDOW_CAPACITY> {
    pub sensor_id: u32,
    pub points: Vec<SeriesPoint, N>,
}

/// Immutable result of one processing cycle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot<const N: usize = SERIES_WINDOW_CAPACITY> {
    /// Gateway identity and link metadata; `None` in offline snapshots
    pub summary: Option<PayloadSummary>,
    /// Series windows in sensor registration order
    pub series: Vec<SensorWindow<N>, MAX_TRACKED_SENSORS>,
    /// Door states in tracked-set order
    pub doors: Vec<DoorState, MAX_DOORS>,
    /// Scoring result; `None` in offline snapshots
    pub anomaly: Option<AnomalyResult>,
    /// Liveness at the time the snapshot was taken
    pub connectivity: ConnectivityState,
}

impl<const N: usize> Snapshot<N> {
    /// True for snapshots emitted by a watchdog expiry
    pub fn is_offline(&self) -> bool {
        !self.connectivity.online
    }

    /// Window for one sensor, if present
    pub fn window(&self, sensor_id: u32) -> Option<&SensorWindow<N>> {
        self.series.iter().find(|w| w.sensor_id == sensor_id)
    }
}
