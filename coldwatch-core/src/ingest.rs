//! Telemetry Ingestion Orchestrator
//!
//! ## Overview
//!
//! [`TelemetryIngestor`] owns the four stateful collaborators - config
//! store, series table, door tracker, connectivity watchdog - and drives
//! one processing cycle per inbound payload:
//!
//! 1. decode and validate the raw document (wire boundary)
//! 2. apply any embedded config patch
//! 3. push readings into the per-sensor series windows
//! 4. apply door events
//! 5. score the now-current state
//! 6. reset the watchdog
//! 7. publish an immutable [`Snapshot`]
//!
//! One `ingest` call is an atomic unit of work: it runs to completion
//! synchronously and the collaborators are never observable in a
//! half-updated state from outside. The host event loop interleaves
//! `ingest` and [`TelemetryIngestor::poll`] calls on one logical thread;
//! a deadline that elapses mid-ingest is simply observed at the next
//! `poll`.
//!
//! Entry-level problems (unknown sensor or door ids) skip that entry,
//! log, and keep going; only a malformed document aborts a cycle, and
//! even that leaves all prior state untouched.

use crate::config::{Config, ConfigStore};
use crate::constants::SERIES_WINDOW_CAPACITY;
use crate::doors::{DoorState, DoorStateTracker};
use crate::payload::{Label, Payload, PayloadSummary};
use crate::scoring::{self, AnomalyResult};
use crate::series::SeriesTable;
use crate::snapshot::{SensorWindow, Snapshot};
use crate::time::Timestamp;
use crate::watchdog::{ConnectivityState, ConnectivityWatchdog};

#[cfg(feature = "std")]
use crate::errors::IngestResult;

/// The telemetry stream processor for one monitored device
///
/// `W` is the series window capacity; the default matches the dashboard's
/// 12-point charts.
#[derive(Debug, Clone)]
pub struct TelemetryIngestor<const W: usize = SERIES_WINDOW_CAPACITY> {
    config: ConfigStore,
    series: SeriesTable<W>,
    doors: DoorStateTracker,
    watchdog: ConnectivityWatchdog,
    /// First-ingest time, origin for chart labels
    started_at: Option<Timestamp>,
}

impl<const W: usize> Default for TelemetryIngestor<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> TelemetryIngestor<W> {
    /// Ingestor with default config and offline timeout
    pub fn new() -> Self {
        Self::with_watchdog(ConnectivityWatchdog::default())
    }

    /// Ingestor with a custom-configured watchdog
    pub fn with_watchdog(watchdog: ConnectivityWatchdog) -> Self {
        Self {
            config: ConfigStore::new(),
            series: SeriesTable::new(),
            doors: DoorStateTracker::new(),
            watchdog,
            started_at: None,
        }
    }

    /// Decode a raw wire document and run one ingest cycle
    ///
    /// Malformed documents are logged and reported; they consume nothing
    /// and never stop future ingestion.
    #[cfg(feature = "std")]
    pub fn ingest_json(&mut self, raw: &str, now: Timestamp) -> IngestResult<Snapshot<W>> {
        match crate::wire::decode(raw) {
            Ok(payload) => Ok(self.ingest(&payload, now)),
            Err(err) => {
                log::warn!("ingest aborted: {}", err);
                Err(err)
            }
        }
    }

    /// Run one ingest cycle on an already-validated payload
    pub fn ingest(&mut self, payload: &Payload, now: Timestamp) -> Snapshot<W> {
        let started_at = *self.started_at.get_or_insert(now);

        if let Some(patch) = &payload.config {
            self.config.apply_patch(patch);
        }

        let label = Label::from_elapsed(now.saturating_sub(started_at));
        for reading in &payload.readings {
            if let Err(_skipped) = self.series.push(
                reading.sensor_id,
                reading.temperature_c,
                reading.humidity_pct,
                label,
            ) {
                #[cfg(feature = "log")]
                log::warn!("{}", _skipped);
            }
        }

        for event in &payload.doors {
            if let Err(_skipped) = self.doors.apply(event, now) {
                #[cfg(feature = "log")]
                log::warn!("{}", _skipped);
            }
        }

        let anomaly = scoring::score(&payload.readings, self.doors.list(), self.config.get());

        self.watchdog.record_event(now);

        self.assemble(Some(payload.summary.clone()), Some(anomaly))
    }

    /// Check the watchdog; emits the offline snapshot on expiry
    ///
    /// On expiry every display field resets to its not-available state:
    /// doors to `Unknown`, series windows emptied, summary and anomaly
    /// absent.
    pub fn poll(&mut self, now: Timestamp) -> Option<Snapshot<W>> {
        if !self.watchdog.poll(now) {
            return None;
        }

        self.doors.reset_unknown();
        self.series.reset();

        #[cfg(feature = "log")]
        log::warn!(
            "no telemetry for {} ms, declaring device offline",
            self.watchdog.timeout_ms()
        );

        Some(self.assemble(None, None))
    }

    /// Current effective scoring configuration
    pub fn config(&self) -> &Config {
        self.config.get()
    }

    /// Current door states
    pub fn doors(&self) -> &[DoorState] {
        self.doors.list()
    }

    /// Current liveness state
    pub fn connectivity(&self) -> ConnectivityState {
        self.watchdog.state()
    }

    fn assemble(
        &self,
        summary: Option<PayloadSummary>,
        anomaly: Option<AnomalyResult>,
    ) -> Snapshot<W> {
        let mut series = heapless::Vec::new();
        for (sensor_id, window) in self.series.iter() {
            // Table and snapshot share the same sensor bound
            let _ = series.push(SensorWindow {
                sensor_id,
                points: window.snapshot(),
            });
        }

        Snapshot {
            summary,
            series,
            doors: self.doors.list().iter().copied().collect(),
            anomaly,
            connectivity: self.watchdog.state(),
        }
    }
}
