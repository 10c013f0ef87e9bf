//! Connectivity watchdog
//!
//! Liveness is a two-state machine: the device starts OFFLINE, goes ONLINE
//! on every validated payload, and falls back to OFFLINE once a full
//! timeout elapses with no payload. There is exactly one deadline slot -
//! recording an event overwrites it in a single assignment, so rearming is
//! atomic and a stale deadline can never double-fire.
//!
//! The core runs on a single-queue event loop, so instead of owning a
//! timer the watchdog exposes [`ConnectivityWatchdog::poll`]: the host
//! calls it between ingests with the current time, and expiry is reported
//! at most once per armed deadline. This also guarantees the required
//! ordering - a deadline that elapses while an ingest is in flight is
//! observed only after that ingest completes.

use crate::constants::OFFLINE_TIMEOUT_MS;
use crate::time::Timestamp;

/// Published connectivity state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConnectivityState {
    /// False until the first valid payload, and again after a timeout
    pub online: bool,
    /// When the last valid payload arrived
    pub last_event_at: Option<Timestamp>,
}

/// Timeout-based liveness tracker
#[derive(Debug, Clone)]
pub struct ConnectivityWatchdog {
    online: bool,
    last_event_at: Option<Timestamp>,
    /// Pending offline deadline; `None` when disarmed or already fired
    deadline: Option<Timestamp>,
    timeout_ms: u64,
}

impl Default for ConnectivityWatchdog {
    fn default() -> Self {
        Self::new(OFFLINE_TIMEOUT_MS)
    }
}

impl ConnectivityWatchdog {
    /// Create an OFFLINE watchdog with the given silence timeout
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            online: false,
            last_event_at: None,
            deadline: None,
            timeout_ms,
        }
    }

    /// Record a validated payload: go ONLINE and rearm the deadline
    pub fn record_event(&mut self, now: Timestamp) {
        self.online = true;
        self.last_event_at = Some(now);
        // Supersedes any pending deadline; debounced, not additive
        self.deadline = Some(now + self.timeout_ms);
    }

    /// Check the deadline; true exactly once when it has elapsed
    ///
    /// On expiry the watchdog transitions to OFFLINE and disarms. It keeps
    /// no record of *why* it went offline, only the binary state and the
    /// last event time.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.online = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Configured silence timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Current published state
    pub fn state(&self) -> ConnectivityState {
        ConnectivityState {
            online: self.online,
            last_event_at: self.last_event_at,
        }
    }
}
