//! Time handling for the telemetry core
//!
//! The core never reads a clock on its own: every operation that needs the
//! current time takes an explicit `now` parameter, which keeps processing
//! deterministic and testable. Hosts obtain `now` from a [`TimeSource`]:
//! the system clock on std targets, a tick counter on embedded ones.

/// Timestamp in milliseconds since epoch (or device boot for monotonic sources)
pub type Timestamp = u64;

/// Source of time for the host event loop
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

/// System wall clock (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Manually advanced clock for tests
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}
