//! Door contact state tracking
//!
//! The device has a fixed, small set of door contacts (Door 1 / Door 2).
//! States exist for exactly that set: events for other ids are rejected,
//! never auto-registered. A door is tri-state: `Unknown` is the startup
//! and offline rendering state and is distinct from `Closed`.
//!
//! `last_changed_at` is a *last transition* marker, not a last-seen
//! marker: it only moves when the open/closed value actually flips.

use heapless::Vec;

use crate::constants::MAX_DOORS;
use crate::errors::{IngestError, IngestResult};
use crate::payload::DoorEvent;
use crate::time::Timestamp;

/// Door identifier (0-based; 0 renders as "Door 1")
pub type DoorId = u8;

/// The fixed set of doors modeled per device
pub const TRACKED_DOORS: [DoorId; MAX_DOORS] = [0, 1];

/// Tri-state door position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DoorPosition {
    /// No observation yet, or the device has gone silent
    #[default]
    Unknown,
    Open,
    Closed,
}

/// Current state of one tracked door
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoorState {
    pub door_id: DoorId,
    pub position: DoorPosition,
    /// When the position last flipped; `None` until the first transition
    pub last_changed_at: Option<Timestamp>,
}

impl DoorState {
    const fn unknown(door_id: DoorId) -> Self {
        Self {
            door_id,
            position: DoorPosition::Unknown,
            last_changed_at: None,
        }
    }
}

/// Tracker for the fixed door set
#[derive(Debug, Clone)]
pub struct DoorStateTracker {
    states: Vec<DoorState, MAX_DOORS>,
}

impl Default for DoorStateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DoorStateTracker {
    /// All tracked doors start as `Unknown`
    pub fn new() -> Self {
        let mut states = Vec::new();
        for id in TRACKED_DOORS {
            // Capacity equals the tracked set size, cannot overflow
            let _ = states.push(DoorState::unknown(id));
        }
        Self { states }
    }

    /// Apply one door event
    ///
    /// Unknown door ids leave every state untouched and report the skip.
    /// `now` is used as the transition time when the event carries none.
    pub fn apply(&mut self, event: &DoorEvent, now: Timestamp) -> IngestResult<()> {
        let state = self
            .states
            .iter_mut()
            .find(|s| s.door_id == event.door_id)
            .ok_or(IngestError::UnknownDoor {
                id: event.door_id as u32,
            })?;

        let position = if event.is_open {
            DoorPosition::Open
        } else {
            DoorPosition::Closed
        };

        if state.position != position {
            state.last_changed_at = Some(event.changed_at.unwrap_or(now));
        }
        state.position = position;

        Ok(())
    }

    /// Reset every door to `Unknown` for offline/startup rendering
    pub fn reset_unknown(&mut self) {
        for state in self.states.iter_mut() {
            state.position = DoorPosition::Unknown;
        }
    }

    /// Current states, in tracked-set order
    pub fn list(&self) -> &[DoorState] {
        &self.states
    }
}
