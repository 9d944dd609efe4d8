//! Global emergency pause latch
//!
//! A process-wide kill switch: once triggered, every trade is rejected
//! before any other check runs, until an explicit administrative release.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
struct PauseState {
    paused: bool,
    reason: Option<String>,
    since: Option<DateTime<Utc>>,
}

/// Snapshot of the pause latch for observability surfaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseStatus {
    pub paused: bool,
    pub reason: Option<String>,
    pub since: Option<DateTime<Utc>>,
}

/// Latching pause controller shared across all request handlers
pub struct PauseController {
    state: RwLock<PauseState>,
}

impl PauseController {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(PauseState::default()),
        }
    }

    /// Engage the pause; returns false when already paused (the original
    /// reason and timestamp are kept in that case)
    pub fn trigger(&self, reason: &str) -> bool {
        let mut state = self.state.write();
        if state.paused {
            return false;
        }

        state.paused = true;
        state.reason = Some(reason.to_string());
        state.since = Some(Utc::now());
        true
    }

    /// Clear the pause; returns false when trading was not paused
    pub fn release(&self) -> bool {
        let mut state = self.state.write();
        if !state.paused {
            return false;
        }

        *state = PauseState::default();
        true
    }

    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    pub fn status(&self) -> PauseStatus {
        let state = self.state.read();
        PauseStatus {
            paused: state.paused,
            reason: state.reason.clone(),
            since: state.since,
        }
    }
}

impl Default for PauseController {
    fn default() -> Self {
        Self::new()
    }
}
