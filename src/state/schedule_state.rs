//! Armed-run bookkeeping for the rescheduling loop
//!
//! At most one future pass is armed at a time. The flag is set when a run is
//! armed and cleared by the timer task right before the armed run executes.

use chrono::{DateTime, Local};
use std::sync::Mutex;

/// Whether a future pass is armed, and when it fires
#[derive(Debug, Default)]
pub struct ScheduleState {
    armed: Mutex<Option<DateTime<Local>>>,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a run firing at `fire_at`
    ///
    /// Returns `false` without changing anything if a run is already armed.
    /// The check and the update happen under one lock.
    pub fn try_arm(&self, fire_at: DateTime<Local>) -> bool {
        let mut armed = match self.armed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if armed.is_some() {
            return false;
        }

        *armed = Some(fire_at);
        true
    }

    /// Clears the armed flag so the firing run can arm its successor
    pub fn clear_armed(&self) {
        let mut armed = match self.armed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *armed = None;
    }

    /// Returns true if a run is currently armed
    pub fn is_armed(&self) -> bool {
        self.armed_until().is_some()
    }

    /// Returns the fire time of the armed run, if any
    pub fn armed_until(&self) -> Option<DateTime<Local>> {
        match self.armed.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
