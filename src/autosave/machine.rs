//! Pure auto-save state machine.
//!
//! Holds no clock and spawns nothing: the driver feeds it events with the
//! current instant and executes the saves it asks for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

use super::AutoSaveOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSaveState {
    /// Latest value is saved and nothing is scheduled
    Idle,
    /// A save is scheduled or owed
    PendingSave,
    /// A save call is in flight
    Saving,
    /// Torn down; no further saves are scheduled
    Closed,
}

impl fmt::Display for AutoSaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::PendingSave => write!(f, "pending_save"),
            Self::Saving => write!(f, "saving"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Snapshot published to observers after every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSaveStatus {
    pub state: AutoSaveState,
    pub has_changes: bool,
    pub saves_started: u64,
    pub saves_failed: u64,
}

impl Default for AutoSaveStatus {
    fn default() -> Self {
        Self {
            state: AutoSaveState::Idle,
            has_changes: false,
            saves_started: 0,
            saves_failed: 0,
        }
    }
}

#[derive(Debug)]
pub struct AutoSaveMachine<T> {
    delay: Duration,
    retry_delay: Duration,
    flush_on_teardown: bool,
    current: T,
    last_saved: T,
    in_flight: Option<T>,
    pending_retry: bool,
    deadline: Option<Instant>,
    closed: bool,
    saves_started: u64,
    saves_failed: u64,
}

impl<T: Clone + PartialEq> AutoSaveMachine<T> {
    /// The initial value counts as saved
    pub fn new(initial: T, options: &AutoSaveOptions) -> Self {
        Self {
            delay: options.delay,
            retry_delay: options.retry_delay,
            flush_on_teardown: options.flush_on_teardown,
            current: initial.clone(),
            last_saved: initial,
            in_flight: None,
            pending_retry: false,
            deadline: None,
            closed: false,
            saves_started: 0,
            saves_failed: 0,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.last_saved
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn last_saved(&self) -> &T {
        &self.last_saved
    }

    pub fn state(&self) -> AutoSaveState {
        if self.closed {
            AutoSaveState::Closed
        } else if self.in_flight.is_some() {
            AutoSaveState::Saving
        } else if self.deadline.is_some() || self.pending_retry || self.is_dirty() {
            AutoSaveState::PendingSave
        } else {
            AutoSaveState::Idle
        }
    }

    pub fn status(&self) -> AutoSaveStatus {
        AutoSaveStatus {
            state: self.state(),
            has_changes: self.is_dirty(),
            saves_started: self.saves_started,
            saves_failed: self.saves_failed,
        }
    }

    /// Trailing-edge debounce: every change pushes the deadline out
    pub fn value_changed(&mut self, value: T, now: Instant) {
        self.current = value;
        if self.closed {
            return;
        }
        if self.is_dirty() {
            self.deadline = Some(now + self.delay);
        } else {
            self.deadline = None;
            self.pending_retry = false;
        }
    }

    pub fn timer_fired(&mut self) -> Option<T> {
        self.deadline = None;
        self.attempt_save()
    }

    pub fn save_now(&mut self) -> Option<T> {
        self.deadline = None;
        self.attempt_save()
    }

    /// Returns a value to save immediately when one was owed
    pub fn save_succeeded(&mut self, now: Instant) -> Option<T> {
        if let Some(saved) = self.in_flight.take() {
            self.last_saved = saved;
        }
        if self.closed {
            return None;
        }
        if self.pending_retry {
            return self.attempt_save();
        }
        if self.is_dirty() && self.deadline.is_none() {
            self.deadline = Some(now + self.delay);
        }
        None
    }

    pub fn save_failed(&mut self, now: Instant) {
        self.in_flight = None;
        self.saves_failed += 1;
        if self.closed || !self.is_dirty() {
            return;
        }
        self.pending_retry = true;
        self.deadline = Some(now + self.retry_delay);
    }

    /// Stop scheduling; in-flight saves are left to complete
    pub fn close(&mut self) {
        self.closed = true;
        self.deadline = None;
        self.pending_retry = false;
    }

    /// The final best-effort save, once nothing is in flight
    pub fn teardown_flush(&mut self) -> Option<T> {
        if !self.closed || !self.flush_on_teardown || self.in_flight.is_some() || !self.is_dirty()
        {
            return None;
        }
        self.saves_started += 1;
        Some(self.current.clone())
    }

    fn attempt_save(&mut self) -> Option<T> {
        if self.closed {
            return None;
        }
        if self.in_flight.is_some() {
            self.pending_retry = true;
            return None;
        }
        self.pending_retry = false;
        if !self.is_dirty() {
            return None;
        }
        let value = self.current.clone();
        self.in_flight = Some(value.clone());
        self.saves_started += 1;
        Some(value)
    }
}
