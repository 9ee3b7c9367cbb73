//! Repeating-timer access
//!
//! The carousel only needs to start and cancel one repeating interval. Hosts
//! expose their timer facility through `TimerAccess`; ids are opaque `u64`s
//! so any backend (slotmap keys, browser interval handles) can be carried.

use std::time::Duration;

/// Opaque handle to a repeating interval
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a backend-specific raw id
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The backend-specific raw id
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Trait for starting and cancelling repeating intervals
pub trait TimerAccess {
    /// Start a repeating interval, returns None if the backend is unavailable
    fn set_interval(&self, period: Duration) -> Option<TimerId>;

    /// Cancel an interval, returns true if it was live
    fn clear_interval(&self, id: TimerId) -> bool;

    /// Check whether an interval is still live
    fn is_active(&self, id: TimerId) -> bool;
}

/// Timer backend for hosts without timers; every request is refused
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTimers;

impl TimerAccess for NoTimers {
    fn set_interval(&self, _period: Duration) -> Option<TimerId> {
        None
    }

    fn clear_interval(&self, _id: TimerId) -> bool {
        false
    }

    fn is_active(&self, _id: TimerId) -> bool {
        false
    }
}
