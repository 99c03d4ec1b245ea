//! Timer identity, lifecycle phase and snapshot structures

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier of a timer, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    /// Allocate the next free id
    pub fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TimerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Created,
    Running,
    Paused,
    Finished,
    Cancelled,
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerPhase::Created => "created",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
            TimerPhase::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Point-in-time view of a timer, suitable for printing as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub id: TimerId,
    pub title: String,
    pub phase: TimerPhase,
    pub remaining_seconds: u64,
    pub duration_seconds: f64,
    pub created_at: DateTime<Local>,
}
