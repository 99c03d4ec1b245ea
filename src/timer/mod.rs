//! Countdown timer engine
//!
//! This module contains the pausable timer state machine and the types used
//! to identify and describe a timer.

pub mod phase;
pub mod simple_timer;

// Re-export main types
pub use phase::{TimerId, TimerPhase, TimerSnapshot};
pub use simple_timer::{CompletionAction, SimpleTimer};
