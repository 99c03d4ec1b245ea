//! Error types shared across the timer engine, registry and controller

use std::time::Duration;

use thiserror::Error;

use crate::timer::{TimerId, TimerPhase};

/// Errors raised by the timer state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("cannot {operation} a timer that is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: TimerPhase,
    },

    #[error("a countdown of {0:?} ends too far in the future")]
    OutOfRange(Duration),
}

/// Validation errors for user-entered durations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("duration must be finite")]
    NotFinite,

    #[error("duration must be greater than zero, got {0}")]
    NotPositive(f64),

    #[error("duration must be at most one year, got {0} minutes")]
    TooLarge(f64),
}

/// Errors surfaced by the app controller
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no active timer with id {0}")]
    UnknownTimer(TimerId),

    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error("invalid duration: {0}")]
    Input(#[from] InputError),
}
