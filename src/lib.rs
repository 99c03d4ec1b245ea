//! Multi Timer - several pausable countdown timers driven from a menu
//! 
//! This library provides the countdown engine, the registry that keeps timers
//! and their menu rows in sync, and a console host for the menu.

pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, InputError, TimerError};
pub use state::{AppState, TimerRegistry};
pub use timer::{SimpleTimer, TimerId, TimerPhase};
pub use utils::signals::shutdown_signal;
