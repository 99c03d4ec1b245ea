//! State management module
//! 
//! This module contains the active timer registry and the controller that
//! drives it from menu actions.

pub mod app_state;
pub mod registry;

// Re-export main types
pub use app_state::AppState;
pub use registry::{TimerEntry, TimerRegistry};
