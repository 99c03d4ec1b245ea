//! Utility functions module
//! 
//! This module contains utility functions used throughout the application.

pub mod format;
pub mod input;
pub mod signals;

// Re-export main functions
pub use format::{custom_timer_title, format_remaining, initial_label, relabel_remaining, status_label};
pub use input::parse_minutes;
pub use signals::shutdown_signal;
