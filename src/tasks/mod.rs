//! Background tasks module
//! 
//! This module contains the event loop that ties menu input to the timers.

pub mod menu_loop;

// Re-export main functions
pub use menu_loop::menu_loop_task;
