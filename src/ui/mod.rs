//! UI primitives the timer core drives
//!
//! The menu bar, its items, alerts and input prompts are owned by a host.
//! The core only talks to them through the traits below; `console` provides a
//! stdin/stdout implementation.

pub mod console;

use std::time::Duration;

use crate::timer::TimerId;

/// A single menu entry that can be retitled, greyed out or removed
pub trait MenuItem {
    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);
    fn set_enabled(&mut self, enabled: bool);
    fn delete(&mut self);
}

/// The row representing one timer, with its Pause/Resume and Cancel children
pub trait TimerSubmenu: MenuItem {
    fn set_toggle_label(&mut self, label: &str);
}

/// Creates the items the core needs
pub trait MenuHost {
    type Item: MenuItem;
    type Submenu: TimerSubmenu;

    /// The top-level item that summarizes active timers
    fn status_item(&mut self) -> Self::Item;

    /// Add a timer row under the status item. Its Pause and Cancel children
    /// must emit [`MenuAction::TogglePause`] and [`MenuAction::Cancel`] for `id`.
    fn add_timer_submenu(&mut self, id: TimerId, label: &str) -> Self::Submenu;

    /// Show the menu again after its labels changed. Hosts that render live
    /// can ignore this.
    fn redraw(&mut self) {}
}

/// Modal alerts and single-value prompts
pub trait Dialogs {
    fn alert(&mut self, title: &str, message: &str);

    /// Ask for a value. `None` means the user dismissed the prompt.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}

/// Fixed-duration entries of the timer menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    OneMinute,
    FiveMinutes,
    TenMinutes,
    ThirtyMinutes,
    OneHour,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::OneMinute,
        Preset::FiveMinutes,
        Preset::TenMinutes,
        Preset::ThirtyMinutes,
        Preset::OneHour,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::OneMinute => "1 minute",
            Preset::FiveMinutes => "5 minutes",
            Preset::TenMinutes => "10 minutes",
            Preset::ThirtyMinutes => "30 minutes",
            Preset::OneHour => "1 hour",
        }
    }

    pub fn duration(self) -> Duration {
        let secs = match self {
            Preset::OneMinute => 60,
            Preset::FiveMinutes => 300,
            Preset::TenMinutes => 600,
            Preset::ThirtyMinutes => 1800,
            Preset::OneHour => 3600,
        };
        Duration::from_secs(secs)
    }
}

/// Everything a click in the menu can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    StartPreset(Preset),
    CustomTimer,
    TogglePause(TimerId),
    Cancel(TimerId),
    Refresh,
    Status,
    Quit,
}
