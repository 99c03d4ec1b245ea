//! Text formatting for menu labels

use std::time::Duration;

/// Format a remaining duration as `MM:SS`, or `HH:MM:SS` once it reaches an hour
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Title and enabled flag of the status indicator for `count` active timers
pub fn status_label(count: usize) -> (String, bool) {
    match count {
        0 => ("No active timers".to_string(), false),
        1 => ("1 active timer".to_string(), true),
        n => (format!("{} active timers", n), true),
    }
}

/// Rewrite the time portion of a timer label.
///
/// Everything up to and including the first `(` is kept; labels without one
/// get ` (` appended first.
pub fn relabel_remaining(label: &str, remaining: Duration, paused: bool) -> String {
    let prefix = match label.find('(') {
        Some(index) => label[..=index].to_string(),
        None => format!("{} (", label.trim_end()),
    };

    let time = format_remaining(remaining);
    if paused {
        format!("{}Paused, {} remaining)", prefix, time)
    } else {
        format!("{}{} remaining)", prefix, time)
    }
}

/// Label shown for a freshly created timer
pub fn initial_label(title: &str, remaining: Duration) -> String {
    format!("{} ({} remaining)", title, format_remaining(remaining))
}

/// Title for a timer created through the custom duration prompt
pub fn custom_timer_title(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{} seconds", secs)
    } else {
        let minutes = (secs / 60.0 * 100.0).round() / 100.0;
        format!("{} minutes", minutes)
    }
}
