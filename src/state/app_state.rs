//! Main application controller

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use super::TimerRegistry;
use crate::{
    error::AppError,
    timer::{SimpleTimer, TimerId, TimerPhase, TimerSnapshot},
    ui::{Dialogs, MenuAction, MenuHost, Preset, TimerSubmenu},
    utils::{custom_timer_title, initial_label, parse_minutes},
};

/// Prompt text of the custom duration dialog
pub const CUSTOM_PROMPT: &str = "Custom timer duration (minutes):";

/// Owns the menu host, the dialogs and the active timer registry.
///
/// Every method runs on the menu loop, so the registry has exactly one
/// mutator. Expired timers report back through `completion_tx`.
pub struct AppState<H: MenuHost, D: Dialogs> {
    host: H,
    dialogs: D,
    registry: TimerRegistry<H::Item, H::Submenu>,
    completion_tx: UnboundedSender<TimerId>,
    custom_default: String,
}

impl<H: MenuHost, D: Dialogs> AppState<H, D> {
    pub fn new(mut host: H, dialogs: D, completion_tx: UnboundedSender<TimerId>, custom_default: String) -> Self {
        let status = host.status_item();
        Self {
            host,
            dialogs,
            registry: TimerRegistry::new(status),
            completion_tx,
            custom_default,
        }
    }

    /// Dispatch one menu action. Returns `false` once the user asked to quit.
    pub fn handle_action(&mut self, action: MenuAction) -> Result<bool, AppError> {
        match action {
            MenuAction::StartPreset(preset) => {
                self.start_preset(preset)?;
            }
            MenuAction::CustomTimer => {
                self.create_custom_timer()?;
            }
            MenuAction::TogglePause(id) => {
                self.toggle_pause(id)?;
            }
            MenuAction::Cancel(id) => self.cancel_timer(id)?,
            MenuAction::Refresh => {
                self.refresh();
                self.host.redraw();
            }
            MenuAction::Status => self.show_status(),
            MenuAction::Quit => return Ok(false),
        }
        Ok(true)
    }

    pub fn start_preset(&mut self, preset: Preset) -> Result<TimerId, AppError> {
        self.start_timer(preset.label(), preset.duration())
    }

    /// Create, register and start a timer with a menu row of its own
    pub fn start_timer(&mut self, title: &str, duration: Duration) -> Result<TimerId, AppError> {
        let completion_tx = self.completion_tx.clone();
        let timer = SimpleTimer::new(
            title,
            duration,
            Some(Box::new(move |timer: Arc<SimpleTimer>| {
                if let Err(e) = completion_tx.send(timer.id()) {
                    warn!("Failed to report completion of timer {}: {}", timer.id(), e);
                }
            })),
        );
        let id = timer.id();

        let submenu = self.host.add_timer_submenu(id, &initial_label(title, duration));
        self.registry.register(Arc::clone(&timer), submenu);

        if let Err(e) = timer.start() {
            self.registry.unregister(id);
            return Err(e.into());
        }

        info!("Started timer {} ({})", id, title);
        Ok(id)
    }

    /// Ask for a duration in minutes and start a timer for it.
    ///
    /// Returns `Ok(None)` when the prompt is dismissed.
    pub fn create_custom_timer(&mut self) -> Result<Option<TimerId>, AppError> {
        let Some(response) = self.dialogs.prompt(CUSTOM_PROMPT, &self.custom_default) else {
            info!("Custom timer prompt dismissed");
            return Ok(None);
        };

        let duration = parse_minutes(&response)?;
        let title = custom_timer_title(duration);
        self.start_timer(&title, duration).map(Some)
    }

    /// Pause a running timer or resume a paused one, returning the new phase
    pub fn toggle_pause(&mut self, id: TimerId) -> Result<TimerPhase, AppError> {
        let entry = self.registry.get_mut(id).ok_or(AppError::UnknownTimer(id))?;

        let phase = if entry.timer.is_paused() {
            entry.timer.resume()?;
            entry.submenu.set_toggle_label("Pause");
            TimerPhase::Running
        } else {
            entry.timer.pause()?;
            entry.submenu.set_toggle_label("Resume");
            TimerPhase::Paused
        };

        self.registry.refresh_display();
        Ok(phase)
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> Result<(), AppError> {
        let entry = self.registry.unregister(id).ok_or(AppError::UnknownTimer(id))?;
        entry.timer.cancel()?;
        Ok(())
    }

    /// Drop a finished timer from the menu and tell the user
    pub fn handle_completion(&mut self, id: TimerId) {
        let Some(entry) = self.registry.unregister(id) else {
            warn!("Completion reported for unknown timer {}", id);
            return;
        };

        info!("Timer {} ({}) complete", id, entry.timer.title());
        self.dialogs.alert(
            &format!("Your timer for {} has ended!", entry.timer.title()),
            "Timer Complete",
        );
    }

    /// Report a failed action to the user without stopping the app
    pub fn report_error(&mut self, error: &AppError) {
        warn!("Menu action failed: {}", error);
        if let AppError::Input(e) = error {
            self.dialogs.alert("Invalid duration", &e.to_string());
        }
    }

    pub fn refresh(&mut self) {
        self.registry.refresh_display();
    }

    /// Show the active timers as JSON in an alert
    pub fn show_status(&mut self) {
        match serde_json::to_string_pretty(&self.snapshots()) {
            Ok(json) => self.dialogs.alert("Active timers", &json),
            Err(e) => warn!("Failed to serialize timer status: {}", e),
        }
    }

    pub fn snapshots(&self) -> Vec<TimerSnapshot> {
        self.registry.snapshots()
    }

    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &TimerRegistry<H::Item, H::Submenu> {
        &self.registry
    }

    /// Cancel everything still pending
    pub fn shutdown(&mut self) {
        for entry in self.registry.drain() {
            if let Err(e) = entry.timer.cancel() {
                warn!("Failed to cancel timer {} on shutdown: {}", entry.timer.id(), e);
            }
        }
        info!("All timers cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InputError, TimerError};
    use crate::ui::MenuItem;
    use std::sync::Mutex;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    #[derive(Debug, Default)]
    struct Row {
        title: String,
        enabled: bool,
        deleted: bool,
        toggle: String,
    }

    type Rows = Arc<Mutex<Vec<(TimerId, Row)>>>;

    struct TestItem {
        rows: Rows,
        id: Option<TimerId>,
    }

    impl TestItem {
        fn with_row<R>(&self, f: impl FnOnce(&mut Row) -> R) -> R {
            let mut rows = self.rows.lock().unwrap();
            let key = self.id.unwrap_or(TimerId::from(0));
            let row = rows.iter_mut().find(|(id, _)| *id == key).map(|(_, row)| row).unwrap();
            f(row)
        }
    }

    impl MenuItem for TestItem {
        fn title(&self) -> String {
            self.with_row(|row| row.title.clone())
        }

        fn set_title(&mut self, title: &str) {
            self.with_row(|row| row.title = title.to_string());
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.with_row(|row| row.enabled = enabled);
        }

        fn delete(&mut self) {
            self.with_row(|row| row.deleted = true);
        }
    }

    impl TimerSubmenu for TestItem {
        fn set_toggle_label(&mut self, label: &str) {
            self.with_row(|row| row.toggle = label.to_string());
        }
    }

    #[derive(Default, Clone)]
    struct TestHost {
        rows: Rows,
    }

    impl TestHost {
        fn row<R>(&self, id: u64, f: impl FnOnce(&Row) -> R) -> R {
            let rows = self.rows.lock().unwrap();
            let (_, row) = rows.iter().find(|(key, _)| key.get() == id).unwrap();
            f(row)
        }
    }

    impl MenuHost for TestHost {
        type Item = TestItem;
        type Submenu = TestItem;

        fn status_item(&mut self) -> TestItem {
            self.rows.lock().unwrap().push((TimerId::from(0), Row::default()));
            TestItem { rows: Arc::clone(&self.rows), id: None }
        }

        fn add_timer_submenu(&mut self, id: TimerId, label: &str) -> TestItem {
            self.rows.lock().unwrap().push((
                id,
                Row {
                    title: label.to_string(),
                    enabled: true,
                    toggle: "Pause".to_string(),
                    ..Row::default()
                },
            ));
            TestItem { rows: Arc::clone(&self.rows), id: Some(id) }
        }
    }

    #[derive(Default, Clone)]
    struct TestDialogs {
        answers: Arc<Mutex<Vec<Option<String>>>>,
        alerts: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl Dialogs for TestDialogs {
        fn alert(&mut self, title: &str, message: &str) {
            self.alerts.lock().unwrap().push((title.to_string(), message.to_string()));
        }

        fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
            assert_eq!(message, CUSTOM_PROMPT);
            assert_eq!(default, "5");
            self.answers.lock().unwrap().remove(0)
        }
    }

    fn app() -> (AppState<TestHost, TestDialogs>, TestHost, TestDialogs, UnboundedReceiver<TimerId>) {
        let host = TestHost::default();
        let dialogs = TestDialogs::default();
        let (tx, rx) = unbounded_channel();
        let app = AppState::new(host.clone(), dialogs.clone(), tx, "5".to_string());
        (app, host, dialogs, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_preset_creates_row_and_updates_status() {
        let (mut app, host, _, _rx) = app();
        host.row(0, |status| {
            assert_eq!(status.title, "No active timers");
            assert!(!status.enabled);
        });

        let id = app.start_preset(Preset::FiveMinutes).unwrap();
        host.row(id.get(), |row| assert_eq!(row.title, "5 minutes (05:00 remaining)"));
        host.row(0, |status| {
            assert_eq!(status.title, "1 active timer");
            assert!(status.enabled);
        });

        app.start_preset(Preset::OneHour).unwrap();
        host.row(0, |status| assert_eq!(status.title, "2 active timers"));
        assert_eq!(app.active_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_removes_row_and_alerts() {
        let (mut app, host, dialogs, mut rx) = app();
        let id = app.start_preset(Preset::OneMinute).unwrap();

        let finished = rx.recv().await.unwrap();
        assert_eq!(finished, id);
        app.handle_completion(finished);

        host.row(id.get(), |row| assert!(row.deleted));
        host.row(0, |status| assert_eq!(status.title, "No active timers"));
        assert_eq!(
            dialogs.alerts.lock().unwrap().as_slice(),
            &[("Your timer for 1 minute has ended!".to_string(), "Timer Complete".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_pause_flips_label() {
        let (mut app, host, _, _rx) = app();
        let id = app.start_preset(Preset::TenMinutes).unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;

        assert_eq!(app.toggle_pause(id).unwrap(), TimerPhase::Paused);
        host.row(id.get(), |row| {
            assert_eq!(row.toggle, "Resume");
            assert_eq!(row.title, "10 minutes (Paused, 09:00 remaining)");
        });

        assert_eq!(app.toggle_pause(id).unwrap(), TimerPhase::Running);
        host.row(id.get(), |row| {
            assert_eq!(row.toggle, "Pause");
            assert_eq!(row.title, "10 minutes (09:00 remaining)");
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_removes_timer_without_alert() {
        let (mut app, host, dialogs, mut rx) = app();
        let id = app.start_preset(Preset::OneMinute).unwrap();

        app.cancel_timer(id).unwrap();
        host.row(id.get(), |row| assert!(row.deleted));
        assert!(matches!(app.cancel_timer(id), Err(AppError::UnknownTimer(_))));

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
        assert!(dialogs.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_timer_titles_and_validation() {
        let (mut app, host, dialogs, _rx) = app();
        dialogs.answers.lock().unwrap().extend([
            Some("2.5".to_string()),
            Some("abc".to_string()),
            Some("2e17".to_string()),
            None,
        ]);

        let id = app.create_custom_timer().unwrap().unwrap();
        host.row(id.get(), |row| assert_eq!(row.title, "2.5 minutes (02:30 remaining)"));

        let err = app.create_custom_timer().unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::NotANumber(_))));
        app.report_error(&err);
        assert_eq!(dialogs.alerts.lock().unwrap()[0].0, "Invalid duration");

        let err = app.create_custom_timer().unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::TooLarge(_))));

        assert_eq!(app.create_custom_timer().unwrap(), None);
        assert_eq!(app.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unstartable_timer_leaves_no_row() {
        let (mut app, host, _, _rx) = app();

        let err = app.start_timer("forever", Duration::from_secs(u64::MAX)).unwrap_err();
        assert!(matches!(err, AppError::Timer(TimerError::OutOfRange(_))));
        assert_eq!(app.active_count(), 0);
        host.row(0, |status| assert_eq!(status.title, "No active timers"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_action_and_shutdown() {
        let (mut app, _, dialogs, mut rx) = app();
        assert!(app.handle_action(MenuAction::StartPreset(Preset::ThirtyMinutes)).unwrap());
        assert!(app.handle_action(MenuAction::StartPreset(Preset::OneMinute)).unwrap());
        assert!(app.handle_action(MenuAction::Refresh).unwrap());
        assert!(app.handle_action(MenuAction::Status).unwrap());
        {
            let alerts = dialogs.alerts.lock().unwrap();
            let (title, body) = alerts.last().unwrap();
            assert_eq!(title, "Active timers");
            assert!(body.contains("\"30 minutes\""));
            assert!(body.contains("\"running\""));
        }
        assert!(!app.handle_action(MenuAction::Quit).unwrap());

        app.shutdown();
        assert_eq!(app.active_count(), 0);
        assert!(app.snapshots().is_empty());

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(rx.try_recv().is_err());
    }
}
