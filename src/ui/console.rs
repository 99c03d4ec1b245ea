//! Line-oriented console host
//!
//! The menu is kept as a small model behind a mutex and printed on request.
//! Stdin is read on its own OS thread, which turns each line into a
//! [`MenuAction`] and forwards answers to the prompt dialog.

use std::{
    collections::BTreeMap,
    fmt::Write as _,
    io::{self, BufRead, Write as _},
    sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
};

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::{Dialogs, MenuAction, MenuHost, MenuItem, Preset, TimerSubmenu};
use crate::timer::TimerId;

const HELP: &str = "\
Commands:
  1m | 5m | 10m | 30m | 1h   start a preset timer
  custom [minutes]           start a timer with a custom duration
  pause <id>                 pause or resume a timer
  cancel <id>                cancel a timer
  list                       show the menu
  status                     show active timers as JSON
  help                       show this help
  quit                       exit";

#[derive(Debug, Clone)]
struct StatusRow {
    title: String,
    enabled: bool,
}

#[derive(Debug, Clone)]
struct TimerRow {
    title: String,
    toggle: String,
}

#[derive(Debug)]
struct MenuModel {
    status: StatusRow,
    timers: BTreeMap<TimerId, TimerRow>,
}

/// Shared menu model. Cloning yields another handle to the same menu.
#[derive(Debug, Clone)]
pub struct ConsoleMenu {
    model: Arc<Mutex<MenuModel>>,
}

impl ConsoleMenu {
    pub fn new() -> Self {
        Self {
            model: Arc::new(Mutex::new(MenuModel {
                status: StatusRow {
                    title: String::new(),
                    enabled: false,
                },
                timers: BTreeMap::new(),
            })),
        }
    }

    /// Render the whole menu as text
    pub fn render(&self) -> String {
        let model = lock(&self.model);
        let mut out = String::new();

        let state = if model.status.enabled { "" } else { " (disabled)" };
        let _ = writeln!(out, "[timer] {}{}", model.status.title, state);
        for (id, row) in &model.timers {
            let _ = writeln!(
                out,
                "    [{}] {}    {}: pause {} | Cancel: cancel {}",
                id, row.title, row.toggle, id, id
            );
        }
        let _ = writeln!(out, "  ---");
        for preset in Preset::ALL {
            let _ = writeln!(out, "  {:<8}{}", command_for(preset), preset.label());
        }
        let _ = writeln!(out, "  {:<8}Custom Timer...", "custom");
        let _ = write!(out, "  ---");
        out
    }
}

impl Default for ConsoleMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuHost for ConsoleMenu {
    type Item = ConsoleItem;
    type Submenu = ConsoleItem;

    fn status_item(&mut self) -> ConsoleItem {
        ConsoleItem {
            model: Arc::clone(&self.model),
            slot: None,
        }
    }

    fn add_timer_submenu(&mut self, id: TimerId, label: &str) -> ConsoleItem {
        lock(&self.model).timers.insert(
            id,
            TimerRow {
                title: label.to_string(),
                toggle: "Pause".to_string(),
            },
        );
        ConsoleItem {
            model: Arc::clone(&self.model),
            slot: Some(id),
        }
    }

    fn redraw(&mut self) {
        println!("{}", self.render());
    }
}

/// Handle to the status row (`slot == None`) or one timer row
#[derive(Debug)]
pub struct ConsoleItem {
    model: Arc<Mutex<MenuModel>>,
    slot: Option<TimerId>,
}

impl MenuItem for ConsoleItem {
    fn title(&self) -> String {
        let model = lock(&self.model);
        match self.slot {
            None => model.status.title.clone(),
            Some(id) => model.timers.get(&id).map(|row| row.title.clone()).unwrap_or_default(),
        }
    }

    fn set_title(&mut self, title: &str) {
        let mut model = lock(&self.model);
        match self.slot {
            None => model.status.title = title.to_string(),
            Some(id) => {
                if let Some(row) = model.timers.get_mut(&id) {
                    row.title = title.to_string();
                }
            }
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        // Timer rows are always clickable
        if self.slot.is_none() {
            lock(&self.model).status.enabled = enabled;
        }
    }

    fn delete(&mut self) {
        if let Some(id) = self.slot {
            lock(&self.model).timers.remove(&id);
        }
    }
}

impl TimerSubmenu for ConsoleItem {
    fn set_toggle_label(&mut self, label: &str) {
        if let Some(id) = self.slot {
            if let Some(row) = lock(&self.model).timers.get_mut(&id) {
                row.toggle = label.to_string();
            }
        }
    }
}

/// Alerts print to stdout; prompts wait for the next answer from the reader thread
#[derive(Debug)]
pub struct ConsoleDialogs {
    answers: mpsc::Receiver<Option<String>>,
}

impl ConsoleDialogs {
    pub fn new(answers: mpsc::Receiver<Option<String>>) -> Self {
        Self { answers }
    }
}

impl Dialogs for ConsoleDialogs {
    fn alert(&mut self, title: &str, message: &str) {
        println!("\n==> {}\n{}\n", title, message);
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        print!("{} [{}] ", message, default);
        if let Err(e) = io::stdout().flush() {
            debug!("Failed to flush prompt: {}", e);
        }

        match self.answers.recv() {
            Ok(Some(answer)) => resolve_answer(&answer, default),
            Ok(None) | Err(_) => None,
        }
    }
}

/// Map a raw prompt answer: blank takes the default, `cancel` dismisses
fn resolve_answer(answer: &str, default: &str) -> Option<String> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        Some(default.to_string())
    } else if trimmed.eq_ignore_ascii_case("cancel") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Action(MenuAction),
    /// Custom timer, optionally with the answer typed inline
    Custom(Option<String>),
    Help,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' needs a timer id")]
    MissingId(&'static str),

    #[error("'{0}' is not a timer id")]
    InvalidId(String),
}

fn command_for(preset: Preset) -> &'static str {
    match preset {
        Preset::OneMinute => "1m",
        Preset::FiveMinutes => "5m",
        Preset::TenMinutes => "10m",
        Preset::ThirtyMinutes => "30m",
        Preset::OneHour => "1h",
    }
}

/// Parse one line of console input
pub fn parse_command(line: &str) -> Result<ConsoleCommand, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ConsoleCommand::Empty);
    };
    let head = head.to_ascii_lowercase();

    if let Some(preset) = Preset::ALL.into_iter().find(|p| command_for(*p) == head) {
        return Ok(ConsoleCommand::Action(MenuAction::StartPreset(preset)));
    }

    let command = match head.as_str() {
        "custom" => {
            let rest: Vec<&str> = words.collect();
            let inline = (!rest.is_empty()).then(|| rest.join(" "));
            ConsoleCommand::Custom(inline)
        }
        "pause" | "resume" => ConsoleCommand::Action(MenuAction::TogglePause(parse_id("pause", words.next())?)),
        "cancel" => ConsoleCommand::Action(MenuAction::Cancel(parse_id("cancel", words.next())?)),
        "list" | "menu" => ConsoleCommand::Action(MenuAction::Refresh),
        "status" => ConsoleCommand::Action(MenuAction::Status),
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Action(MenuAction::Quit),
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn parse_id(command: &'static str, word: Option<&str>) -> Result<TimerId, CommandError> {
    let word = word.ok_or(CommandError::MissingId(command))?;
    word.trim_start_matches('#')
        .parse::<u64>()
        .map(TimerId::from)
        .map_err(|_| CommandError::InvalidId(word.to_string()))
}

/// Read stdin on a dedicated thread until EOF or `quit`
pub fn spawn_console_reader(
    actions: UnboundedSender<MenuAction>,
    answers: mpsc::Sender<Option<String>>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console-reader".to_string())
        .spawn(move || read_commands(io::stdin().lock(), actions, answers))
}

fn read_commands(
    input: impl BufRead,
    actions: UnboundedSender<MenuAction>,
    answers: mpsc::Sender<Option<String>>,
) {
    let mut lines = input.lines();

    while let Some(line) = lines.next() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };

        let action = match parse_command(&line) {
            Ok(ConsoleCommand::Action(action)) => action,
            Ok(ConsoleCommand::Custom(inline)) => {
                if actions.send(MenuAction::CustomTimer).is_err() {
                    return;
                }
                let answer = inline.or_else(|| lines.next().and_then(Result::ok));
                if answers.send(answer).is_err() {
                    return;
                }
                continue;
            }
            Ok(ConsoleCommand::Help) => {
                println!("{}", HELP);
                continue;
            }
            Ok(ConsoleCommand::Empty) => continue,
            Err(e) => {
                println!("{}; type 'help' for commands", e);
                continue;
            }
        };

        let quit = action == MenuAction::Quit;
        if actions.send(action).is_err() || quit {
            return;
        }
    }

    debug!("Console input closed");
    let _ = actions.send(MenuAction::Quit);
}

fn lock(model: &Mutex<MenuModel>) -> MutexGuard<'_, MenuModel> {
    model.lock().unwrap_or_else(PoisonError::into_inner)
}
