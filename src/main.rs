//! Multi Timer - several pausable countdown timers driven from a menu
//! 
//! This is the main entry point for the multi-timer application.

use std::sync::mpsc;

use tokio::sync::mpsc::unbounded_channel;
use tracing::info;

use multi_timer::{
    config::Config,
    state::AppState,
    tasks::menu_loop_task,
    ui::console::{spawn_console_reader, ConsoleDialogs, ConsoleMenu},
    ui::MenuHost,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so the menu on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(format!("multi_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting multi-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: refresh={}s, custom default={}min",
          config.refresh, config.custom_default);

    let (action_tx, action_rx) = unbounded_channel();
    let (completion_tx, completion_rx) = unbounded_channel();
    let (answer_tx, answer_rx) = mpsc::channel();

    let mut menu = ConsoleMenu::new();
    let app = AppState::new(
        menu.clone(),
        ConsoleDialogs::new(answer_rx),
        completion_tx,
        config.custom_default.clone(),
    );
    menu.redraw();

    // The reader thread exits on its own at EOF or quit; it is not joined
    spawn_console_reader(action_tx, answer_tx)?;

    tokio::select! {
        _ = menu_loop_task(app, action_rx, completion_rx, config.refresh_interval()) => {}
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Shutdown complete");
    Ok(())
}
