//! Menu event loop

use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

use crate::{
    state::AppState,
    timer::TimerId,
    ui::{Dialogs, MenuAction, MenuHost},
};

/// Drive the app from menu actions, timer completions and a refresh tick.
///
/// This loop is the only place the registry is mutated, so a completion can
/// never interleave with a user action. Returns when the user quits or the
/// action channel closes; remaining timers are cancelled before returning.
///
/// The custom timer prompt blocks, so that action runs on the blocking pool.
pub async fn menu_loop_task<H, D>(
    mut app: AppState<H, D>,
    mut actions: UnboundedReceiver<MenuAction>,
    mut completions: UnboundedReceiver<TimerId>,
    refresh_interval: Duration,
) where
    H: MenuHost + Send + 'static,
    H::Item: Send + 'static,
    H::Submenu: Send + 'static,
    D: Dialogs + Send + 'static,
{
    info!("Starting menu loop");

    let mut refresh = tokio::time::interval(refresh_interval);
    refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            action = actions.recv() => {
                let Some(action) = action else {
                    debug!("Action channel closed");
                    break;
                };
                debug!("Menu action: {:?}", action);

                let result = if action == MenuAction::CustomTimer {
                    let prompt = tokio::task::spawn_blocking(move || {
                        let result = app.handle_action(action);
                        (app, result)
                    });
                    match prompt.await {
                        Ok((returned, result)) => {
                            app = returned;
                            result
                        }
                        Err(e) => {
                            error!("Custom timer prompt failed: {}", e);
                            return;
                        }
                    }
                } else {
                    app.handle_action(action)
                };

                match result {
                    Ok(true) => app.refresh(),
                    Ok(false) => {
                        info!("Quit requested");
                        break;
                    }
                    Err(e) => app.report_error(&e),
                }
            }

            Some(id) = completions.recv() => {
                app.handle_completion(id);
            }

            _ = refresh.tick() => {
                app.refresh();
            }
        }
    }

    if app.active_count() > 0 {
        warn!("Exiting with {} active timer(s)", app.active_count());
    }
    app.shutdown();
}
