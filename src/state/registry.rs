//! Active timer bookkeeping and label synchronization

use std::{collections::BTreeMap, sync::Arc};

use tracing::debug;

use crate::{
    timer::{SimpleTimer, TimerId, TimerSnapshot},
    ui::{MenuItem, TimerSubmenu},
    utils::{relabel_remaining, status_label},
};

/// One active timer and the menu row that shows it
#[derive(Debug)]
pub struct TimerEntry<S> {
    pub timer: Arc<SimpleTimer>,
    pub submenu: S,
}

/// Ordered mapping of active timers to their submenus.
///
/// Ids are allocated monotonically, so iterating the map yields timers in the
/// order they were created.
#[derive(Debug)]
pub struct TimerRegistry<I, S> {
    status: I,
    entries: BTreeMap<TimerId, TimerEntry<S>>,
}

impl<I: MenuItem, S: TimerSubmenu> TimerRegistry<I, S> {
    /// Take ownership of the status indicator and reset it to the empty state
    pub fn new(status: I) -> Self {
        let mut registry = Self {
            status,
            entries: BTreeMap::new(),
        };
        registry.update_status_indicator();
        registry
    }

    pub fn register(&mut self, timer: Arc<SimpleTimer>, submenu: S) {
        let id = timer.id();
        debug!("Registering timer {} ({})", id, timer.title());
        self.entries.insert(id, TimerEntry { timer, submenu });
        self.update_status_indicator();
    }

    /// Remove a timer by identity and delete its menu row
    pub fn unregister(&mut self, id: TimerId) -> Option<TimerEntry<S>> {
        let mut entry = self.entries.remove(&id)?;
        debug!("Unregistering timer {} ({})", id, entry.timer.title());
        entry.submenu.delete();
        self.update_status_indicator();
        Some(entry)
    }

    /// Rewrite every timer row with its current remaining time
    pub fn refresh_display(&mut self) {
        for entry in self.entries.values_mut() {
            let label = relabel_remaining(
                &entry.submenu.title(),
                entry.timer.time_remaining(),
                entry.timer.is_paused(),
            );
            entry.submenu.set_title(&label);
        }
    }

    pub fn get(&self, id: TimerId) -> Option<&TimerEntry<S>> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: TimerId) -> Option<&mut TimerEntry<S>> {
        self.entries.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<TimerId> {
        self.entries.keys().copied().collect()
    }

    pub fn snapshots(&self) -> Vec<TimerSnapshot> {
        self.entries.values().map(|entry| entry.timer.snapshot()).collect()
    }

    pub fn status(&self) -> &I {
        &self.status
    }

    /// Remove every entry, deleting the rows, and hand them back
    pub fn drain(&mut self) -> Vec<TimerEntry<S>> {
        let entries = std::mem::take(&mut self.entries);
        let drained = entries
            .into_values()
            .map(|mut entry| {
                entry.submenu.delete();
                entry
            })
            .collect();
        self.update_status_indicator();
        drained
    }

    fn update_status_indicator(&mut self) {
        let (title, enabled) = status_label(self.entries.len());
        self.status.set_title(&title);
        self.status.set_enabled(enabled);
    }
}
