//! Pausable countdown timer backed by a cancellable tokio task

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use chrono::{DateTime, Local};
use tokio::{
    task::AbortHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use super::{TimerId, TimerPhase, TimerSnapshot};
use crate::error::TimerError;

/// Callback run once when a timer expires naturally.
///
/// Any extra arguments are captured by the closure.
pub type CompletionAction = Box<dyn FnOnce(Arc<SimpleTimer>) + Send + 'static>;

/// Phase plus the data that is only meaningful inside that phase
#[derive(Debug, Clone, Copy)]
enum Phase {
    Created,
    Running { end_time: Instant },
    Paused { remaining: Duration },
    Finished,
    Cancelled,
}

impl Phase {
    fn public(self) -> TimerPhase {
        match self {
            Phase::Created => TimerPhase::Created,
            Phase::Running { .. } => TimerPhase::Running,
            Phase::Paused { .. } => TimerPhase::Paused,
            Phase::Finished => TimerPhase::Finished,
            Phase::Cancelled => TimerPhase::Cancelled,
        }
    }
}

struct Inner {
    phase: Phase,
    /// Bumped whenever a scheduled completion becomes stale
    generation: u64,
    task: Option<AbortHandle>,
    action: Option<CompletionAction>,
}

/// A countdown that can be paused, resumed and cancelled.
///
/// Every state transition, including natural expiry, happens under a single
/// per-timer lock. A completion task that wakes after its generation has been
/// superseded does nothing, so the callback fires at most once and never after
/// a cancel or pause has won the lock.
pub struct SimpleTimer {
    id: TimerId,
    title: String,
    duration: Duration,
    created_at: DateTime<Local>,
    inner: Mutex<Inner>,
}

impl SimpleTimer {
    /// Create a timer in the created phase. Nothing runs until [`start`](Self::start).
    pub fn new(title: impl Into<String>, duration: Duration, action: Option<CompletionAction>) -> Arc<Self> {
        Arc::new(Self {
            id: TimerId::next(),
            title: title.into(),
            duration,
            created_at: Local::now(),
            inner: Mutex::new(Inner {
                phase: Phase::Created,
                generation: 0,
                task: None,
                action,
            }),
        })
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn phase(&self) -> TimerPhase {
        self.lock().phase.public()
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.lock().phase, Phase::Created)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.lock().phase, Phase::Paused { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.lock().phase, Phase::Finished)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.lock().phase, Phase::Cancelled)
    }

    /// Expected end instant, only while running
    pub fn end_time(&self) -> Option<Instant> {
        match self.lock().phase {
            Phase::Running { end_time } => Some(end_time),
            _ => None,
        }
    }

    /// Time left until completion, clamped at zero
    pub fn time_remaining(&self) -> Duration {
        match self.lock().phase {
            Phase::Created => self.duration,
            Phase::Running { end_time } => end_time.saturating_duration_since(Instant::now()),
            Phase::Paused { remaining } => remaining,
            Phase::Finished | Phase::Cancelled => Duration::ZERO,
        }
    }

    /// Begin the countdown. Must be called from within a tokio runtime.
    pub fn start(self: &Arc<Self>) -> Result<(), TimerError> {
        let mut inner = self.lock();
        match inner.phase {
            Phase::Created => {
                let end_time = Self::end_after(self.duration)?;
                inner.phase = Phase::Running { end_time };
                self.schedule(&mut inner, end_time);
                info!("Timer {} ({}) started for {:?}", self.id, self.title, self.duration);
                Ok(())
            }
            other => Err(Self::invalid("start", other)),
        }
    }

    /// Freeze the countdown, keeping the time that was left
    pub fn pause(&self) -> Result<(), TimerError> {
        let mut inner = self.lock();
        match inner.phase {
            Phase::Running { end_time } => {
                let remaining = end_time.saturating_duration_since(Instant::now());
                inner.phase = Phase::Paused { remaining };
                Self::unschedule(&mut inner);
                info!("Timer {} paused with {:?} remaining", self.id, remaining);
                Ok(())
            }
            other => Err(Self::invalid("pause", other)),
        }
    }

    /// Continue a paused countdown from where it stopped
    pub fn resume(self: &Arc<Self>) -> Result<(), TimerError> {
        let mut inner = self.lock();
        match inner.phase {
            Phase::Paused { remaining } => {
                let end_time = Self::end_after(remaining)?;
                inner.phase = Phase::Running { end_time };
                self.schedule(&mut inner, end_time);
                info!("Timer {} resumed with {:?} remaining", self.id, remaining);
                Ok(())
            }
            other => Err(Self::invalid("resume", other)),
        }
    }

    /// Stop the countdown for good; the completion action is dropped unrun
    pub fn cancel(&self) -> Result<(), TimerError> {
        let mut inner = self.lock();
        match inner.phase {
            Phase::Running { .. } | Phase::Paused { .. } => {
                inner.phase = Phase::Cancelled;
                Self::unschedule(&mut inner);
                inner.action = None;
                info!("Timer {} ({}) cancelled", self.id, self.title);
                Ok(())
            }
            other => Err(Self::invalid("cancel", other)),
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            id: self.id,
            title: self.title.clone(),
            phase: self.phase(),
            remaining_seconds: self.time_remaining().as_secs(),
            duration_seconds: self.duration.as_secs_f64(),
            created_at: self.created_at,
        }
    }

    fn schedule(self: &Arc<Self>, inner: &mut Inner, end_time: Instant) {
        inner.generation += 1;
        let generation = inner.generation;
        // Weak so dropping the last owner aborts the pending completion
        let timer = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            sleep_until(end_time).await;
            if let Some(timer) = Weak::upgrade(&timer) {
                timer.complete(generation);
            }
        });
        inner.task = Some(handle.abort_handle());
    }

    fn unschedule(inner: &mut Inner) {
        inner.generation += 1;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
    }

    fn complete(self: Arc<Self>, generation: u64) {
        let action = {
            let mut inner = self.lock();
            if inner.generation != generation || !matches!(inner.phase, Phase::Running { .. }) {
                debug!("Timer {} woke for a stale schedule, ignoring", self.id);
                return;
            }
            inner.phase = Phase::Finished;
            inner.task = None;
            inner.action.take()
        };

        info!("Timer {} ({}) finished", self.id, self.title);
        if let Some(action) = action {
            action(Arc::clone(&self));
        }
    }

    fn end_after(remaining: Duration) -> Result<Instant, TimerError> {
        Instant::now()
            .checked_add(remaining)
            .ok_or(TimerError::OutOfRange(remaining))
    }

    fn invalid(operation: &'static str, phase: Phase) -> TimerError {
        TimerError::InvalidTransition {
            operation,
            phase: phase.public(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Inner holds no invariants a panicking caller could break halfway
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SimpleTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleTimer")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("duration", &self.duration)
            .field("phase", &self.phase())
            .finish()
    }
}

impl Drop for SimpleTimer {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = inner.task.take() {
            task.abort();
        }
    }
}
