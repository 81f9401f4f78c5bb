//! Delayed disable after the screen turns off.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Armed,
}


#[derive(Default)]
struct TimerState {
    /// Bumped on every arm and cancel; a wait only fires if it still matches.
    generation: u64,
    /// Dropping the sender wakes the waiting thread.
    cancel: Option<Sender<()>>,
}


/// One-shot cancelable timer.
///
/// `screen_off` arms (or re-arms) it, `screen_on` cancels it. When the delay
/// elapses uncancelled the action runs once on the timer thread and the
/// timer returns to idle.
pub struct ScreenLockTimer {
    delay: Duration,
    action: Arc<dyn Fn() + Send + Sync>,
    state: Arc<Mutex<TimerState>>,
}


impl ScreenLockTimer {
    pub fn new(delay: Duration, action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            delay,
            action: Arc::new(action),
            state: Arc::new(Mutex::new(TimerState::default())),
        }
    }

    pub fn phase(&self) -> TimerPhase {
        if self.state.lock().cancel.is_some() {
            TimerPhase::Armed
        } else {
            TimerPhase::Idle
        }
    }

    /// Arm the timer, replacing any pending wait.
    pub fn screen_off(&self) {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.cancel = Some(cancel_tx);
            state.generation
        };

        let delay = self.delay;
        let state = Arc::clone(&self.state);
        let action = Arc::clone(&self.action);
        let spawned = thread::Builder::new()
            .name("screen-lock-timer".to_string())
            .spawn(move || {
                if !matches!(cancel_rx.recv_timeout(delay), Err(RecvTimeoutError::Timeout)) {
                    return;
                }
                {
                    let mut state = state.lock();
                    if state.generation != generation {
                        return;
                    }
                    state.cancel = None;
                }
                tracing::info!("screen-lock delay elapsed");
                action();
            });

        match spawned {
            Ok(_) => tracing::debug!(delay_secs = delay.as_secs(), "screen-lock timer armed"),
            Err(e) => {
                tracing::warn!(error = %e, "failed to start screen-lock timer");
                self.cancel();
            }
        }
    }

    /// Cancel a pending wait, if any.
    pub fn screen_on(&self) {
        if self.cancel() {
            tracing::debug!("screen-lock timer cancelled");
        }
    }

    fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        state.generation += 1;
        state.cancel.take().is_some()
    }
}


impl Drop for ScreenLockTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
