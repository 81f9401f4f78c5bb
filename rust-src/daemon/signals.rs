//! Signal handling: SIGTERM/SIGINT shutdown, SIGUSR1 screen off, SIGUSR2 screen on.
//!
//! The monitor loop polls these flags each iteration rather than blocking on signals.
//! Screen events share one slot holding the most recent event, so an unlock
//! followed by a re-lock between two polls still reads as "off".

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGINT, SIGTERM};


const NO_SCREEN_EVENT: usize = 0;
const SCREEN_OFF: usize = 1;
const SCREEN_ON: usize = 2;


/// Latest screen transition reported since the last poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    Off,
    On,
}


impl ScreenEvent {
    fn code(self) -> usize {
        match self {
            Self::Off => SCREEN_OFF,
            Self::On => SCREEN_ON,
        }
    }

    fn from_code(code: usize) -> Option<Self> {
        match code {
            SCREEN_OFF => Some(Self::Off),
            SCREEN_ON => Some(Self::On),
            _ => None,
        }
    }
}


/// Signal state shared between the OS handlers and the monitor loop.
#[derive(Clone, Default)]
pub struct SignalHandler {
    shutdown_flag: Arc<AtomicBool>,
    screen_event: Arc<AtomicUsize>,
}


impl SignalHandler {
    /// Create a handler and register OS signal hooks.
    ///
    /// Registration failures are logged, not fatal.
    pub fn new() -> Self {
        let handler = Self::default();
        handler.register_signals();
        handler
    }

    pub fn should_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::Relaxed)
    }

    /// Take the most recent screen event, clearing the slot.
    pub fn take_screen_event(&self) -> Option<ScreenEvent> {
        ScreenEvent::from_code(self.screen_event.swap(NO_SCREEN_EVENT, Ordering::SeqCst))
    }

    pub fn request_shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::Relaxed);
    }

    /// Record a screen event as the OS handlers do; a later event replaces an earlier one.
    #[allow(dead_code)]
    pub fn request_screen_event(&self, event: ScreenEvent) {
        self.screen_event.store(event.code(), Ordering::SeqCst);
    }

    fn register_signals(&self) {
        for (signal, name) in [(SIGTERM, "SIGTERM"), (SIGINT, "SIGINT")] {
            if let Err(e) = signal_hook::flag::register(signal, Arc::clone(&self.shutdown_flag)) {
                tracing::warn!(signal = name, error = %e, "failed to register signal");
            }
        }

        #[cfg(unix)]
        {
            use signal_hook::consts::{SIGUSR1, SIGUSR2};

            let screen_signals = [
                (SIGUSR1, "SIGUSR1", ScreenEvent::Off),
                (SIGUSR2, "SIGUSR2", ScreenEvent::On),
            ];
            for (signal, name, event) in screen_signals {
                let slot = Arc::clone(&self.screen_event);
                if let Err(e) = signal_hook::flag::register_usize(signal, slot, event.code()) {
                    tracing::warn!(signal = name, error = %e, "failed to register signal");
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_start_clear() {
        let handler = SignalHandler::default();
        assert!(!handler.should_shutdown());
        assert_eq!(handler.take_screen_event(), None);
    }

    #[test]
    fn test_screen_event_clears_on_take() {
        let handler = SignalHandler::default();
        handler.request_screen_event(ScreenEvent::Off);
        assert_eq!(handler.take_screen_event(), Some(ScreenEvent::Off));
        assert_eq!(handler.take_screen_event(), None);
    }

    #[test]
    fn test_latest_screen_event_wins() {
        let handler = SignalHandler::default();
        handler.request_screen_event(ScreenEvent::On);
        handler.request_screen_event(ScreenEvent::Off);
        assert_eq!(handler.take_screen_event(), Some(ScreenEvent::Off));

        handler.request_screen_event(ScreenEvent::Off);
        handler.request_screen_event(ScreenEvent::On);
        assert_eq!(handler.take_screen_event(), Some(ScreenEvent::On));
    }

    #[cfg(unix)]
    #[test]
    fn test_usr_signals_set_screen_event() {
        let handler = SignalHandler::new();
        signal_hook::low_level::raise(signal_hook::consts::SIGUSR2).unwrap();
        signal_hook::low_level::raise(signal_hook::consts::SIGUSR1).unwrap();
        assert_eq!(handler.take_screen_event(), Some(ScreenEvent::Off));
    }

    #[test]
    fn test_shutdown_is_sticky_and_shared() {
        let handler = SignalHandler::default();
        let clone = handler.clone();
        clone.request_shutdown();
        assert!(handler.should_shutdown());
        assert!(handler.should_shutdown());
    }
}
