//! Action execution: app blocking, data toggles, notifications, screen-lock timer.

mod executor;
mod screen_lock;

pub use executor::ActionExecutor;
pub use screen_lock::{ScreenLockTimer, TimerPhase};
