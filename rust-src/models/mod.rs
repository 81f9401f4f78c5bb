//! Data model for usage samples and user-directed app state.

mod app_state;
mod usage_sample;

pub use app_state::{AppLimit, BlockedApp, ToggleHistoryEntry, ToggleReason};
pub use usage_sample::{AppUsage, NewUsageSample, Period, Traffic, UsageSample};
