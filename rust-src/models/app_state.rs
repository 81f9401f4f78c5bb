//! Blocked apps, per-app limits and the toggle audit log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


/// An app whose metered background data the user asked to block.
///
/// Records intent; `enforced` says whether the privileged policy call
/// reported success when the row was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedApp {
    pub uid: u32,
    pub package_name: String,
    pub app_name: String,
    pub blocked_at: DateTime<Utc>,
    pub enforced: bool,
}


/// User-configured ceilings for one app, in megabytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppLimit {
    pub uid: u32,
    pub package_name: String,
    pub daily_limit_mb: u64,
    pub weekly_limit_mb: u64,
    pub monthly_limit_mb: u64,
}


/// Why a mobile data toggle was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleReason {
    Idle,
    LimitReached,
    Manual,
    AutoToggle,
    ScreenLock,
}


impl ToggleReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LimitReached => "limit_reached",
            Self::Manual => "manual",
            Self::AutoToggle => "auto_toggle",
            Self::ScreenLock => "screen_lock",
        }
    }
}


impl fmt::Display for ToggleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


impl FromStr for ToggleReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "limit_reached" => Ok(Self::LimitReached),
            "manual" => Ok(Self::Manual),
            "auto_toggle" => Ok(Self::AutoToggle),
            "screen_lock" => Ok(Self::ScreenLock),
            other => Err(format!("unknown toggle reason '{other}'")),
        }
    }
}


/// One successful toggle request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleHistoryEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub enabled: bool,
    pub reason: ToggleReason,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_reason_round_trips_through_label() {
        for reason in [
            ToggleReason::Idle,
            ToggleReason::LimitReached,
            ToggleReason::Manual,
            ToggleReason::AutoToggle,
            ToggleReason::ScreenLock,
        ] {
            assert_eq!(reason.as_str().parse::<ToggleReason>().unwrap(), reason);
        }
    }

    #[test]
    fn test_unknown_reason_rejected() {
        assert!("boredom".parse::<ToggleReason>().is_err());
    }
}
