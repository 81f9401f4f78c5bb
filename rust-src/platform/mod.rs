//! Seams to the host OS: counters, packages, usage, policy, settings, notifications.

mod counters;
mod foreground;
mod launcher;
mod notifier;
mod packages;
mod policy;
mod process;

#[cfg(test)]
pub mod fakes;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::error::{GuardError, GuardResult};
use crate::models::Traffic;

pub use counters::ProcNetCounters;
pub use foreground::{CommandForegroundUsage, NoForegroundUsage};
pub use launcher::CommandLauncher;
#[allow(unused_imports)]
pub use notifier::{Channel, CommandNotifier, LogNotifier, Notification};
pub use packages::{InstalledPackage, PackagesList};
#[allow(unused_imports)]
pub use policy::{NetpolicyCommand, PolicyCapability, UidPolicy, POLICY_REJECT_METERED_BACKGROUND};


/// Cumulative byte counters since boot.
pub trait TrafficCounters: Send + Sync {
    /// Device-wide mobile traffic.
    fn mobile_totals(&self) -> GuardResult<Traffic>;

    /// Mobile traffic keyed by UID.
    fn uid_totals(&self) -> GuardResult<HashMap<u32, Traffic>>;
}


pub trait PackageSource: Send + Sync {
    fn installed_packages(&self) -> GuardResult<Vec<InstalledPackage>>;
}


pub trait ForegroundUsage: Send + Sync {
    /// Package names last used inside `(start, end]`.
    fn apps_used_between(&self, start: DateTime<Utc>, end: DateTime<Utc>)
        -> GuardResult<Vec<String>>;
}


pub trait SettingsLauncher: Send + Sync {
    /// Success means the screen was opened, not that data changed state.
    fn open_mobile_data_settings(&self) -> GuardResult<()>;
}


/// Best-effort delivery; failures are logged by the implementation.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}


/// Every host seam the pipeline needs, wired from settings.
pub struct Platform {
    pub counters: Arc<dyn TrafficCounters>,
    pub packages: Arc<dyn PackageSource>,
    pub foreground: Arc<dyn ForegroundUsage>,
    pub policy: PolicyCapability,
    pub launcher: Arc<dyn SettingsLauncher>,
    pub notifier: Arc<dyn Notifier>,
}


impl Platform {
    pub fn from_settings(settings: &Settings) -> GuardResult<Self> {
        let platform = &settings.platform;
        let interfaces = settings
            .mobile_interface_pattern()
            .map_err(|e| GuardError::Config {
                details: format!("{e:#}"),
            })?;

        let foreground: Arc<dyn ForegroundUsage> = if platform.foreground_command.is_empty() {
            Arc::new(NoForegroundUsage)
        } else {
            Arc::new(CommandForegroundUsage::new(platform.foreground_command.clone()))
        };
        let notifier: Arc<dyn Notifier> = if platform.notify_command.is_empty() {
            Arc::new(LogNotifier)
        } else {
            Arc::new(CommandNotifier::new(platform.notify_command.clone()))
        };

        Ok(Self {
            counters: Arc::new(ProcNetCounters::new(
                platform.proc_net_dev.clone(),
                platform.uid_stats.clone(),
                interfaces,
            )),
            packages: Arc::new(PackagesList::new(platform.packages_list.clone())),
            foreground,
            policy: PolicyCapability::from_command(&platform.netpolicy_command),
            launcher: Arc::new(CommandLauncher::new(platform.settings_command.clone())),
            notifier,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_platform_has_no_policy_capability() {
        let platform = Platform::from_settings(&Settings::default()).unwrap();
        assert!(!platform.policy.is_available());
    }

    #[test]
    fn test_bad_interface_pattern_is_config_error() {
        let mut settings = Settings::default();
        settings.platform.mobile_interfaces = "[".to_string();
        assert!(matches!(
            Platform::from_settings(&settings),
            Err(GuardError::Config { .. })
        ));
    }
}
