//! Application settings, defaults and path constants.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Period;


/// Default refresh interval for the live dashboard (seconds).
pub const DEFAULT_REFRESH_INTERVAL: u64 = 5;

/// Number of days shown in the dashboard's daily breakdown.
pub const DASHBOARD_DAYS: usize = 7;

/// Interval between sampling ticks (seconds).
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 30;

/// Minutes without foreground activity before the device counts as idle.
pub const DEFAULT_IDLE_THRESHOLD_MINUTES: u64 = 5;

/// Delay between screen-off and the disable request (seconds).
pub const DEFAULT_SCREEN_LOCK_DELAY_SECS: u64 = 60;

/// Device-wide daily ceiling that triggers the high-usage alert (MB).
pub const DEFAULT_DAILY_ALERT_MB: u64 = 500;

/// Number of top consumers kept per sample.
pub const TOP_CONSUMER_LIMIT: usize = 10;

/// Samples and toggle history older than this are pruned (days).
pub const DEFAULT_RETENTION_DAYS: u64 = 90;

/// Upper bounds accepted from the config file.
pub const MAX_SAMPLE_INTERVAL_SECS: u64 = 86_400;
pub const MAX_IDLE_THRESHOLD_MINUTES: u64 = 10_080;
pub const MAX_SCREEN_LOCK_DELAY_SECS: u64 = 86_400;
pub const MAX_RETENTION_DAYS: u64 = 36_500;

/// Per-app limits used when `limit set` omits a value (MB).
pub const DEFAULT_APP_DAILY_LIMIT_MB: u64 = 500;
pub const DEFAULT_APP_WEEKLY_LIMIT_MB: u64 = 3_500;
pub const DEFAULT_APP_MONTHLY_LIMIT_MB: u64 = 15_000;

const APP_DIR: &str = "mobile-data-guard";


/// Full configuration model, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub monitor: MonitorSettings,
    pub limits: LimitDefaults,
    pub platform: PlatformSettings,
    pub storage: StorageSettings,
}


/// Tick cadence and policy thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorSettings {
    pub sample_interval_secs: u64,
    /// Period tag written on samples taken by the daemon.
    pub sample_period: Period,
    pub idle_threshold_minutes: u64,
    pub screen_lock_delay_secs: u64,
    pub daily_alert_mb: u64,
    pub top_consumers: usize,
    pub retention_days: u64,
    /// Alert when a sampled app exceeds its configured daily limit.
    pub app_limit_alerts: bool,
}


impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            sample_period: Period::Daily,
            idle_threshold_minutes: DEFAULT_IDLE_THRESHOLD_MINUTES,
            screen_lock_delay_secs: DEFAULT_SCREEN_LOCK_DELAY_SECS,
            daily_alert_mb: DEFAULT_DAILY_ALERT_MB,
            top_consumers: TOP_CONSUMER_LIMIT,
            retention_days: DEFAULT_RETENTION_DAYS,
            app_limit_alerts: true,
        }
    }
}


/// Values `limit set` falls back to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitDefaults {
    pub daily_mb: u64,
    pub weekly_mb: u64,
    pub monthly_mb: u64,
}


impl Default for LimitDefaults {
    fn default() -> Self {
        Self {
            daily_mb: DEFAULT_APP_DAILY_LIMIT_MB,
            weekly_mb: DEFAULT_APP_WEEKLY_LIMIT_MB,
            monthly_mb: DEFAULT_APP_MONTHLY_LIMIT_MB,
        }
    }
}


/// Where the OS exposes counters and which commands reach system services.
///
/// An empty command list disables the corresponding capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlatformSettings {
    pub proc_net_dev: PathBuf,
    pub uid_stats: PathBuf,
    pub packages_list: PathBuf,
    /// Regex matched against interface names to select mobile links.
    pub mobile_interfaces: String,
    /// Prints `<package> <last_used_epoch_ms>` lines.
    pub foreground_command: Vec<String>,
    /// Base command for the per-UID background policy, e.g. `cmd netpolicy`.
    pub netpolicy_command: Vec<String>,
    pub settings_command: Vec<String>,
    /// Receives title and body as the last two arguments.
    pub notify_command: Vec<String>,
}


impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            proc_net_dev: PathBuf::from("/proc/net/dev"),
            uid_stats: PathBuf::from("/proc/net/xt_qtaguid/stats"),
            packages_list: PathBuf::from("/data/system/packages.list"),
            mobile_interfaces: r"^(rmnet|rmnet_data|ccmni|wwan|pdp|usb_rmnet)\d*$".to_string(),
            foreground_command: Vec::new(),
            netpolicy_command: Vec::new(),
            settings_command: vec![
                "am".to_string(),
                "start".to_string(),
                "-a".to_string(),
                "android.settings.DATA_ROAMING_SETTINGS".to_string(),
            ],
            notify_command: Vec::new(),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the default database location.
    pub db_path: Option<PathBuf>,
}


impl Settings {
    /// Load settings from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        settings.validate()?;

        Ok(settings)
    }

    /// Write these settings as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }

    /// Reject values the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.sample_interval_secs == 0 {
            anyhow::bail!("monitor.sample_interval_secs must be greater than 0");
        }
        if self.monitor.top_consumers == 0 {
            anyhow::bail!("monitor.top_consumers must be greater than 0");
        }

        let bounds = [
            ("sample_interval_secs", self.monitor.sample_interval_secs, MAX_SAMPLE_INTERVAL_SECS),
            ("idle_threshold_minutes", self.monitor.idle_threshold_minutes, MAX_IDLE_THRESHOLD_MINUTES),
            ("screen_lock_delay_secs", self.monitor.screen_lock_delay_secs, MAX_SCREEN_LOCK_DELAY_SECS),
            ("retention_days", self.monitor.retention_days, MAX_RETENTION_DAYS),
        ];
        for (field, value, max) in bounds {
            if value > max {
                anyhow::bail!("monitor.{field} must be at most {max} (got {value})");
            }
        }
        self.mobile_interface_pattern()?;
        Ok(())
    }

    /// Compiled `platform.mobile_interfaces`.
    pub fn mobile_interface_pattern(&self) -> Result<Regex> {
        Regex::new(&self.platform.mobile_interfaces).with_context(|| {
            format!(
                "Invalid platform.mobile_interfaces pattern: {}",
                self.platform.mobile_interfaces
            )
        })
    }

    /// Database location: explicit override or the per-user default.
    pub fn db_path(&self) -> PathBuf {
        self.storage.db_path.clone().unwrap_or_else(get_db_path)
    }
}


/// Get the default config file path.
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}


/// Get the default database path.
pub fn get_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("usage.db")
}
