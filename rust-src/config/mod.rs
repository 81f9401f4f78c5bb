//! Configuration and settings for the data guard.

mod settings;

#[allow(unused_imports)]
pub use settings::{
    get_config_path,
    get_db_path,
    LimitDefaults,
    MonitorSettings,
    PlatformSettings,
    Settings,
    StorageSettings,
    DASHBOARD_DAYS,
    DEFAULT_APP_DAILY_LIMIT_MB,
    DEFAULT_APP_MONTHLY_LIMIT_MB,
    DEFAULT_APP_WEEKLY_LIMIT_MB,
    DEFAULT_DAILY_ALERT_MB,
    DEFAULT_IDLE_THRESHOLD_MINUTES,
    DEFAULT_REFRESH_INTERVAL,
    DEFAULT_RETENTION_DAYS,
    DEFAULT_SAMPLE_INTERVAL_SECS,
    DEFAULT_SCREEN_LOCK_DELAY_SECS,
    MAX_IDLE_THRESHOLD_MINUTES,
    MAX_RETENTION_DAYS,
    MAX_SAMPLE_INTERVAL_SECS,
    MAX_SCREEN_LOCK_DELAY_SECS,
    TOP_CONSUMER_LIMIT,
};
