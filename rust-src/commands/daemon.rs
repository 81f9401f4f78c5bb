//! Daemon command - run the monitor loop in the foreground.

use std::time::Duration;

use anyhow::{Context as _, Result};

use crate::commands::Context;
use crate::daemon::{self, Monitor, SignalHandler};


/// Run the daemon command.
pub fn run(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let platform = ctx.platform()?;
    let monitor_settings = &ctx.settings.monitor;

    tracing::info!(
        db = ?store.path(),
        policy = platform.policy.is_available(),
        "starting mobile data monitor"
    );

    let signals = SignalHandler::new();
    let mut monitor =
        Monitor::new(store, platform, monitor_settings).context("Invalid monitor settings")?;
    daemon::run(
        &mut monitor,
        Duration::from_secs(monitor_settings.sample_interval_secs),
        &signals,
    );

    Ok(())
}
