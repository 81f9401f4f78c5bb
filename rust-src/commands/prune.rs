//! Prune command - drop samples and toggle history older than N days.

use anyhow::{bail, Context as _, Result};
use chrono::{Duration, Utc};

use crate::commands::Context;
use crate::config::MAX_RETENTION_DAYS;


/// Run the prune command.
pub fn run(ctx: &Context, days: Option<u64>) -> Result<()> {
    let days = days.unwrap_or(ctx.settings.monitor.retention_days);
    if days == 0 {
        bail!("Retention must be at least one day");
    }
    if days > MAX_RETENTION_DAYS {
        bail!("Retention must be at most {MAX_RETENTION_DAYS} days (got {days})");
    }

    let cutoff = i64::try_from(days)
        .ok()
        .and_then(Duration::try_days)
        .and_then(|age| Utc::now().checked_sub_signed(age))
        .with_context(|| format!("Retention of {days} days is out of range"))?;

    let store = ctx.open_store()?;
    let samples = store.delete_usage_before(cutoff)?;
    let toggles = store.delete_toggle_history_before(cutoff)?;

    println!(
        "\x1b[32m+ Pruned {samples} samples and {toggles} toggle entries older than {days} days\x1b[0m"
    );

    Ok(())
}
