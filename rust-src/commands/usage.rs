//! Usage dashboard command.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Local, Utc};

use crate::aggregation::{aggregate_by_day, get_date_range, period_totals_from_store};
use crate::commands::Context;
use crate::config::{DASHBOARD_DAYS, DEFAULT_REFRESH_INTERVAL};
use crate::format::{end_of_day, start_of_day};
use crate::storage::Store;
use crate::visualization::{render_dashboard, DashboardData};


/// Run the usage command.
pub fn run(ctx: &Context, live: bool) -> Result<()> {
    let store = ctx.open_store()?;

    if live {
        run_live_dashboard(ctx, &store)?;
    } else {
        display_dashboard(ctx, &store, false)?;
    }

    Ok(())
}


/// Run dashboard with auto-refresh.
fn run_live_dashboard(ctx: &Context, store: &Store) -> Result<()> {
    println!(
        "Auto-refreshing every {} seconds. Press Ctrl+C to exit.\n",
        DEFAULT_REFRESH_INTERVAL
    );

    loop {
        display_dashboard(ctx, store, true)?;
        thread::sleep(Duration::from_secs(DEFAULT_REFRESH_INTERVAL));
    }
}


/// Display the dashboard once.
fn display_dashboard(ctx: &Context, store: &Store, clear_screen: bool) -> Result<()> {
    let now = Local::now();
    let totals = period_totals_from_store(store, &now)?;

    let first_day = start_of_day(&(now - ChronoDuration::days(DASHBOARD_DAYS as i64 - 1)));
    let last_day = end_of_day(&now);
    let recent = store.usage_in_range(first_day.with_timezone(&Utc), last_day.with_timezone(&Utc))?;
    let mut by_day = aggregate_by_day(&recent);
    let daily: Vec<_> = get_date_range(now.date_naive(), DASHBOARD_DAYS)
        .into_iter()
        .map(|date| (date, by_day.remove(&date)))
        .collect();

    let latest = store.latest_usage()?;
    let blocked: HashSet<u32> = store.blocked_apps()?.into_iter().map(|app| app.uid).collect();

    render_dashboard(
        &DashboardData {
            totals,
            daily: &daily,
            top_consumers: latest.as_ref().map(|s| s.top_consumers.as_slice()).unwrap_or(&[]),
            blocked: &blocked,
            daily_ceiling_mb: ctx.settings.monitor.daily_alert_mb,
            last_sample: latest.as_ref().map(|s| s.timestamp),
        },
        clear_screen,
    );

    Ok(())
}
