//! Per-app limit commands.

use anyhow::Result;

use crate::commands::Context;
use crate::models::AppLimit;


/// Set or replace the limits for one app; missing values come from the config defaults.
pub fn set(
    ctx: &Context,
    uid: u32,
    daily: Option<u64>,
    weekly: Option<u64>,
    monthly: Option<u64>,
) -> Result<()> {
    let store = ctx.open_store()?;
    let defaults = &ctx.settings.limits;

    let package_name = match store.app_limit(uid)? {
        Some(existing) => existing.package_name,
        None => store
            .latest_usage()?
            .and_then(|s| s.top_consumers.into_iter().find(|app| app.uid == uid))
            .map(|app| app.package_name)
            .unwrap_or_else(|| uid.to_string()),
    };

    let limit = AppLimit {
        uid,
        package_name,
        daily_limit_mb: daily.unwrap_or(defaults.daily_mb),
        weekly_limit_mb: weekly.unwrap_or(defaults.weekly_mb),
        monthly_limit_mb: monthly.unwrap_or(defaults.monthly_mb),
    };
    store.upsert_app_limit(&limit)?;

    println!(
        "\x1b[32m+ Limits for {} (uid {}): {} MB/day, {} MB/week, {} MB/month\x1b[0m",
        limit.package_name, uid, limit.daily_limit_mb, limit.weekly_limit_mb, limit.monthly_limit_mb
    );

    Ok(())
}


pub fn remove(ctx: &Context, uid: u32) -> Result<()> {
    let store = ctx.open_store()?;

    if store.delete_app_limit(uid)? {
        println!("\x1b[32m+ Limits removed for uid {uid}\x1b[0m");
    } else {
        println!("\x1b[33mNo limits set for uid {uid}\x1b[0m");
    }

    Ok(())
}


pub fn list(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let limits = store.app_limits()?;

    if limits.is_empty() {
        println!("No app limits configured.");
        return Ok(());
    }

    println!(
        "\x1b[1m{:>6}  {:<36} {:>10} {:>10} {:>10}\x1b[0m",
        "UID", "Package", "Daily MB", "Weekly MB", "Monthly MB"
    );
    for limit in &limits {
        println!(
            "{:>6}  {:<36} {:>10} {:>10} {:>10}",
            limit.uid,
            limit.package_name,
            show_limit(limit.daily_limit_mb),
            show_limit(limit.weekly_limit_mb),
            show_limit(limit.monthly_limit_mb),
        );
    }

    Ok(())
}


/// Zero means unset.
fn show_limit(mb: u64) -> String {
    if mb == 0 {
        "-".to_string()
    } else {
        mb.to_string()
    }
}
