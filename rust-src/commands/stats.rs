//! Stats command - summary of everything in the store.

use anyhow::Result;
use chrono::Local;

use crate::commands::Context;
use crate::format::{format_bytes, format_date};


/// Run the stats command.
pub fn run(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let stats = store.stats()?;

    if stats.total_samples == 0 {
        println!("No samples recorded. Run 'mdg sample' or 'mdg daemon' to start tracking.");
        return Ok(());
    }

    println!("\n{}", "=".repeat(60));
    println!("{:^60}", "Mobile Data Usage Statistics");
    println!("{}\n", "=".repeat(60));

    println!("SUMMARY");
    println!("{}", "-".repeat(40));
    println!("  Samples:             {:>15}", stats.total_samples);
    println!("  Sent:                {:>15}", format_bytes(stats.total_traffic.tx_bytes));
    println!("  Received:            {:>15}", format_bytes(stats.total_traffic.rx_bytes));
    println!("  Total:               {:>15}", format_bytes(stats.total_traffic.total()));

    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!(
            "  Date Range:          {} to {}",
            format_date(&oldest.with_timezone(&Local)),
            format_date(&newest.with_timezone(&Local))
        );
    }

    println!("\nCONTROLS");
    println!("{}", "-".repeat(40));
    println!("  Blocked Apps:        {:>15}", stats.blocked_apps);
    println!("  App Limits:          {:>15}", stats.app_limits);
    println!("  Toggle Requests:     {:>15}", stats.toggle_entries);

    println!("\n\x1b[2mDatabase: {}\x1b[0m\n", ctx.db_path.display());

    Ok(())
}
