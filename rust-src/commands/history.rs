//! Toggle history command.

use anyhow::Result;
use chrono::Local;

use crate::commands::Context;
use crate::format::{format_date, format_time};


/// Print the most recent toggle requests, newest first.
pub fn run(ctx: &Context, limit: usize) -> Result<()> {
    let store = ctx.open_store()?;
    let entries = store.toggle_history(limit)?;

    if entries.is_empty() {
        println!("No toggle history recorded.");
        return Ok(());
    }

    println!("\x1b[1m{:<10} {:<8} {:<9} {}\x1b[0m", "Date", "Time", "State", "Reason");
    for entry in &entries {
        let at = entry.timestamp.with_timezone(&Local);
        let state = if entry.enabled { "\x1b[32menabled \x1b[0m" } else { "\x1b[31mdisabled\x1b[0m" };
        println!("{:<10} {:<8} {} {}", format_date(&at), format_time(&at), state, entry.reason);
    }

    Ok(())
}
