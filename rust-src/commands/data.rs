//! Manual mobile data toggle.

use anyhow::{Context as _, Result};

use crate::commands::Context;
use crate::models::ToggleReason;


/// Ask the platform to enable or disable mobile data.
pub fn run(ctx: &Context, enabled: bool) -> Result<()> {
    let store = ctx.open_store()?;
    let executor = ctx.executor(&store)?;

    executor
        .set_mobile_data(enabled, ToggleReason::Manual)
        .context("Failed to open mobile data settings")?;

    let state = if enabled { "enable" } else { "disable" };
    println!("\x1b[32m+ Opened mobile data settings to {state} mobile data\x1b[0m");

    Ok(())
}
