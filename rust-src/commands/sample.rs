//! Sample command - take one usage sample now.

use anyhow::{Context as _, Result};

use crate::commands::Context;
use crate::format::format_bytes;
use crate::models::Period;
use crate::sampler::Sampler;


/// Run the sample command.
pub fn run(ctx: &Context, period: Option<Period>) -> Result<()> {
    let store = ctx.open_store()?;
    let platform = ctx.platform()?;
    let period = period.unwrap_or(ctx.settings.monitor.sample_period);

    let sampler = Sampler::new(
        store,
        platform.counters,
        platform.packages,
        ctx.settings.monitor.top_consumers,
    );
    let sample = sampler.sample(period).context("Failed to sample usage")?;

    println!("\x1b[32m+ Sample #{} recorded ({})\x1b[0m", sample.id, sample.period);
    println!("  Sent:      {:>12}", format_bytes(sample.delta.tx_bytes));
    println!("  Received:  {:>12}", format_bytes(sample.delta.rx_bytes));
    println!("  Total:     {:>12}", format_bytes(sample.total_bytes()));
    println!("  Apps:      {:>12}", sample.top_consumers.len());

    Ok(())
}
