//! Export command - write all samples to CSV.

use std::path::PathBuf;

use anyhow::Result;

use crate::commands::Context;
use crate::visualization::{default_export_path, export_csv_file, open_file};


/// Run the export command.
pub fn run(ctx: &Context, output: Option<PathBuf>, should_open: bool) -> Result<()> {
    let store = ctx.open_store()?;
    let samples = store.all_usage()?;

    if samples.is_empty() {
        println!("\x1b[33mNo samples recorded yet; exporting header only\x1b[0m");
    }

    let output_path = output.unwrap_or_else(default_export_path);
    export_csv_file(&samples, &output_path)?;

    println!(
        "\x1b[32m+ Exported {} samples to {}\x1b[0m",
        samples.len(),
        output_path.display()
    );

    if should_open {
        open_file(&output_path)?;
    }

    Ok(())
}
