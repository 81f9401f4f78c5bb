//! Reset command - wipe every table after backing up the database.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context as _, Result};

use crate::commands::Context;


/// Run the reset command.
pub fn run(ctx: &Context, force: bool) -> Result<()> {
    let db_path = &ctx.db_path;

    if !db_path.exists() {
        println!("\x1b[33mNo database found at {}\x1b[0m", db_path.display());
        return Ok(());
    }

    let size_kb = fs::metadata(db_path)?.len() / 1024;

    println!("\x1b[1m\x1b[36mResetting mobile data guard\x1b[0m\n");
    println!("Database: {}", db_path.display());
    println!("Size: {} KB", size_kb);

    if !force {
        println!("\n\x1b[1m\x1b[31mWARNING: This deletes all samples, blocked apps, limits and toggle history!\x1b[0m");
        println!("\x1b[33mThis action cannot be undone.\x1b[0m\n");

        print!("Type 'delete' to confirm: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "delete" {
            println!("\x1b[33mCancelled\x1b[0m");
            return Ok(());
        }
    }

    let backup_path = db_path.with_extension("db.bak");
    fs::copy(db_path, &backup_path)
        .with_context(|| format!("Failed to back up database to {}", backup_path.display()))?;
    println!("\n\x1b[2mBackup created: {}\x1b[0m", backup_path.display());

    let store = ctx.open_store()?;
    store.clear_all()?;

    println!("\x1b[32m+ All data cleared\x1b[0m");

    Ok(())
}
