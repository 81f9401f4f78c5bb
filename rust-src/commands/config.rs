//! Config subcommands.

use anyhow::Result;

use crate::commands::Context;
use crate::config::Settings;


/// Print the effective settings as TOML.
pub fn show(ctx: &Context) -> Result<()> {
    print!("{}", ctx.settings.to_toml()?);
    Ok(())
}


pub fn path(ctx: &Context) -> Result<()> {
    println!("{}", ctx.config_path.display());
    Ok(())
}


/// Write a default config file unless one exists.
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    if ctx.config_path.exists() && !force {
        println!(
            "\x1b[33mConfig already exists at {} (use --force to overwrite)\x1b[0m",
            ctx.config_path.display()
        );
        return Ok(());
    }

    Settings::default().save(&ctx.config_path)?;
    println!("\x1b[32m+ Wrote default config to {}\x1b[0m", ctx.config_path.display());

    Ok(())
}
