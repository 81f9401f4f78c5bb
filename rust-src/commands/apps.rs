//! Apps command - top consumers of the latest sample.

use std::collections::HashSet;

use anyhow::Result;

use crate::commands::Context;
use crate::format::format_date_time;
use crate::visualization::render_top_consumers;


/// Run the apps command.
pub fn run(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;

    let Some(latest) = store.latest_usage()? else {
        println!("No samples yet. Run 'mdg sample' first.");
        return Ok(());
    };

    let blocked: HashSet<u32> = store.blocked_apps()?.into_iter().map(|app| app.uid).collect();

    println!(
        "\x1b[2mSample #{} at {}\x1b[0m",
        latest.id,
        format_date_time(&latest.local_time())
    );
    render_top_consumers(&latest.top_consumers, &blocked);

    println!("\n\x1b[1m{:>6}  {}\x1b[0m", "UID", "Package");
    for app in &latest.top_consumers {
        println!("{:>6}  {}", app.uid, app.package_name);
    }

    Ok(())
}
