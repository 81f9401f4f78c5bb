//! Block and unblock commands.

use anyhow::{Context as _, Result};

use crate::commands::Context;
use crate::storage::Store;


/// Run the block or unblock command.
pub fn run(ctx: &Context, uid: u32, blocked: bool) -> Result<()> {
    let store = ctx.open_store()?;
    let (package_name, app_name) = resolve_names(ctx, &store, uid);

    let executor = ctx.executor(&store)?;
    let enforced = executor
        .set_app_blocked(uid, &package_name, &app_name, blocked)
        .with_context(|| format!("Failed to update block state for uid {uid}"))?;

    let verb = if blocked { "Blocked" } else { "Unblocked" };
    println!("\x1b[32m+ {verb} background data for {app_name} (uid {uid})\x1b[0m");

    if !enforced {
        println!("\x1b[33m! Network policy not applied; the change is recorded only\x1b[0m");
    }

    Ok(())
}


/// Package and app name for `uid`: installed packages first, then the
/// latest sample, then the uid itself.
fn resolve_names(ctx: &Context, store: &Store, uid: u32) -> (String, String) {
    let installed = ctx
        .platform()
        .ok()
        .and_then(|platform| platform.packages.installed_packages().ok())
        .and_then(|packages| packages.into_iter().find(|p| p.uid == uid));
    if let Some(package) = installed {
        return (package.package_name, package.app_name);
    }

    let sampled = store
        .latest_usage()
        .ok()
        .flatten()
        .and_then(|sample| sample.top_consumers.into_iter().find(|app| app.uid == uid));
    if let Some(app) = sampled {
        return (app.package_name, app.app_name);
    }

    (uid.to_string(), uid.to_string())
}
