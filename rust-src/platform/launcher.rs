//! Opening the system mobile-data settings screen.

use std::process::Command;

use crate::error::{GuardError, GuardResult};

use super::process::spawn_reaped;
use super::SettingsLauncher;


/// Spawns the configured launch command without waiting for it.
pub struct CommandLauncher {
    command: Vec<String>,
}


impl CommandLauncher {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}


impl SettingsLauncher for CommandLauncher {
    fn open_mobile_data_settings(&self) -> GuardResult<()> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| GuardError::SettingsLaunch {
                details: "no settings command configured".to_string(),
            })?;

        spawn_reaped(Command::new(program).args(args))
            .map(|_| ())
            .map_err(|e| GuardError::SettingsLaunch {
                details: format!("{program}: {e}"),
            })
    }
}
