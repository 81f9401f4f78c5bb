//! Foreground app usage, used to decide whether the device is idle.

use std::process::Command;

use chrono::{DateTime, Utc};

use crate::error::{GuardError, GuardResult};

use super::ForegroundUsage;


/// Runs an external command printing `<package> <last_used_epoch_ms>` lines.
pub struct CommandForegroundUsage {
    command: Vec<String>,
}


impl CommandForegroundUsage {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}


impl ForegroundUsage for CommandForegroundUsage {
    fn apps_used_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GuardResult<Vec<String>> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| GuardError::ForegroundQuery {
                details: "no command configured".to_string(),
            })?;

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| GuardError::ForegroundQuery {
                details: format!("{program}: {e}"),
            })?;
        if !output.status.success() {
            return Err(GuardError::ForegroundQuery {
                details: format!("{program} exited with {}", output.status),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(apps_in_window(&stdout, start, end))
    }
}


/// Source used when nothing is configured; every query fails.
pub struct NoForegroundUsage;


impl ForegroundUsage for NoForegroundUsage {
    fn apps_used_between(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> GuardResult<Vec<String>> {
        Err(GuardError::ForegroundQuery {
            details: "usage access not configured".to_string(),
        })
    }
}


/// Packages whose last use falls inside `(start, end]`.
///
/// Malformed lines are skipped.
pub(crate) fn apps_in_window(output: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let package = fields.next()?;
            let millis: i64 = fields.next()?.parse().ok()?;
            let used_at = DateTime::from_timestamp_millis(millis)?;
            (used_at > start && used_at <= end).then(|| package.to_string())
        })
        .collect()
}
