//! Fire-and-forget child processes that still get reaped.

use std::io;
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};


/// Spawn `command` and wait for it on a detached thread.
///
/// The caller never blocks on the child, and the child never lingers as a
/// zombie once it exits. The handle yields the exit status; callers that do
/// not care simply drop it.
pub(crate) fn spawn_reaped(command: &mut Command) -> io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command.spawn()?;
    let pid = child.id();

    thread::Builder::new()
        .name("child-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => {
                if !status.success() {
                    tracing::debug!(pid, %status, "child exited unsuccessfully");
                }
                Some(status)
            }
            Err(e) => {
                tracing::warn!(pid, error = %e, "failed to reap child");
                None
            }
        })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_is_waited_for() {
        let handle = spawn_reaped(&mut Command::new("true")).unwrap();
        let status = handle.join().unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }

    #[test]
    fn test_failing_child_reports_status() {
        let handle = spawn_reaped(&mut Command::new("false")).unwrap();
        let status = handle.join().unwrap();
        assert!(status.is_some_and(|s| !s.success()));
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        assert!(spawn_reaped(&mut Command::new("/nonexistent/program")).is_err());
    }
}
