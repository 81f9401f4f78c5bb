//! Per-UID network policy, reachable only with elevated privileges.

use std::process::Command;

use crate::error::{GuardError, GuardResult};


/// Policy bit that rejects metered background traffic for a UID.
pub const POLICY_REJECT_METERED_BACKGROUND: u32 = 0x01;


/// Read and write the policy bitfield of one UID.
pub trait UidPolicy: Send + Sync {
    fn uid_policy(&self, uid: u32) -> GuardResult<u32>;
    fn set_uid_policy(&self, uid: u32, policy: u32) -> GuardResult<()>;
}


/// Whether the privileged policy interface can be reached at all.
pub enum PolicyCapability {
    Available(Box<dyn UidPolicy>),
    Unavailable,
}


impl PolicyCapability {
    /// Build from a configured base command; an empty command means unavailable.
    pub fn from_command(command: &[String]) -> Self {
        if command.is_empty() {
            Self::Unavailable
        } else {
            Self::Available(Box::new(NetpolicyCommand::new(command.to_vec())))
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Set or clear `flag` on `uid`, preserving the other bits.
    pub fn update_flag(&self, uid: u32, flag: u32, enabled: bool) -> GuardResult<()> {
        let Self::Available(policy) = self else {
            return Err(GuardError::PolicyUnavailable);
        };

        let current = policy.uid_policy(uid)?;
        let updated = if enabled { current | flag } else { current & !flag };
        if updated == current {
            return Ok(());
        }
        policy.set_uid_policy(uid, updated)
    }
}


/// Drives `cmd netpolicy` (or a compatible wrapper) for the background blacklist.
///
/// Only the reject-metered-background bit is representable.
pub struct NetpolicyCommand {
    base: Vec<String>,
}


impl NetpolicyCommand {
    pub fn new(base: Vec<String>) -> Self {
        Self { base }
    }

    fn run(&self, uid: u32, args: &[&str]) -> GuardResult<String> {
        let (program, base_args) = self
            .base
            .split_first()
            .ok_or(GuardError::PolicyUnavailable)?;

        let output = Command::new(program)
            .args(base_args)
            .args(args)
            .output()
            .map_err(|e| GuardError::PolicyDenied {
                uid,
                details: format!("{program}: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GuardError::PolicyDenied {
                uid,
                details: format!("{program} exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}


impl UidPolicy for NetpolicyCommand {
    fn uid_policy(&self, uid: u32) -> GuardResult<u32> {
        let listing = self.run(uid, &["list", "restrict-background-blacklist"])?;
        if listed_uids(&listing).contains(&uid) {
            Ok(POLICY_REJECT_METERED_BACKGROUND)
        } else {
            Ok(0)
        }
    }

    fn set_uid_policy(&self, uid: u32, policy: u32) -> GuardResult<()> {
        let verb = if policy & POLICY_REJECT_METERED_BACKGROUND != 0 {
            "add"
        } else {
            "remove"
        };
        self.run(uid, &[verb, "restrict-background-blacklist", &uid.to_string()])?;
        Ok(())
    }
}


/// UIDs mentioned in a blacklist listing such as
/// `Restrict background blacklisted UIDs: 10123 10456`.
fn listed_uids(listing: &str) -> Vec<u32> {
    listing
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .filter_map(|token| token.parse().ok())
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct TablePolicy {
        table: Mutex<HashMap<u32, u32>>,
    }

    impl UidPolicy for TablePolicy {
        fn uid_policy(&self, uid: u32) -> GuardResult<u32> {
            Ok(self.table.lock().get(&uid).copied().unwrap_or(0))
        }

        fn set_uid_policy(&self, uid: u32, policy: u32) -> GuardResult<()> {
            self.table.lock().insert(uid, policy);
            Ok(())
        }
    }

    #[test]
    fn test_listed_uids() {
        assert_eq!(
            listed_uids("Restrict background blacklisted UIDs: 10123 10456\n"),
            vec![10123, 10456]
        );
        assert!(listed_uids("none").is_empty());
    }

    #[test]
    fn test_update_flag_preserves_other_bits() {
        let policy = TablePolicy::default();
        policy.table.lock().insert(10_001, 0x04);
        let capability = PolicyCapability::Available(Box::new(policy));

        capability
            .update_flag(10_001, POLICY_REJECT_METERED_BACKGROUND, true)
            .unwrap();
        let PolicyCapability::Available(inner) = &capability else {
            unreachable!()
        };
        assert_eq!(inner.uid_policy(10_001).unwrap(), 0x05);

        capability
            .update_flag(10_001, POLICY_REJECT_METERED_BACKGROUND, false)
            .unwrap();
        assert_eq!(inner.uid_policy(10_001).unwrap(), 0x04);
    }

    #[test]
    fn test_unavailable_capability() {
        let capability = PolicyCapability::from_command(&[]);
        assert!(!capability.is_available());
        assert!(matches!(
            capability.update_flag(1, POLICY_REJECT_METERED_BACKGROUND, true),
            Err(GuardError::PolicyUnavailable)
        ));
    }

    #[test]
    fn test_failing_command_is_denied() {
        let capability =
            PolicyCapability::from_command(&["/nonexistent/netpolicy-binary".to_string()]);
        assert!(capability.is_available());
        assert!(matches!(
            capability.update_flag(7, POLICY_REJECT_METERED_BACKGROUND, true),
            Err(GuardError::PolicyDenied { uid: 7, .. })
        ));
    }
}
