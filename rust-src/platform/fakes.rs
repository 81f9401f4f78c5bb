//! In-memory stand-ins for the host seams.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::error::{GuardError, GuardResult};
use crate::models::Traffic;

use super::{
    ForegroundUsage, InstalledPackage, Notification, Notifier, PackageSource, SettingsLauncher,
    TrafficCounters, UidPolicy,
};


#[derive(Clone, Default)]
pub struct FakeCounters {
    totals: Arc<Mutex<Traffic>>,
    per_uid: Arc<Mutex<HashMap<u32, Traffic>>>,
    failing: Arc<Mutex<bool>>,
}


impl FakeCounters {
    pub fn set_totals(&self, tx_bytes: u64, rx_bytes: u64) {
        *self.totals.lock() = Traffic::new(tx_bytes, rx_bytes);
    }

    pub fn set_uid(&self, uid: u32, tx_bytes: u64, rx_bytes: u64) {
        self.per_uid.lock().insert(uid, Traffic::new(tx_bytes, rx_bytes));
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    fn check(&self) -> GuardResult<()> {
        if *self.failing.lock() {
            return Err(GuardError::CounterRead {
                path: "fake".into(),
                details: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}


impl TrafficCounters for FakeCounters {
    fn mobile_totals(&self) -> GuardResult<Traffic> {
        self.check()?;
        Ok(*self.totals.lock())
    }

    fn uid_totals(&self) -> GuardResult<HashMap<u32, Traffic>> {
        self.check()?;
        Ok(self.per_uid.lock().clone())
    }
}


#[derive(Clone, Default)]
pub struct FakePackages {
    packages: Arc<Mutex<Vec<InstalledPackage>>>,
}


impl FakePackages {
    pub fn add(&self, uid: u32, package_name: &str, app_name: &str) {
        self.packages.lock().push(InstalledPackage {
            uid,
            package_name: package_name.to_string(),
            app_name: app_name.to_string(),
        });
    }
}


impl PackageSource for FakePackages {
    fn installed_packages(&self) -> GuardResult<Vec<InstalledPackage>> {
        Ok(self.packages.lock().clone())
    }
}


/// Foreground history as `(package, last_used)` pairs; `None` means the query fails.
#[derive(Clone, Default)]
pub struct FakeForeground {
    history: Arc<Mutex<Option<Vec<(String, DateTime<Utc>)>>>>,
}


impl FakeForeground {
    pub fn with_history(history: Vec<(&str, DateTime<Utc>)>) -> Self {
        let history = history
            .into_iter()
            .map(|(package, at)| (package.to_string(), at))
            .collect();
        Self {
            history: Arc::new(Mutex::new(Some(history))),
        }
    }
}


impl ForegroundUsage for FakeForeground {
    fn apps_used_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GuardResult<Vec<String>> {
        let history = self.history.lock();
        let Some(history) = history.as_ref() else {
            return Err(GuardError::ForegroundQuery {
                details: "no usage access".to_string(),
            });
        };
        Ok(history
            .iter()
            .filter(|(_, at)| *at > start && *at <= end)
            .map(|(package, _)| package.clone())
            .collect())
    }
}


#[derive(Clone, Default)]
pub struct FakePolicy {
    table: Arc<Mutex<HashMap<u32, u32>>>,
    denied: Arc<Mutex<bool>>,
}


impl FakePolicy {
    pub fn set_denied(&self, denied: bool) {
        *self.denied.lock() = denied;
    }

    pub fn policy_of(&self, uid: u32) -> u32 {
        self.table.lock().get(&uid).copied().unwrap_or(0)
    }
}


impl UidPolicy for FakePolicy {
    fn uid_policy(&self, uid: u32) -> GuardResult<u32> {
        Ok(self.policy_of(uid))
    }

    fn set_uid_policy(&self, uid: u32, policy: u32) -> GuardResult<()> {
        if *self.denied.lock() {
            return Err(GuardError::PolicyDenied {
                uid,
                details: "permission denied".to_string(),
            });
        }
        self.table.lock().insert(uid, policy);
        Ok(())
    }
}


#[derive(Clone, Default)]
pub struct FakeLauncher {
    launches: Arc<Mutex<usize>>,
    failing: Arc<Mutex<bool>>,
}


impl FakeLauncher {
    pub fn launches(&self) -> usize {
        *self.launches.lock()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}


impl SettingsLauncher for FakeLauncher {
    fn open_mobile_data_settings(&self) -> GuardResult<()> {
        if *self.failing.lock() {
            return Err(GuardError::SettingsLaunch {
                details: "no activity".to_string(),
            });
        }
        *self.launches.lock() += 1;
        Ok(())
    }
}


#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}


impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    pub fn titled(&self, title: &str) -> usize {
        self.sent.lock().iter().filter(|n| n.title == title).count()
    }
}


impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.sent.lock().push(notification.clone());
    }
}
