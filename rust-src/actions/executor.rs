//! Applies block, toggle and notification requests.

use std::sync::Arc;

use chrono::Utc;

use crate::error::GuardResult;
use crate::models::{BlockedApp, ToggleHistoryEntry, ToggleReason};
use crate::platform::{
    Notification, Notifier, PolicyCapability, SettingsLauncher, POLICY_REJECT_METERED_BACKGROUND,
};
use crate::policy::Decision;
use crate::storage::Store;


pub struct ActionExecutor {
    store: Arc<Store>,
    policy: PolicyCapability,
    launcher: Arc<dyn SettingsLauncher>,
    notifier: Arc<dyn Notifier>,
}


impl ActionExecutor {
    pub fn new(
        store: Arc<Store>,
        policy: PolicyCapability,
        launcher: Arc<dyn SettingsLauncher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            policy,
            launcher,
            notifier,
        }
    }

    /// Block or unblock metered background data for a UID.
    ///
    /// The policy change is best-effort; the blocked-app row is written or
    /// removed either way. Returns whether the policy change went through.
    pub fn set_app_blocked(
        &self,
        uid: u32,
        package_name: &str,
        app_name: &str,
        blocked: bool,
    ) -> GuardResult<bool> {
        let enforced = match self
            .policy
            .update_flag(uid, POLICY_REJECT_METERED_BACKGROUND, blocked)
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(uid, blocked, error = %e, "background policy not applied");
                false
            }
        };

        if blocked {
            self.store.block_app(&BlockedApp {
                uid,
                package_name: package_name.to_string(),
                app_name: app_name.to_string(),
                blocked_at: Utc::now(),
                enforced,
            })?;
        } else {
            self.store.unblock_app(uid)?;
        }

        tracing::info!(uid, package = package_name, blocked, enforced, "app block state updated");
        Ok(enforced)
    }

    /// Request a mobile data state change by opening the settings screen.
    ///
    /// History is appended only when the screen was opened.
    pub fn set_mobile_data(
        &self,
        enabled: bool,
        reason: ToggleReason,
    ) -> GuardResult<ToggleHistoryEntry> {
        self.launcher.open_mobile_data_settings()?;
        let entry = self.store.insert_toggle(Utc::now(), enabled, reason)?;

        tracing::info!(enabled, reason = %reason, "mobile data settings opened");
        Ok(entry)
    }

    pub fn notify(&self, notification: &Notification) {
        self.notifier.notify(notification);
    }

    /// Carry out evaluator decisions in order; a failed toggle is logged and skipped.
    pub fn apply(&self, decisions: &[Decision]) {
        for decision in decisions {
            match decision {
                Decision::DisableMobileData(reason) => {
                    if let Err(e) = self.set_mobile_data(false, *reason) {
                        tracing::warn!(reason = %reason, error = %e, "disable request failed");
                    }
                }
                Decision::Notify(notification) => self.notify(notification),
            }
        }
    }
}
