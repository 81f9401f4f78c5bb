//! Idle and usage-ceiling checks run once per tick.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, Utc};

use crate::error::GuardResult;
use crate::format::{bytes_to_mb, mb_to_bytes, start_of_day};
use crate::models::{ToggleReason, Traffic, UsageSample};
use crate::platform::{ForegroundUsage, Notification};
use crate::storage::Store;


/// An action the executor should carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    DisableMobileData(ToggleReason),
    Notify(Notification),
}


/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub idle: bool,
    /// Device-wide traffic since local midnight.
    pub today: Traffic,
    pub decisions: Vec<Decision>,
}


pub struct PolicyEvaluator {
    store: Arc<Store>,
    foreground: Arc<dyn ForegroundUsage>,
    idle_threshold: Duration,
    daily_ceiling_mb: u64,
    app_limit_alerts: bool,
}


impl PolicyEvaluator {
    pub fn new(
        store: Arc<Store>,
        foreground: Arc<dyn ForegroundUsage>,
        idle_threshold: Duration,
        daily_ceiling_mb: u64,
        app_limit_alerts: bool,
    ) -> Self {
        Self {
            store,
            foreground,
            idle_threshold,
            daily_ceiling_mb,
            app_limit_alerts,
        }
    }

    /// Run both checks. `sample` is the one just taken this tick, if any.
    pub fn evaluate(
        &self,
        now: DateTime<Local>,
        sample: Option<&UsageSample>,
    ) -> GuardResult<Evaluation> {
        let mut decisions = Vec::new();

        let idle = self.is_idle(now.with_timezone(&Utc));
        if idle {
            decisions.push(Decision::DisableMobileData(ToggleReason::Idle));
            decisions.push(Decision::Notify(Notification::idle()));
        }

        let today = self.usage_today(now)?;
        if today.total() > mb_to_bytes(self.daily_ceiling_mb) {
            decisions.push(Decision::Notify(Notification::high_usage(whole_mb(today.total()))));
        }

        if self.app_limit_alerts {
            if let Some(sample) = sample {
                decisions.extend(self.app_alerts(sample)?.into_iter().map(Decision::Notify));
            }
        }

        Ok(Evaluation {
            idle,
            today,
            decisions,
        })
    }

    /// True when no app was in the foreground during `(now - threshold, now]`.
    ///
    /// A source that cannot answer counts as "not idle".
    pub fn is_idle(&self, now: DateTime<Utc>) -> bool {
        let window_start = now
            .checked_sub_signed(self.idle_threshold)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        match self.foreground.apps_used_between(window_start, now) {
            Ok(apps) => apps.is_empty(),
            Err(e) => {
                tracing::debug!(error = %e, "foreground usage unavailable, assuming active");
                false
            }
        }
    }

    /// Sum of deltas timestamped between local midnight and `now`.
    pub fn usage_today(&self, now: DateTime<Local>) -> GuardResult<Traffic> {
        self.store.traffic_in_range(
            start_of_day(&now).with_timezone(&Utc),
            now.with_timezone(&Utc),
        )
    }

    /// One alert per sampled app whose traffic is above its daily limit.
    ///
    /// A zero limit is treated as unset.
    fn app_alerts(&self, sample: &UsageSample) -> GuardResult<Vec<Notification>> {
        let mut alerts = Vec::new();

        for app in &sample.top_consumers {
            let Some(limit) = self.store.app_limit(app.uid)? else {
                continue;
            };
            if limit.daily_limit_mb > 0 && app.total_bytes > mb_to_bytes(limit.daily_limit_mb) {
                alerts.push(Notification::app_high_usage(&app.app_name, whole_mb(app.total_bytes)));
            }
        }

        Ok(alerts)
    }
}


fn whole_mb(bytes: u64) -> u64 {
    bytes_to_mb(bytes).floor() as u64
}
