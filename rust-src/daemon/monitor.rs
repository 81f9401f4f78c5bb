//! The per-tick pipeline: sample, evaluate, act.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

use crate::actions::{ActionExecutor, ScreenLockTimer, TimerPhase};
use crate::config::{
    MonitorSettings, MAX_IDLE_THRESHOLD_MINUTES, MAX_RETENTION_DAYS, MAX_SCREEN_LOCK_DELAY_SECS,
};
use crate::error::{GuardError, GuardResult};
use crate::models::{Period, ToggleReason, UsageSample};
use crate::platform::{Notification, Platform};
use crate::policy::{Evaluation, PolicyEvaluator};
use crate::sampler::Sampler;
use crate::storage::Store;


/// What one tick did.
#[derive(Debug)]
pub struct TickReport {
    pub sample: UsageSample,
    pub evaluation: Evaluation,
    pub pruned: usize,
}


/// Owns the pipeline components and the screen-lock timer.
pub struct Monitor {
    store: Arc<Store>,
    sampler: Sampler,
    evaluator: PolicyEvaluator,
    executor: Arc<ActionExecutor>,
    screen_lock: ScreenLockTimer,
    period: Period,
    retention: Option<Duration>,
    last_prune: Option<NaiveDate>,
}


impl Monitor {
    /// Wire the pipeline. Fails on durations outside the accepted config range.
    pub fn new(store: Arc<Store>, platform: Platform, settings: &MonitorSettings) -> GuardResult<Self> {
        let idle_threshold = Duration::minutes(bounded(
            "idle_threshold_minutes",
            settings.idle_threshold_minutes,
            MAX_IDLE_THRESHOLD_MINUTES,
        )?);
        let retention = match bounded("retention_days", settings.retention_days, MAX_RETENTION_DAYS)? {
            0 => None,
            days => Some(Duration::days(days)),
        };
        bounded(
            "screen_lock_delay_secs",
            settings.screen_lock_delay_secs,
            MAX_SCREEN_LOCK_DELAY_SECS,
        )?;

        let sampler = Sampler::new(
            Arc::clone(&store),
            platform.counters,
            platform.packages,
            settings.top_consumers,
        );
        let evaluator = PolicyEvaluator::new(
            Arc::clone(&store),
            platform.foreground,
            idle_threshold,
            settings.daily_alert_mb,
            settings.app_limit_alerts,
        );
        let executor = Arc::new(ActionExecutor::new(
            Arc::clone(&store),
            platform.policy,
            platform.launcher,
            platform.notifier,
        ));

        let timer_executor = Arc::clone(&executor);
        let screen_lock = ScreenLockTimer::new(
            std::time::Duration::from_secs(settings.screen_lock_delay_secs),
            move || {
                if let Err(e) = timer_executor.set_mobile_data(false, ToggleReason::ScreenLock) {
                    tracing::warn!(error = %e, "screen-lock disable request failed");
                }
            },
        );

        Ok(Self {
            store,
            sampler,
            evaluator,
            executor,
            screen_lock,
            period: settings.sample_period,
            retention,
            last_prune: None,
        })
    }

    /// Post the ongoing status notification.
    pub fn announce(&self) {
        self.executor.notify(&Notification::status());
    }

    /// Run one tick at `now`. Nothing after a failed sample runs.
    pub fn run_tick(&mut self, now: DateTime<Local>) -> GuardResult<TickReport> {
        let pruned = self.prune_if_due(now)?;

        let sample = self.sampler.sample_at(now.with_timezone(&Utc), self.period)?;
        let evaluation = self.evaluator.evaluate(now, Some(&sample))?;
        self.executor.apply(&evaluation.decisions);

        tracing::debug!(
            sample = sample.id,
            today_bytes = evaluation.today.total(),
            idle = evaluation.idle,
            decisions = evaluation.decisions.len(),
            "tick complete"
        );

        Ok(TickReport {
            sample,
            evaluation,
            pruned,
        })
    }

    pub fn screen_off(&self) {
        tracing::debug!("screen off");
        self.screen_lock.screen_off();
    }

    pub fn screen_on(&self) {
        tracing::debug!("screen on");
        self.screen_lock.screen_on();
    }

    #[allow(dead_code)]
    pub fn screen_lock_phase(&self) -> TimerPhase {
        self.screen_lock.phase()
    }

    /// Prune once per local calendar day.
    fn prune_if_due(&mut self, now: DateTime<Local>) -> GuardResult<usize> {
        let Some(retention) = self.retention else {
            return Ok(0);
        };
        let today = now.date_naive();
        if self.last_prune == Some(today) {
            return Ok(0);
        }

        let cutoff = now
            .checked_sub_signed(retention)
            .ok_or_else(|| GuardError::Config {
                details: format!("retention of {} days reaches before the calendar", retention.num_days()),
            })?
            .with_timezone(&Utc);
        let removed = self.store.delete_usage_before(cutoff)?;
        let removed_toggles = self.store.delete_toggle_history_before(cutoff)?;
        self.last_prune = Some(today);

        if removed > 0 || removed_toggles > 0 {
            tracing::info!(samples = removed, toggles = removed_toggles, "retention pruning");
        }
        Ok(removed)
    }
}


/// `value` as an i64, rejected above `max`.
fn bounded(field: &str, value: u64, max: u64) -> GuardResult<i64> {
    if value > max {
        return Err(GuardError::Config {
            details: format!("monitor.{field} must be at most {max} (got {value})"),
        });
    }
    i64::try_from(value).map_err(|_| GuardError::Config {
        details: format!("monitor.{field} out of range: {value}"),
    })
}
