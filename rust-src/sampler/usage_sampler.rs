//! One sample: read counters, rank consumers, persist the delta.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::GuardResult;
use crate::models::{AppUsage, NewUsageSample, Period, Traffic, UsageSample};
use crate::platform::{InstalledPackage, PackageSource, TrafficCounters};
use crate::storage::Store;


pub struct Sampler {
    store: Arc<Store>,
    counters: Arc<dyn TrafficCounters>,
    packages: Arc<dyn PackageSource>,
    top_k: usize,
}


impl Sampler {
    pub fn new(
        store: Arc<Store>,
        counters: Arc<dyn TrafficCounters>,
        packages: Arc<dyn PackageSource>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            counters,
            packages,
            top_k,
        }
    }

    /// Take a sample stamped with the current wall-clock time.
    pub fn sample(&self, period: Period) -> GuardResult<UsageSample> {
        self.sample_at(Utc::now(), period)
    }

    /// Take a sample stamped with `timestamp`.
    ///
    /// All reads happen before the insert: any read failure leaves the store untouched.
    pub fn sample_at(&self, timestamp: DateTime<Utc>, period: Period) -> GuardResult<UsageSample> {
        let counters = self.counters.mobile_totals()?;
        let top_consumers = self.top_consumers()?;

        let delta = match self.store.latest_usage()? {
            Some(previous) => counters.since(&previous.counters),
            None => counters,
        };

        let sample = self.store.insert_usage(NewUsageSample {
            timestamp,
            delta,
            counters,
            top_consumers,
            period,
        })?;

        tracing::debug!(
            id = sample.id,
            tx = delta.tx_bytes,
            rx = delta.rx_bytes,
            apps = sample.top_consumers.len(),
            "usage sample recorded"
        );
        Ok(sample)
    }

    /// Current per-app cumulative traffic, largest first.
    pub fn top_consumers(&self) -> GuardResult<Vec<AppUsage>> {
        let packages = self.packages.installed_packages()?;
        let per_uid = self.counters.uid_totals()?;
        Ok(rank_consumers(&packages, &per_uid, self.top_k))
    }
}


/// Rank packages by cumulative traffic of their UID.
///
/// UIDs without traffic are dropped; a UID shared by several packages is
/// reported once under the first package listed. Ties go to the lower UID.
pub fn rank_consumers(
    packages: &[InstalledPackage],
    per_uid: &HashMap<u32, Traffic>,
    limit: usize,
) -> Vec<AppUsage> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<AppUsage> = packages
        .iter()
        .filter(|package| seen.insert(package.uid))
        .filter_map(|package| {
            let traffic = per_uid.get(&package.uid)?;
            (!traffic.is_zero())
                .then(|| AppUsage::new(package.uid, &package.package_name, &package.app_name, *traffic))
        })
        .collect();

    ranked.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes).then(a.uid.cmp(&b.uid)));
    ranked.truncate(limit);
    ranked
}
