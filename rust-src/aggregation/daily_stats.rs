//! Day/week/month bucketing of usage samples.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::error::GuardResult;
use crate::format::{start_of_day, start_of_month, start_of_week};
use crate::models::{Period, Traffic, UsageSample};
use crate::storage::Store;


/// Traffic for a single local calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub traffic: Traffic,
    pub samples: usize,
}


/// Totals for the windows containing "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodTotals {
    pub today: Traffic,
    pub week: Traffic,
    pub month: Traffic,
}


impl PeriodTotals {
    pub fn for_period(&self, period: Period) -> Traffic {
        match period {
            Period::Daily => self.today,
            Period::Weekly => self.week,
            Period::Monthly => self.month,
        }
    }
}


/// Start of the calendar window `period` that contains `now`.
pub fn window_start<Tz: TimeZone>(period: Period, now: &DateTime<Tz>) -> DateTime<Tz> {
    match period {
        Period::Daily => start_of_day(now),
        Period::Weekly => start_of_week(now),
        Period::Monthly => start_of_month(now),
    }
}


/// Bucket samples into today/this week/this month by timestamp.
///
/// The period tag on each sample is ignored; samples after `now` are not counted.
pub fn period_totals<Tz: TimeZone>(samples: &[UsageSample], now: &DateTime<Tz>) -> PeriodTotals {
    let now_utc = now.with_timezone(&Utc);
    let starts = [Period::Daily, Period::Weekly, Period::Monthly]
        .map(|period| window_start(period, now).with_timezone(&Utc));

    let mut totals = PeriodTotals::default();
    for sample in samples.iter().filter(|s| s.timestamp <= now_utc) {
        let buckets = [&mut totals.today, &mut totals.week, &mut totals.month];
        for (bucket, start) in buckets.into_iter().zip(starts) {
            if sample.timestamp >= start {
                add_into(bucket, &sample.delta);
            }
        }
    }

    totals
}


/// Same as [`period_totals`], summed inside the store.
pub fn period_totals_from_store(store: &Store, now: &DateTime<Local>) -> GuardResult<PeriodTotals> {
    let end = now.with_timezone(&Utc);
    let range = |period| store.traffic_in_range(window_start(period, now).with_timezone(&Utc), end);

    Ok(PeriodTotals {
        today: range(Period::Daily)?,
        week: range(Period::Weekly)?,
        month: range(Period::Monthly)?,
    })
}


/// Aggregate samples by local calendar day.
pub fn aggregate_by_day(samples: &[UsageSample]) -> BTreeMap<NaiveDate, DailyUsage> {
    aggregate_by_day_in(samples, &Local)
}


/// Aggregate samples by calendar day in `tz`.
pub fn aggregate_by_day_in<Tz: TimeZone>(samples: &[UsageSample], tz: &Tz) -> BTreeMap<NaiveDate, DailyUsage> {
    let mut days: BTreeMap<NaiveDate, DailyUsage> = BTreeMap::new();

    for sample in samples {
        let date = sample.timestamp.with_timezone(tz).date_naive();
        let day = days.entry(date).or_insert_with(|| DailyUsage {
            date,
            traffic: Traffic::default(),
            samples: 0,
        });
        add_into(&mut day.traffic, &sample.delta);
        day.samples += 1;
    }

    days
}


/// The last `days` dates ending at `today`, oldest first.
pub fn get_date_range(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    if days == 0 {
        return Vec::new();
    }

    let start_date = today - Duration::days(days as i64 - 1);
    start_date
        .iter_days()
        .take_while(|date| *date <= today)
        .collect()
}


fn add_into(total: &mut Traffic, delta: &Traffic) {
    total.tx_bytes = total.tx_bytes.saturating_add(delta.tx_bytes);
    total.rx_bytes = total.rx_bytes.saturating_add(delta.rx_bytes);
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use crate::models::NewUsageSample;
    use tempfile::TempDir;

    fn sample_at(id: i64, timestamp: DateTime<Utc>, tx: u64, rx: u64, period: Period) -> UsageSample {
        UsageSample {
            id,
            timestamp,
            delta: Traffic::new(tx, rx),
            counters: Traffic::default(),
            top_consumers: Vec::new(),
            period,
        }
    }

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_by_day(&[]).is_empty());
        assert_eq!(period_totals(&[], &Utc::now()), PeriodTotals::default());
    }

    #[test]
    fn test_period_totals_bucket_by_timestamp() {
        // Thursday 2024-03-14 15:00 +02:00
        let now = offset().with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
        let at = |d, h| offset().with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap().with_timezone(&Utc);

        let samples = vec![
            // Last month
            sample_at(1, offset().with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap().with_timezone(&Utc), 1, 1, Period::Daily),
            // This month, previous week
            sample_at(2, at(5, 9), 10, 10, Period::Daily),
            // Monday of this week, tagged monthly; the tag must not matter
            sample_at(3, at(11, 0), 100, 100, Period::Monthly),
            // Today
            sample_at(4, at(14, 1), 1_000, 2_000, Period::Weekly),
            // After now
            sample_at(5, at(14, 16), 50_000, 50_000, Period::Daily),
        ];

        let totals = period_totals(&samples, &now);
        assert_eq!(totals.today, Traffic::new(1_000, 2_000));
        assert_eq!(totals.week, Traffic::new(1_100, 2_100));
        assert_eq!(totals.month, Traffic::new(1_110, 2_110));
        assert_eq!(totals.for_period(Period::Weekly), totals.week);
    }

    #[test]
    fn test_aggregate_by_day() {
        let at = |d, h, m| offset().with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap().with_timezone(&Utc);
        let samples = vec![
            sample_at(1, at(12, 23, 59), 5, 5, Period::Daily),
            // 00:00 local on the 13th is still the 12th in UTC
            sample_at(2, at(13, 0, 0), 5, 5, Period::Daily),
            sample_at(3, at(13, 1, 30), 7, 3, Period::Weekly),
            sample_at(4, at(15, 12, 0), 100, 0, Period::Daily),
        ];

        let days = aggregate_by_day_in(&samples, &offset());
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        assert_eq!(days.keys().copied().collect::<Vec<_>>(), vec![day(12), day(13), day(15)]);

        assert_eq!(
            days[&day(12)],
            DailyUsage { date: day(12), traffic: Traffic::new(5, 5), samples: 1 }
        );
        assert_eq!(
            days[&day(13)],
            DailyUsage { date: day(13), traffic: Traffic::new(12, 8), samples: 2 }
        );
        assert_eq!(
            days[&day(15)],
            DailyUsage { date: day(15), traffic: Traffic::new(100, 0), samples: 1 }
        );
    }

    #[test]
    fn test_get_date_range() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let range = get_date_range(today, 3);
        assert_eq!(
            range,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                today,
            ]
        );
        assert!(get_date_range(today, 0).is_empty());
    }

    #[test]
    fn test_store_totals_match_in_memory_totals() {
        let tmp_dir = TempDir::new().unwrap();
        let store = Store::open(&tmp_dir.path().join("usage.db")).unwrap();
        let now = Local::now();

        for (minutes_ago, tx) in [(1, 100u64), (60 * 24 * 40, 9_000)] {
            store
                .insert_usage(NewUsageSample {
                    timestamp: (now - Duration::minutes(minutes_ago)).with_timezone(&Utc),
                    delta: Traffic::new(tx, 0),
                    counters: Traffic::default(),
                    top_consumers: Vec::new(),
                    period: Period::Daily,
                })
                .unwrap();
        }

        let from_store = period_totals_from_store(&store, &now).unwrap();
        let in_memory = period_totals(&store.all_usage().unwrap(), &now);
        assert_eq!(from_store, in_memory);
        assert_eq!(from_store.month.tx_bytes, from_store.month.total());
    }
}
