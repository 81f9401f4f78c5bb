//! Aggregation layer for usage samples.

mod daily_stats;

#[allow(unused_imports)]
pub use daily_stats::{
    DailyUsage,
    PeriodTotals,
    aggregate_by_day,
    aggregate_by_day_in,
    get_date_range,
    period_totals,
    period_totals_from_store,
    window_start,
};
