//! Human-readable formatting for byte counts and calendar boundaries.

mod bytes;
mod calendar;

pub use bytes::{bytes_to_mb, format_bytes, format_bytes_short, mb_to_bytes, BYTES_PER_MB};
pub use calendar::{
    end_of_day,
    format_date,
    format_date_time,
    format_time,
    start_of_day,
    start_of_month,
    start_of_week,
};
