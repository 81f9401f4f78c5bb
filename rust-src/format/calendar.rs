//! Calendar boundaries and date strings.
//!
//! Boundaries are computed in the timezone of the input, so callers pass
//! `DateTime<Local>` to bucket by the device's wall clock.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};


/// Midnight at the start of the day containing `t`.
pub fn start_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    localize(&t.timezone(), t.date_naive().and_time(NaiveTime::MIN))
}


/// Last millisecond (23:59:59.999) of the day containing `t`.
pub fn end_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let next_midnight = t.date_naive().and_time(NaiveTime::MIN) + Duration::days(1);
    localize(&t.timezone(), next_midnight - Duration::milliseconds(1))
}


/// Monday 00:00:00 of the week containing `t`.
pub fn start_of_week<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive();
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    localize(&t.timezone(), monday.and_time(NaiveTime::MIN))
}


/// Day 1, 00:00:00 of the month containing `t`.
pub fn start_of_month<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive();
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
    localize(&t.timezone(), first.and_time(NaiveTime::MIN))
}


/// `dd/MM/yyyy`
pub fn format_date<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    t.format("%d/%m/%Y").to_string()
}


/// `HH:mm:ss`
pub fn format_time<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    t.format("%H:%M:%S").to_string()
}


/// `dd/MM/yyyy HH:mm:ss`
pub fn format_date_time<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    t.format("%d/%m/%Y %H:%M:%S").to_string()
}


/// Resolve a wall-clock time in `tz`, taking the earlier instant when a DST
/// fold makes it ambiguous and the first valid instant after a DST gap.
fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
    }

    fn assert_midnight<Tz: TimeZone>(t: &DateTime<Tz>) {
        assert_eq!(t.hour(), 0);
        assert_eq!(t.minute(), 0);
        assert_eq!(t.second(), 0);
        assert_eq!(t.timestamp_subsec_millis(), 0);
    }

    #[test]
    fn test_start_of_day() {
        let t = at(2024, 3, 14, 15, 9, 26);
        let start = start_of_day(&t);
        assert_midnight(&start);
        assert_eq!(start.date_naive(), t.date_naive());
    }

    #[test]
    fn test_end_of_day() {
        let end = end_of_day(&at(2024, 3, 14, 1, 0, 0));
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);
        assert_eq!(end.day(), 14);
    }

    #[test]
    fn test_start_of_week_lands_on_monday() {
        // Thursday, Sunday and Monday itself
        for day in [14, 17, 11] {
            let start = start_of_week(&at(2024, 3, day, 12, 30, 0));
            assert_eq!(start.weekday(), Weekday::Mon);
            assert_eq!(start.day(), 11);
            assert_midnight(&start);
        }
    }

    #[test]
    fn test_start_of_week_crosses_month() {
        let start = start_of_week(&at(2024, 3, 1, 8, 0, 0));
        assert_eq!((start.month(), start.day()), (2, 26));
    }

    #[test]
    fn test_start_of_month() {
        let start = start_of_month(&at(2024, 2, 29, 23, 59, 59));
        assert_eq!(start.day(), 1);
        assert_eq!(start.month(), 2);
        assert_midnight(&start);
    }

    #[test]
    fn test_boundaries_with_local_clock() {
        let now = chrono::Local::now();
        assert_eq!(start_of_month(&now).day(), 1);
        assert_eq!(start_of_week(&now).weekday(), Weekday::Mon);
        assert!(start_of_day(&now) <= now);
    }

    #[test]
    fn test_date_strings() {
        let t = at(2024, 3, 4, 5, 6, 7);
        assert_eq!(format_date(&t), "04/03/2024");
        assert_eq!(format_time(&t), "05:06:07");
        assert_eq!(format_date_time(&t), "04/03/2024 05:06:07");
    }
}
