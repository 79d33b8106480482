//! Date window computation
//!
//! The upstream publishes one set of reference rates per working day, some time
//! in the afternoon (Central European time). Until `cutoff_hour` UTC has passed
//! we assume today's figures are not out yet and end the window on yesterday.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use std::fmt;

/// Default UTC hour after which today's rates are considered published
pub const DEFAULT_CUTOFF_HOUR: u32 = 14;

/// Default number of calendar days in the window (inclusive)
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Compute the window ending on the latest published date as seen at `now`
    ///
    /// `window_days` is clamped to at least one day.
    pub fn ending_at(now: DateTime<Utc>, cutoff_hour: u32, window_days: u32) -> Self {
        let mut end = now.date_naive();
        if now.hour() < cutoff_hour {
            end -= Duration::days(1);
        }
        let span = i64::from(window_days.max(1)) - 1;
        let start = end - Duration::days(span);
        Self { start, end }
    }

    /// Number of calendar days covered, both ends included
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Path segment understood by the upstream: `YYYY-MM-DD..YYYY-MM-DD`
    pub fn to_path_segment(&self) -> String {
        format!(
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_before_cutoff_ends_yesterday() {
        let w = DateWindow::ending_at(at(2024, 6, 10, 10), DEFAULT_CUTOFF_HOUR, DEFAULT_WINDOW_DAYS);
        assert_eq!(w.end, date(2024, 6, 9));
        assert_eq!(w.start, date(2024, 6, 3));
    }

    #[test]
    fn test_at_cutoff_ends_today() {
        let w = DateWindow::ending_at(at(2024, 6, 10, 14), DEFAULT_CUTOFF_HOUR, DEFAULT_WINDOW_DAYS);
        assert_eq!(w.end, date(2024, 6, 10));
        assert_eq!(w.start, date(2024, 6, 4));
    }

    #[test]
    fn test_one_second_before_cutoff() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 13, 59, 59).unwrap();
        let w = DateWindow::ending_at(now, DEFAULT_CUTOFF_HOUR, DEFAULT_WINDOW_DAYS);
        assert_eq!(w.end, date(2024, 6, 9));
    }

    #[test]
    fn test_window_always_spans_seven_days() {
        for hour in 0..24 {
            let w = DateWindow::ending_at(at(2024, 3, 1, hour), DEFAULT_CUTOFF_HOUR, DEFAULT_WINDOW_DAYS);
            assert_eq!(w.len_days(), 7, "hour {hour}");
            assert_eq!(w.end - w.start, Duration::days(6));
        }
    }

    #[test]
    fn test_crosses_month_and_leap_day() {
        // 2024-03-01 early morning: end falls back to Feb 29th
        let w = DateWindow::ending_at(at(2024, 3, 1, 0), DEFAULT_CUTOFF_HOUR, DEFAULT_WINDOW_DAYS);
        assert_eq!(w.end, date(2024, 2, 29));
        assert_eq!(w.start, date(2024, 2, 23));
    }

    #[test]
    fn test_crosses_year_boundary() {
        let w = DateWindow::ending_at(at(2025, 1, 1, 9), DEFAULT_CUTOFF_HOUR, DEFAULT_WINDOW_DAYS);
        assert_eq!(w.end, date(2024, 12, 31));
        assert_eq!(w.start, date(2024, 12, 25));
    }

    #[test]
    fn test_custom_cutoff_and_length() {
        let w = DateWindow::ending_at(at(2024, 6, 10, 10), 0, 3);
        assert_eq!(w.end, date(2024, 6, 10));
        assert_eq!(w.start, date(2024, 6, 8));

        // zero-length windows collapse to a single day
        let w = DateWindow::ending_at(at(2024, 6, 10, 10), 0, 0);
        assert_eq!(w.start, w.end);
    }

    #[test]
    fn test_path_segment_format() {
        let w = DateWindow {
            start: date(2024, 6, 3),
            end: date(2024, 6, 9),
        };
        assert_eq!(w.to_path_segment(), "2024-06-03..2024-06-09");
        assert_eq!(w.to_string(), "2024-06-03 to 2024-06-09");
    }
}
