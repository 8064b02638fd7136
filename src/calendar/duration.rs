//! Business duration calculation
//!
//! Measures elapsed time between two wall-clock instants counting only the
//! configured working hours: weekends, holidays and the break window are
//! excluded. Offsets must already be stripped; comparison is purely local.

use super::WorkCalendar;
use chrono::{Duration, NaiveDateTime};

impl WorkCalendar {
    /// Working hours between `start` and `end`.
    ///
    /// Iterates one calendar date at a time from `start` to `end`. A
    /// reversed pair (`start > end`) yields 0.
    pub fn business_duration(&self, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        if start > end {
            tracing::debug!(%start, %end, "Start is after end, business duration is zero");
            return 0.0;
        }

        let hours = self.hours();
        let mut total = Duration::zero();
        let mut cursor = start;

        while cursor.date() <= end.date() {
            let date = cursor.date();

            // Skipped days keep the cursor's time of day
            if !self.is_working_day(date) {
                cursor += Duration::days(1);
                continue;
            }

            let window_start = cursor.max(date.and_time(hours.work_start));
            let window_end = end.min(date.and_time(hours.work_end));
            let break_start = date.and_time(hours.break_start);
            let break_end = date.and_time(hours.break_end);

            if window_start < break_end && window_end > break_start {
                if window_start < break_start {
                    total += break_start - window_start;
                }
                if window_end > break_end {
                    total += window_end - break_end;
                }
            } else if window_start < window_end {
                total += window_end - window_start;
            }

            let Some(next_date) = date.succ_opt() else {
                break;
            };
            cursor = next_date.and_time(hours.work_start);
        }

        match total.num_microseconds() {
            Some(micros) => micros as f64 / 3_600_000_000.0,
            None => total.num_milliseconds() as f64 / 3_600_000.0,
        }
    }

    /// Like [`WorkCalendar::business_duration`], but an unset side yields 0
    pub fn business_duration_opt(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> f64 {
        match (start, end) {
            (Some(start), Some(end)) => self.business_duration(start, end),
            _ => 0.0,
        }
    }
}

/// Round to two decimal places, the precision every reported metric uses
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{HolidaySet, WorkHours};
    use chrono::NaiveDate;

    fn calendar_with(holidays: &[&str]) -> WorkCalendar {
        let hours = WorkHours::parse("10:00", "19:00", "12:00", "13:00").unwrap();
        let holidays: Vec<String> = holidays.iter().map(|s| s.to_string()).collect();
        WorkCalendar::new(hours, HolidaySet::from_dates(&holidays).unwrap()).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    // 2024-06-07 is a Friday, 2024-06-10 a Monday

    #[test]
    fn test_same_instant_is_zero() {
        let calendar = calendar_with(&[]);
        let t = at(2024, 6, 10, 11, 0);
        assert_eq!(calendar.business_duration(t, t), 0.0);
    }

    #[test]
    fn test_morning_span_is_wall_clock() {
        let calendar = calendar_with(&[]);
        let hours = calendar.business_duration(at(2024, 6, 10, 10, 30), at(2024, 6, 10, 11, 45));
        assert_eq!(hours, 1.25);
    }

    #[test]
    fn test_span_across_break_excludes_break() {
        let calendar = calendar_with(&[]);
        let hours = calendar.business_duration(at(2024, 6, 10, 11, 0), at(2024, 6, 10, 14, 0));
        assert_eq!(hours, 2.0);
    }

    #[test]
    fn test_span_inside_break_is_zero() {
        let calendar = calendar_with(&[]);
        let hours = calendar.business_duration(at(2024, 6, 10, 12, 15), at(2024, 6, 10, 12, 45));
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_break_boundaries_do_not_overlap() {
        let calendar = calendar_with(&[]);
        // Ends exactly when the break starts
        assert_eq!(
            calendar.business_duration(at(2024, 6, 10, 11, 0), at(2024, 6, 10, 12, 0)),
            1.0
        );
        // Starts exactly when the break ends
        assert_eq!(
            calendar.business_duration(at(2024, 6, 10, 13, 0), at(2024, 6, 10, 14, 30)),
            1.5
        );
    }

    #[test]
    fn test_full_working_day() {
        let calendar = calendar_with(&[]);
        let hours = calendar.business_duration(at(2024, 6, 10, 8, 0), at(2024, 6, 10, 21, 0));
        assert_eq!(hours, 8.0);
    }

    #[test]
    fn test_start_after_work_end_contributes_nothing_that_day() {
        let calendar = calendar_with(&[]);
        let hours = calendar.business_duration(at(2024, 6, 10, 20, 0), at(2024, 6, 10, 23, 0));
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_friday_evening_to_monday_morning() {
        let calendar = calendar_with(&[]);
        let hours = calendar.business_duration(at(2024, 6, 7, 18, 0), at(2024, 6, 10, 9, 0));
        assert_eq!(hours, 1.0);
    }

    #[test]
    fn test_weekend_only_span_is_zero() {
        let calendar = calendar_with(&[]);
        let hours = calendar.business_duration(at(2024, 6, 8, 10, 0), at(2024, 6, 9, 18, 0));
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_multi_day_span_resumes_at_work_start() {
        let calendar = calendar_with(&[]);
        // Mon 15:00 -> Tue 11:00: 4h on Monday, 1h on Tuesday
        let hours = calendar.business_duration(at(2024, 6, 10, 15, 0), at(2024, 6, 11, 11, 0));
        assert_eq!(hours, 5.0);
    }

    #[test]
    fn test_holiday_contributes_nothing() {
        // Tuesday is a holiday
        let calendar = calendar_with(&["2024-06-11"]);
        let hours = calendar.business_duration(at(2024, 6, 10, 10, 0), at(2024, 6, 12, 19, 0));
        assert_eq!(hours, 16.0);
    }

    #[test]
    fn test_same_day_holiday_is_zero() {
        let calendar = calendar_with(&["2024-06-10"]);
        let hours = calendar.business_duration(at(2024, 6, 10, 10, 0), at(2024, 6, 10, 19, 0));
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_skipped_day_keeps_time_of_day() {
        let calendar = calendar_with(&[]);
        // Saturday 15:00 carries over to Monday 15:00
        let hours = calendar.business_duration(at(2024, 6, 8, 15, 0), at(2024, 6, 10, 19, 0));
        assert_eq!(hours, 4.0);
    }

    #[test]
    fn test_reversed_span_is_zero() {
        let calendar = calendar_with(&[]);
        assert_eq!(
            calendar.business_duration(at(2024, 6, 10, 15, 0), at(2024, 6, 10, 11, 0)),
            0.0
        );
        assert_eq!(
            calendar.business_duration(at(2024, 6, 12, 15, 0), at(2024, 6, 10, 11, 0)),
            0.0
        );
    }

    #[test]
    fn test_unset_side_is_zero() {
        let calendar = calendar_with(&[]);
        let t = at(2024, 6, 10, 11, 0);
        assert_eq!(calendar.business_duration_opt(None, Some(t)), 0.0);
        assert_eq!(calendar.business_duration_opt(Some(t), None), 0.0);
        assert_eq!(
            calendar.business_duration_opt(Some(t), Some(at(2024, 6, 10, 11, 30))),
            0.5
        );
    }

    #[test]
    fn test_sub_millisecond_precision_is_kept() {
        let calendar = calendar_with(&[]);
        let start = at(2024, 6, 10, 10, 0);
        let end = start + Duration::microseconds(1_800);
        let expected = 1_800.0 / 3_600_000_000.0;
        assert!((calendar.business_duration(start, end) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(10.0 / 3.0), 3.33);
    }
}
