//! Work calendar model
//!
//! Holds the configured working window, the lunch break and the holiday
//! predicate. The calendar is built once at startup from configuration and
//! shared by reference with everything that measures business time.

pub mod duration;
pub mod holidays;

pub use holidays::{HolidayCalendar, HolidaySet};

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use std::path::PathBuf;
use thiserror::Error;

const TIME_OF_DAY_FORMAT: &str = "%H:%M";

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Invalid time of day for {field}: '{value}' (expected HH:MM)")]
    InvalidTimeOfDay { field: &'static str, value: String },
    #[error(
        "Invalid work window: expected work_start < break_start < break_end < work_end, \
         got {work_start} / {break_start} / {break_end} / {work_end}"
    )]
    InvalidWindow {
        work_start: NaiveTime,
        break_start: NaiveTime,
        break_end: NaiveTime,
        work_end: NaiveTime,
    },
    #[error("Invalid holiday date: '{value}' (expected YYYY-MM-DD)")]
    InvalidHoliday { value: String },
    #[error("Failed to read holidays file {path}: {source}")]
    HolidayFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The four time-of-day boundaries of a working day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkHours {
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
}

impl WorkHours {
    /// Parse `HH:MM` strings into work hours and validate their ordering
    pub fn parse(
        work_start: &str,
        work_end: &str,
        break_start: &str,
        break_end: &str,
    ) -> Result<Self, CalendarError> {
        let hours = Self {
            work_start: parse_time_of_day("work_start", work_start)?,
            work_end: parse_time_of_day("work_end", work_end)?,
            break_start: parse_time_of_day("break_start", break_start)?,
            break_end: parse_time_of_day("break_end", break_end)?,
        };
        hours.validate()?;
        Ok(hours)
    }

    pub fn validate(&self) -> Result<(), CalendarError> {
        let ordered = self.work_start < self.break_start
            && self.break_start < self.break_end
            && self.break_end < self.work_end;

        if ordered {
            Ok(())
        } else {
            Err(CalendarError::InvalidWindow {
                work_start: self.work_start,
                break_start: self.break_start,
                break_end: self.break_end,
                work_end: self.work_end,
            })
        }
    }

    /// Hours worked on a full working day, break excluded
    pub fn daily_hours(&self) -> f64 {
        let worked = (self.work_end - self.work_start) - (self.break_end - self.break_start);
        worked.num_seconds() as f64 / 3600.0
    }
}

fn parse_time_of_day(field: &'static str, value: &str) -> Result<NaiveTime, CalendarError> {
    NaiveTime::parse_from_str(value.trim(), TIME_OF_DAY_FORMAT).map_err(|_| {
        CalendarError::InvalidTimeOfDay {
            field,
            value: value.to_string(),
        }
    })
}

/// Immutable work calendar: working window, break window and holidays
pub struct WorkCalendar {
    hours: WorkHours,
    holidays: Box<dyn HolidayCalendar>,
}

impl std::fmt::Debug for WorkCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkCalendar")
            .field("hours", &self.hours)
            .finish_non_exhaustive()
    }
}

impl WorkCalendar {
    pub fn new(
        hours: WorkHours,
        holidays: impl HolidayCalendar + 'static,
    ) -> Result<Self, CalendarError> {
        hours.validate()?;
        Ok(Self {
            hours,
            holidays: Box::new(holidays),
        })
    }

    pub fn hours(&self) -> &WorkHours {
        &self.hours
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.is_holiday(date)
    }

    /// Saturdays and Sundays never count, whatever the holiday predicate says
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }
}
