use crate::calendar::duration::round2;
use crate::calendar::WorkCalendar;
use crate::issues::Timestamp;
use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;

const SHORT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

pub struct HoursCommand {
    pub calendar: WorkCalendar,
    pub start: String,
    pub end: String,
}

impl HoursCommand {
    pub fn new(calendar: WorkCalendar, start: String, end: String) -> Self {
        Self {
            calendar,
            start,
            end,
        }
    }

    pub fn hours(&self) -> Result<f64> {
        let start = parse_instant(&self.start)?;
        let end = parse_instant(&self.end)?;
        Ok(self.calendar.business_duration(start, end))
    }

    pub async fn execute(&self) -> Result<()> {
        let hours = self.hours()?;
        println!("⏱️  Business hours: {:.2}", round2(hours));
        println!("   {} → {}", self.start, self.end);
        Ok(())
    }
}

/// Accepts a tracker timestamp with offset or a plain local date-time
pub fn parse_instant(value: &str) -> Result<NaiveDateTime> {
    if let Ok(Some(wall_clock)) = Timestamp::parse(Some(value)).map(|ts| ts.wall_clock()) {
        return Ok(wall_clock);
    }

    SHORT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .ok_or_else(|| {
            anyhow!("Invalid timestamp '{value}' (expected YYYY-MM-DDTHH:MM or YYYY-MM-DDTHH:MM:SS.sss+HHMM)")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{HolidaySet, WorkHours};

    fn command(start: &str, end: &str) -> HoursCommand {
        let hours = WorkHours::parse("10:00", "19:00", "12:00", "13:00").unwrap();
        HoursCommand::new(
            WorkCalendar::new(hours, HolidaySet::default()).unwrap(),
            start.to_string(),
            end.to_string(),
        )
    }

    #[test]
    fn test_parse_instant_formats() {
        let short = parse_instant("2024-06-14T18:00").unwrap();
        let offset = parse_instant("2024-06-14T18:00:00.000+0900").unwrap();
        assert_eq!(short, offset);
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_weekend_span() {
        // Friday 18:00 to Monday 09:00
        let hours = command("2024-06-14T18:00", "2024-06-17T09:00").hours().unwrap();
        assert_eq!(hours, 1.0);
    }
}
