use super::CalendarError;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Predicate answering whether a date is a public holiday
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

impl<F> HolidayCalendar for F
where
    F: Fn(NaiveDate) -> bool + Send + Sync,
{
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self(date)
    }
}

/// Fixed set of holiday dates loaded from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

impl HolidaySet {
    pub fn from_dates(dates: &[String]) -> Result<Self, CalendarError> {
        let mut set = Self::default();
        for value in dates {
            set.dates.insert(parse_date(value)?);
        }
        Ok(set)
    }

    /// Load holidays from a text file, one date per line.
    ///
    /// Only the first comma-separated field is read, so `date,name` CSV
    /// exports work as-is. Blank lines and `#` comments are ignored, as is a
    /// header on the first line.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, CalendarError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| CalendarError::HolidayFile {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse_lines(&content)
    }

    pub fn parse_lines(content: &str) -> Result<Self, CalendarError> {
        let mut set = Self::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let field = line.split(',').next().unwrap_or(line).trim();
            match parse_date(field) {
                Ok(date) => {
                    set.dates.insert(date);
                }
                Err(_) if index == 0 => {
                    tracing::debug!("Skipping holidays header row: {}", line);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(set)
    }

    pub fn merge(mut self, other: HolidaySet) -> Self {
        self.dates.extend(other.dates);
        self
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl HolidayCalendar for HolidaySet {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CalendarError::InvalidHoliday {
            value: value.to_string(),
        }
    })
}
