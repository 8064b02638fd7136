use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format the tracker uses for every date-time field, e.g.
/// `2024-06-10T10:30:00.000+0900`
pub const TRACKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// A tracker date-time field that may be unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timestamp {
    #[default]
    Unset,
    At(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Parse a raw field value. Absent or empty values are `Unset`.
    pub fn parse(raw: Option<&str>) -> Result<Self, chrono::ParseError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Timestamp::Unset),
            Some(value) => {
                DateTime::parse_from_str(value, TRACKER_TIMESTAMP_FORMAT).map(Timestamp::At)
            }
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Timestamp::Unset)
    }

    /// Local wall-clock time with the offset dropped
    pub fn wall_clock(&self) -> Option<NaiveDateTime> {
        match self {
            Timestamp::Unset => None,
            Timestamp::At(instant) => Some(instant.naive_local()),
        }
    }

    /// Wall-clock time, falling back to `now` when unset
    pub fn or_now(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.wall_clock().unwrap_or(now)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Timestamp::At(instant)
    }
}
