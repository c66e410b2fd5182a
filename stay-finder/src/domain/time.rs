//! Wall-clock times and service calendars.
//!
//! Timetables give times as "HH:MM" strings with no date attached. A train
//! departing 23:58 and arriving 00:01 crosses midnight, so differences are
//! taken modulo one day.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::DomainError;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day with minute precision.
///
/// # Examples
///
/// ```
/// use stay_finder::domain::ClockTime;
///
/// let dep = ClockTime::parse_hhmm("23:58").unwrap();
/// let arr = ClockTime::parse_hhmm("00:01").unwrap();
/// assert_eq!(dep.minutes_until(arr), 3);
/// assert_eq!(dep.add_minutes(5).to_string(), "00:03");
///
/// assert!(ClockTime::parse_hhmm("24:00").is_err());
/// assert!(ClockTime::parse_hhmm("7:5").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Parse "HH:MM" (hour 00-23, minute 00-59).
    pub fn parse_hhmm(s: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidClockTime(s.to_string());

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 || !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }

        Ok(Self(hour * 60 + minute))
    }

    /// Build from minutes after midnight, wrapping at 24h.
    pub fn from_minutes(minutes: u32) -> Self {
        Self((minutes % u32::from(MINUTES_PER_DAY)) as u16)
    }

    /// Minutes after midnight (0-1439).
    pub fn minutes_of_day(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }

    /// Add minutes, wrapping past midnight.
    pub fn add_minutes(&self, minutes: u32) -> Self {
        Self::from_minutes(u32::from(self.0) + minutes)
    }

    /// Minutes from `self` forward to `later`, assuming `later` is within the
    /// next 24 hours.
    pub fn minutes_until(&self, later: ClockTime) -> u16 {
        (i32::from(later.0) - i32::from(self.0)).rem_euclid(i32::from(MINUTES_PER_DAY)) as u16
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({})", self)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hhmm(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Which timetable applies on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Calendar {
    Weekday,
    SaturdayHoliday,
}

impl Calendar {
    /// Saturdays and Sundays run the holiday timetable; every other day
    /// runs the weekday one. Public holidays are not modelled.
    pub fn for_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => Calendar::SaturdayHoliday,
            _ => Calendar::Weekday,
        }
    }

    /// Identifier used by the transit data API.
    pub fn as_odpt(&self) -> &'static str {
        match self {
            Calendar::Weekday => "odpt.Calendar:Weekday",
            Calendar::SaturdayHoliday => "odpt.Calendar:SaturdayHoliday",
        }
    }
}
