use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

use crate::{Result, ScheduleError};

/// Wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(NaiveTime);

impl Time {
    /// Fails unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| ScheduleError::InvalidFormat(format!("{hour}:{minute}")))
    }

    /// Parses an `HH:MM` token. Single-digit components are accepted.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidFormat(text.to_string());

        let (hour, minute) = text.trim().split_once(':').ok_or_else(invalid)?;
        let hour = parse_component(hour).ok_or_else(invalid)?;
        let minute = parse_component(minute).ok_or_else(invalid)?;

        Self::new(hour, minute).map_err(|_| invalid())
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    #[must_use]
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

fn parse_component(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for Time {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Time {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Time {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
