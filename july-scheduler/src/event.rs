use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::{Result, ScheduleError, Time};

pub(crate) const FIELD_SEPARATOR: char = '|';

/// How an event recurs within the month.
///
/// Unknown keywords are kept verbatim in [`Repeat::Other`]; they are stored
/// and displayed but never expanded onto other days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
    Other(String),
}

impl Repeat {
    /// Distance in days between occurrences, if this repeat type expands.
    #[must_use]
    pub fn step(&self) -> Option<u32> {
        match self {
            Repeat::Daily => Some(1),
            Repeat::Weekly => Some(7),
            Repeat::None | Repeat::Other(_) => None,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Repeat::None)
    }
}

impl FromStr for Repeat {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.to_ascii_lowercase().as_str() {
            "" | "none" => Repeat::None,
            "daily" => Repeat::Daily,
            "weekly" => Repeat::Weekly,
            _ => Repeat::Other(s.to_string()),
        })
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeat::None => f.write_str("none"),
            Repeat::Daily => f.write_str("daily"),
            Repeat::Weekly => f.write_str("weekly"),
            Repeat::Other(other) => f.write_str(other),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Repeat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Repeat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// A titled half-open interval `[start, end)` on a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Event {
    title: String,
    start: Time,
    end: Time,
    repeat: Repeat,
}

impl Event {
    pub fn new<S: AsRef<str>>(title: S, start: Time, end: Time, repeat: Repeat) -> Result<Self> {
        let title = validate_title(title.as_ref())?;
        let repeat = normalize_repeat(repeat)?;

        if end <= start {
            return Err(ScheduleError::InvalidInterval);
        }

        Ok(Self {
            title,
            start,
            end,
            repeat,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn start(&self) -> Time {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Time {
        self.end
    }

    #[must_use]
    pub fn repeat(&self) -> &Repeat {
        &self.repeat
    }

    /// Half-open overlap: touching endpoints do not conflict.
    #[must_use]
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// `title|HH:MM|HH:MM|repeat`
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            self.title, self.start, self.end, self.repeat
        )
    }

    /// Inverse of [`Event::encode`]. The repeat field takes the remainder of
    /// the line and may be empty.
    pub fn decode(fields: &str) -> Result<Self> {
        let mut split = fields.splitn(4, FIELD_SEPARATOR);

        let title = split.next().unwrap_or_default();
        let start = split.next().ok_or_else(|| missing_field("start"))?;
        let end = split.next().ok_or_else(|| missing_field("end"))?;
        let repeat = split.next().unwrap_or_default();

        Self::new(
            title,
            Time::parse(start)?,
            Time::parse(end)?,
            repeat.parse().unwrap_or_default(),
        )
    }
}

fn validate_title(raw: &str) -> Result<String> {
    let title = raw.trim();

    if title.is_empty() {
        return Err(ScheduleError::InvalidTitle("title must not be empty".into()));
    }

    if title.contains([FIELD_SEPARATOR, '\n', '\r']) {
        return Err(ScheduleError::InvalidTitle(format!(
            "'{title}' must not contain '{FIELD_SEPARATOR}' or line breaks"
        )));
    }

    Ok(title.to_string())
}

/// `Other` values that spell a keyword collapse into it, so the stored form
/// reads back as the same variant.
fn normalize_repeat(repeat: Repeat) -> Result<Repeat> {
    let Repeat::Other(raw) = repeat else {
        return Ok(repeat);
    };

    if raw.contains(['\n', '\r']) {
        return Err(ScheduleError::InvalidFormat(format!(
            "repeat type {raw:?} must not contain line breaks"
        )));
    }

    Ok(raw.parse().unwrap_or_default())
}

fn missing_field(name: &str) -> ScheduleError {
    ScheduleError::InvalidFormat(format!("missing {name} time"))
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} to {} ({})",
            self.title, self.start, self.end, self.repeat
        )
    }
}
