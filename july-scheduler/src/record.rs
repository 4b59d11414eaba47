use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::event::FIELD_SEPARATOR;
use crate::{Event, Result, ScheduleError, FIRST_DATE, LAST_DATE};

const DAY_OFF_MARKER: &str = "off";

/// One line of the persisted schedule.
///
/// ```text
/// 12|off|
/// 14|Standup|09:00|10:00|daily
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    DayOff { date: u32 },
    Event { date: u32, event: Event },
}

impl Record {
    #[must_use]
    pub fn date(&self) -> u32 {
        match self {
            Record::DayOff { date } | Record::Event { date, .. } => *date,
        }
    }

    /// Parses a single line; `line_no` is only used for error reporting.
    pub fn parse(line_no: usize, line: &str) -> Result<Self> {
        let invalid = |reason: String| ScheduleError::InvalidRecord {
            line: line_no,
            reason,
        };

        let (date, rest) = line
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| invalid("missing field separator".into()))?;

        let date = date
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|date| (FIRST_DATE..=LAST_DATE).contains(date))
            .ok_or_else(|| invalid(format!("invalid date '{date}'")))?;

        if rest.trim_end_matches(FIELD_SEPARATOR) == DAY_OFF_MARKER {
            return Ok(Record::DayOff { date });
        }

        let event = Event::decode(rest).map_err(|err| invalid(err.to_string()))?;
        Ok(Record::Event { date, event })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::DayOff { date } => {
                write!(f, "{date}{FIELD_SEPARATOR}{DAY_OFF_MARKER}{FIELD_SEPARATOR}")
            }
            Record::Event { date, event } => write!(f, "{date}{FIELD_SEPARATOR}{}", event.encode()),
        }
    }
}

/// Blank lines are ignored; line numbers in errors are 1-based.
pub fn decode_records(text: &str) -> Result<Vec<Record>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| Record::parse(idx + 1, line))
        .collect()
}

#[must_use]
pub fn encode_records(records: &[Record]) -> String {
    records.iter().map(|record| format!("{record}\n")).collect()
}

/// Flat text file holding one [`Record`] per line.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub const DEFAULT_FILE: &'static str = "EventFile.txt";

    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Record>> {
        let text = fs::read_to_string(&self.path).map_err(|err| self.unavailable(err))?;
        decode_records(&text)
    }

    pub fn save(&self, records: &[Record]) -> Result<()> {
        fs::write(&self.path, encode_records(records)).map_err(|err| self.unavailable(err))?;
        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn unavailable(&self, err: std::io::Error) -> ScheduleError {
        ScheduleError::StorageUnavailable(format!("{}: {err}", self.path.display()))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}
