use thiserror::Error;

/// Failures raised by the scheduling core.
///
/// Every operation on [`crate::Month`] leaves the schedule in its last valid
/// state when it returns one of these, so callers can report and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Event end time must be after start time")]
    InvalidInterval,

    #[error("Invalid event title: {0}")]
    InvalidTitle(String),

    #[error("Event overlaps with an existing event on day {date}")]
    Overlap { date: u32 },

    #[error("Event overlaps with an existing event on the new date {date}")]
    OverlapOnTarget { date: u32 },

    #[error("Cannot schedule events on a day off ({date})")]
    DayIsOff { date: u32 },

    #[error("Maximum number of events ({capacity}) reached for day {date}")]
    DayFull { date: u32, capacity: usize },

    #[error("No such event exists: {title}")]
    NotFound { title: String },

    #[error("Date {date} is outside the permitted range {min}-{max}")]
    OutOfRange { date: u32, min: u32, max: u32 },

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Fieldless discriminant of [`ScheduleError`], handy for matching in callers
/// and tests without caring about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFormat,
    InvalidInterval,
    InvalidTitle,
    Overlap,
    OverlapOnTarget,
    DayIsOff,
    DayFull,
    NotFound,
    OutOfRange,
    InvalidRecord,
    StorageUnavailable,
}

impl ScheduleError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFormat(_) => ErrorKind::InvalidFormat,
            Self::InvalidInterval => ErrorKind::InvalidInterval,
            Self::InvalidTitle(_) => ErrorKind::InvalidTitle,
            Self::Overlap { .. } => ErrorKind::Overlap,
            Self::OverlapOnTarget { .. } => ErrorKind::OverlapOnTarget,
            Self::DayIsOff { .. } => ErrorKind::DayIsOff,
            Self::DayFull { .. } => ErrorKind::DayFull,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::InvalidRecord { .. } => ErrorKind::InvalidRecord,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    pub(crate) fn not_found<S: Into<String>>(title: S) -> Self {
        Self::NotFound {
            title: title.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_drops_payload() {
        assert_eq!(
            ScheduleError::Overlap { date: 3 }.kind(),
            ErrorKind::Overlap
        );
        assert_eq!(
            ScheduleError::not_found("Standup").kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = ScheduleError::OutOfRange {
            date: 9,
            min: 10,
            max: 31,
        };
        assert_eq!(
            err.to_string(),
            "Date 9 is outside the permitted range 10-31"
        );
    }
}
