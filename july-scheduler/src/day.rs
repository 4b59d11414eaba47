use std::fmt::Write;

use chrono::Weekday;

use crate::{Event, Result, ScheduleError, MONTH_LABEL};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weekday of a date in the month; the 1st is a Monday.
#[must_use]
pub fn weekday_of(date: u32) -> Weekday {
    WEEK[(date.saturating_sub(1) % 7) as usize]
}

#[must_use]
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(feature = "serde")]
fn serialize_weekday<S: serde::Serializer>(
    weekday: &Weekday,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*weekday))
}

/// One calendar date and its non-overlapping events, kept sorted by start
/// time. A day off never holds events.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Day {
    date: u32,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_weekday"))]
    weekday: Weekday,
    day_off: bool,
    events: Vec<Event>,
    #[cfg_attr(feature = "serde", serde(skip))]
    capacity: Option<usize>,
}

impl Day {
    #[must_use]
    pub fn new(date: u32, capacity: Option<usize>) -> Self {
        Self {
            date,
            weekday: weekday_of(date),
            day_off: false,
            events: Vec::new(),
            capacity,
        }
    }

    #[must_use]
    pub fn date(&self) -> u32 {
        self.date
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    #[must_use]
    pub fn is_day_off(&self) -> bool {
        self.day_off
    }

    /// Events in ascending start order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn find(&self, title: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.title() == title)
    }

    /// Checks every invariant `add_event` would enforce, without mutating.
    pub fn check_accepts(&self, event: &Event) -> Result<()> {
        if self.day_off {
            return Err(ScheduleError::DayIsOff { date: self.date });
        }

        if self.events.iter().any(|existing| event.overlaps(existing)) {
            return Err(ScheduleError::Overlap { date: self.date });
        }

        if let Some(capacity) = self.capacity {
            if self.events.len() >= capacity {
                return Err(ScheduleError::DayFull {
                    date: self.date,
                    capacity,
                });
            }
        }

        Ok(())
    }

    pub fn add_event(&mut self, event: Event) -> Result<()> {
        self.check_accepts(&event)?;

        // equal start times keep insertion order
        let idx = self
            .events
            .partition_point(|existing| existing.start() <= event.start());
        self.events.insert(idx, event);

        Ok(())
    }

    /// Removes the first event titled `title`, or every one of them when
    /// `all_matching` is set. Returns how many were removed; zero matches is
    /// always `NotFound` at this level.
    pub fn delete_event(&mut self, title: &str, all_matching: bool) -> Result<usize> {
        let removed = if all_matching {
            let before = self.events.len();
            self.events.retain(|event| event.title() != title);
            before - self.events.len()
        } else {
            match self.events.iter().position(|event| event.title() == title) {
                Some(idx) => {
                    self.events.remove(idx);
                    1
                }
                None => 0,
            }
        };

        if removed == 0 {
            return Err(ScheduleError::not_found(title));
        }

        Ok(removed)
    }

    /// Moves the first event titled `title` onto `target`. The target is
    /// validated before anything is removed, so a failed shift leaves both
    /// days untouched.
    pub fn shift_event(&mut self, title: &str, target: &mut Day) -> Result<()> {
        let idx = self
            .events
            .iter()
            .position(|event| event.title() == title)
            .ok_or_else(|| ScheduleError::not_found(title))?;

        target
            .check_accepts(&self.events[idx])
            .map_err(|err| match err {
                ScheduleError::Overlap { date } => ScheduleError::OverlapOnTarget { date },
                other => other,
            })?;

        let event = self.events.remove(idx);
        target.add_event(event)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Marks the day off, discarding its events.
    pub fn set_day_off(&mut self) {
        self.day_off = true;
        self.clear();
    }

    pub fn clear_day_off(&mut self) {
        self.day_off = false;
    }

    /// Human-readable block for this day; empty when there is nothing to
    /// show.
    #[must_use]
    pub fn render(&self) -> String {
        if self.events.is_empty() && !self.day_off {
            return String::new();
        }

        let mut out = format!(
            "{} {MONTH_LABEL} ({})",
            self.date,
            weekday_name(self.weekday)
        );
        if self.day_off {
            out.push_str(" (Day Off)");
        }
        out.push('\n');

        for event in &self.events {
            let _ = writeln!(out, "  {event}");
        }

        out
    }
}
