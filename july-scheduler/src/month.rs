use log::{debug, info, warn};

use crate::{Day, Event, FileStore, Record, Result, ScheduleError};

pub const YEAR: i32 = 2024;
pub const MONTH: u32 = 7;
pub const MONTH_LABEL: &str = "July 2024";
pub const FIRST_DATE: u32 = 1;
pub const LAST_DATE: u32 = 31;

/// Knobs for a [`Month`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// "Today": the earliest date that may be mutated.
    pub current_day: u32,
    /// Per-day event limit, unbounded when `None`.
    pub max_events_per_day: Option<usize>,
    /// Whether cancelling all occurrences with zero matches is `NotFound`.
    /// Defaults to `false`: a bulk cancel that finds nothing is a no-op.
    pub error_if_no_match: bool,
    /// Validate every occurrence of a repeating event before adding any of
    /// them. When `false`, conflicting occurrences are skipped and reported.
    pub atomic_repeats: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            current_day: FIRST_DATE,
            max_events_per_day: None,
            error_if_no_match: false,
            atomic_repeats: true,
        }
    }
}

/// Result of [`Month::schedule_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheduled {
    /// The target was a day off and the override was refused.
    Declined,
    Added {
        dates: Vec<u32>,
        /// Occurrences that could not be placed in best-effort mode.
        skipped: Vec<(u32, ScheduleError)>,
    },
}

/// The 31 days of the month plus the floor below which nothing may change.
#[derive(Debug, Clone)]
pub struct Month {
    config: Config,
    days: Vec<Day>,
}

impl Month {
    pub fn new(config: Config) -> Result<Self> {
        if !(FIRST_DATE..=LAST_DATE).contains(&config.current_day) {
            return Err(ScheduleError::OutOfRange {
                date: config.current_day,
                min: FIRST_DATE,
                max: LAST_DATE,
            });
        }

        let days = (FIRST_DATE..=LAST_DATE)
            .map(|date| Day::new(date, config.max_events_per_day))
            .collect();

        Ok(Self { config, days })
    }

    /// Rebuilds a month by replaying records in order through the same
    /// checks live mutations go through.
    pub fn from_records<I>(config: Config, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut month = Self::new(config)?;

        for record in records {
            match record {
                Record::DayOff { date } => {
                    month.check_readable(date)?;
                    month.day_mut(date).set_day_off();
                }
                Record::Event { date, event } => {
                    month.check_readable(date)?;
                    month.day_mut(date).add_event(event)?;
                }
            }
        }

        Ok(month)
    }

    pub fn load(config: Config, store: &FileStore) -> Result<Self> {
        let records = store.load()?;
        debug!("Replaying {} records from {}", records.len(), store.path().display());
        Self::from_records(config, records)
    }

    pub fn save(&self, store: &FileStore) -> Result<()> {
        store.save(&self.to_records())
    }

    /// Day-off records come before a day's events, days in date order.
    #[must_use]
    pub fn to_records(&self) -> Vec<Record> {
        let mut records = Vec::new();

        for day in &self.days {
            if day.is_day_off() {
                records.push(Record::DayOff { date: day.date() });
            }
            records.extend(day.events().iter().map(|event| Record::Event {
                date: day.date(),
                event: event.clone(),
            }));
        }

        records
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn current_day(&self) -> u32 {
        self.config.current_day
    }

    #[must_use]
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn day(&self, date: u32) -> Result<&Day> {
        self.check_readable(date)?;
        Ok(&self.days[index(date)])
    }

    /// Places `event` on `date` and, for daily and weekly events, on every
    /// later occurrence through the end of the month. Later occurrences skip
    /// days off. `confirm` is asked only when `date` itself is a day off;
    /// accepting clears the flag for that date.
    pub fn schedule_event<F>(&mut self, date: u32, event: Event, confirm: F) -> Result<Scheduled>
    where
        F: FnOnce(&Day) -> bool,
    {
        self.check_writable(date)?;

        let was_off = self.days[index(date)].is_day_off();
        if was_off {
            if !confirm(&self.days[index(date)]) {
                info!("Not scheduling '{}' on day off {date}", event.title());
                return Ok(Scheduled::Declined);
            }
            self.day_mut(date).clear_day_off();
        }

        let result = self.place_occurrences(date, &event);
        if result.is_err() && was_off {
            self.day_mut(date).set_day_off();
        }

        let (dates, skipped) = result?;
        debug!(
            "Scheduled '{}' ({}) on {} day(s)",
            event.title(),
            event.repeat(),
            dates.len()
        );

        Ok(Scheduled::Added { dates, skipped })
    }

    fn place_occurrences(
        &mut self,
        date: u32,
        event: &Event,
    ) -> Result<(Vec<u32>, Vec<(u32, ScheduleError)>)> {
        let targets: Vec<u32> = match event.repeat().step() {
            Some(step) => (date..=LAST_DATE)
                .step_by(step as usize)
                .filter(|&d| d == date || !self.days[index(d)].is_day_off())
                .collect(),
            None => vec![date],
        };

        self.days[index(date)].check_accepts(event)?;

        if self.config.atomic_repeats {
            for &d in &targets {
                self.days[index(d)].check_accepts(event)?;
            }
            for &d in &targets {
                self.day_mut(d).add_event(event.clone())?;
            }
            return Ok((targets, Vec::new()));
        }

        let mut dates = Vec::with_capacity(targets.len());
        let mut skipped = Vec::new();

        for d in targets {
            match self.day_mut(d).add_event(event.clone()) {
                Ok(()) => dates.push(d),
                Err(err) => {
                    warn!("Skipping '{}' on day {d}: {err}", event.title());
                    skipped.push((d, err));
                }
            }
        }

        Ok((dates, skipped))
    }

    /// Cancels `title` on `date`, or on `date` and every later day when
    /// `all_occurrences` is set. Earlier days are never touched. Returns how
    /// many events were removed.
    pub fn cancel_event(&mut self, date: u32, title: &str, all_occurrences: bool) -> Result<usize> {
        self.check_writable(date)?;

        if !all_occurrences {
            return self.day_mut(date).delete_event(title, false);
        }

        let mut removed = 0;
        for d in date..=LAST_DATE {
            match self.day_mut(d).delete_event(title, true) {
                Ok(count) => removed += count,
                Err(ScheduleError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }

        if removed == 0 && self.config.error_if_no_match {
            return Err(ScheduleError::not_found(title));
        }

        debug!("Cancelled {removed} occurrence(s) of '{title}' from day {date}");
        Ok(removed)
    }

    pub fn shift_event(&mut self, date: u32, title: &str, new_date: u32) -> Result<()> {
        self.check_writable(date)?;
        self.check_writable(new_date)?;

        if date == new_date {
            return match self.days[index(date)].find(title) {
                Some(_) => Ok(()),
                None => Err(ScheduleError::not_found(title)),
            };
        }

        let (source, target) = self.pair_mut(date, new_date);
        source.shift_event(title, target)
    }

    /// Marks `date` off, discarding (not relocating) its events. Returns the
    /// number of events dropped.
    pub fn set_day_off(&mut self, date: u32) -> Result<usize> {
        self.check_writable(date)?;

        let day = self.day_mut(date);
        let dropped = day.events().len();
        day.set_day_off();

        if dropped > 0 {
            info!("Day {date} marked off, {dropped} event(s) discarded");
        }

        Ok(dropped)
    }

    #[must_use]
    pub fn is_event_repeating(&self, date: u32, title: &str) -> bool {
        self.day(date).is_ok_and(|day| {
            day.events()
                .iter()
                .any(|event| event.title() == title && !event.repeat().is_none())
        })
    }

    pub fn view_day(&self, date: u32) -> Result<&Day> {
        self.day(date)
    }

    /// The Monday-to-Sunday bucket containing `date`; the last bucket is the
    /// three days 29-31.
    pub fn view_week(&self, date: u32) -> Result<&[Day]> {
        self.check_readable(date)?;

        let start = (date - 1) / 7 * 7 + 1;
        let end = (start + 6).min(LAST_DATE);

        Ok(&self.days[index(start)..=index(end)])
    }

    #[must_use]
    pub fn view_month(&self) -> &[Day] {
        &self.days
    }

    fn check_writable(&self, date: u32) -> Result<()> {
        check_range(date, self.config.current_day)
    }

    fn check_readable(&self, date: u32) -> Result<()> {
        check_range(date, FIRST_DATE)
    }

    fn day_mut(&mut self, date: u32) -> &mut Day {
        &mut self.days[index(date)]
    }

    fn pair_mut(&mut self, a: u32, b: u32) -> (&mut Day, &mut Day) {
        let (a, b) = (index(a), index(b));
        if a < b {
            let (left, right) = self.days.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.days.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }
}

fn check_range(date: u32, min: u32) -> Result<()> {
    if date < min || date > LAST_DATE {
        return Err(ScheduleError::OutOfRange {
            date,
            min,
            max: LAST_DATE,
        });
    }
    Ok(())
}

fn index(date: u32) -> usize {
    (date - FIRST_DATE) as usize
}

/// Concatenates the rendering of every day that has something to show.
#[must_use]
pub fn render_days(days: &[Day]) -> String {
    days.iter()
        .map(Day::render)
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, Repeat, Time};

    fn event(title: &str, start: &str, end: &str, repeat: Repeat) -> Event {
        Event::new(
            title,
            Time::parse(start).unwrap(),
            Time::parse(end).unwrap(),
            repeat,
        )
        .unwrap()
    }

    fn month(current_day: u32) -> Month {
        Month::new(Config {
            current_day,
            ..Config::default()
        })
        .unwrap()
    }

    fn dates_with(month: &Month, title: &str) -> Vec<u32> {
        month
            .days()
            .iter()
            .filter(|day| day.find(title).is_some())
            .map(Day::date)
            .collect()
    }

    #[test]
    fn rejects_invalid_current_day() {
        for current_day in [0, 32] {
            let err = Month::new(Config {
                current_day,
                ..Config::default()
            })
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange);
        }
    }

    #[test]
    fn writes_are_gated_by_current_day() {
        let mut month = month(10);
        let standup = event("Standup", "09:00", "10:00", Repeat::None);

        let err = month.schedule_event(9, standup.clone(), |_| true).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::OutOfRange {
                date: 9,
                min: 10,
                max: 31
            }
        );
        assert_eq!(
            month.schedule_event(32, standup.clone(), |_| true).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );

        month.schedule_event(10, standup, |_| true).unwrap();
        assert_eq!(month.set_day_off(3).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(
            month.shift_event(10, "Standup", 2).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(
            month.shift_event(9, "Standup", 12).unwrap_err(),
            ScheduleError::OutOfRange {
                date: 9,
                min: 10,
                max: 31
            }
        );
        assert!(month.day(10).unwrap().find("Standup").is_some());
        assert_eq!(
            month.cancel_event(4, "Standup", false).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn reads_accept_the_whole_month() {
        let month = month(20);
        assert_eq!(month.view_day(1).unwrap().date(), 1);
        assert_eq!(month.view_week(3).unwrap().len(), 7);
        assert_eq!(month.view_day(0).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(month.view_week(32).unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn week_buckets_are_monday_aligned() {
        let month = month(1);
        let bounds = |date| {
            let week = month.view_week(date).unwrap();
            (week[0].date(), week[week.len() - 1].date())
        };

        assert_eq!(bounds(1), (1, 7));
        assert_eq!(bounds(7), (1, 7));
        assert_eq!(bounds(8), (8, 14));
        assert_eq!(bounds(20), (15, 21));
        assert_eq!(bounds(28), (22, 28));
        assert_eq!(bounds(29), (29, 31));
        assert_eq!(bounds(31), (29, 31));
    }

    #[test]
    fn weekly_expansion_steps_by_seven() {
        let mut month = month(1);
        let review = event("Review", "14:00", "15:00", Repeat::Weekly);

        let outcome = month.schedule_event(3, review, |_| true).unwrap();
        assert_eq!(
            outcome,
            Scheduled::Added {
                dates: vec![3, 10, 17, 24, 31],
                skipped: vec![]
            }
        );
        assert_eq!(dates_with(&month, "Review"), [3, 10, 17, 24, 31]);
    }

    #[test]
    fn unknown_repeat_type_is_kept_but_not_expanded() {
        let mut month = month(1);
        let odd = event("Odd", "14:00", "15:00", Repeat::Other("monthly".into()));

        month.schedule_event(3, odd, |_| true).unwrap();
        assert_eq!(dates_with(&month, "Odd"), [3]);
        assert!(month.is_event_repeating(3, "Odd"));
    }

    #[test]
    fn expansion_skips_days_off() {
        let mut month = month(1);
        month.set_day_off(6).unwrap();

        month
            .schedule_event(5, event("Gym", "07:00", "08:00", Repeat::Daily), |_| true)
            .unwrap();

        let dates = dates_with(&month, "Gym");
        assert_eq!(dates.len(), 26);
        assert!(!dates.contains(&6));
        assert!(month.day(6).unwrap().is_day_off());
    }

    #[test]
    fn atomic_expansion_fails_without_side_effects() {
        let mut month = month(1);
        month
            .schedule_event(20, event("Dentist", "07:30", "08:30", Repeat::None), |_| true)
            .unwrap();

        let err = month
            .schedule_event(5, event("Gym", "07:00", "08:00", Repeat::Daily), |_| true)
            .unwrap_err();

        assert_eq!(err, ScheduleError::Overlap { date: 20 });
        assert!(dates_with(&month, "Gym").is_empty());
    }

    #[test]
    fn best_effort_expansion_reports_skipped_dates() {
        let mut month = Month::new(Config {
            atomic_repeats: false,
            ..Config::default()
        })
        .unwrap();
        month
            .schedule_event(20, event("Dentist", "07:30", "08:30", Repeat::None), |_| true)
            .unwrap();

        let outcome = month
            .schedule_event(5, event("Gym", "07:00", "08:00", Repeat::Daily), |_| true)
            .unwrap();

        let Scheduled::Added { dates, skipped } = outcome else {
            panic!("expected the series to be added");
        };
        assert_eq!(dates.len(), 26);
        assert_eq!(skipped, vec![(20, ScheduleError::Overlap { date: 20 })]);
    }

    #[test]
    fn day_off_override_needs_confirmation() {
        let mut month = month(1);
        month.set_day_off(8).unwrap();
        let standup = event("Standup", "09:00", "10:00", Repeat::None);

        let outcome = month.schedule_event(8, standup.clone(), |_| false).unwrap();
        assert_eq!(outcome, Scheduled::Declined);
        assert!(month.day(8).unwrap().is_day_off());

        let mut asked = false;
        month
            .schedule_event(8, standup, |day| {
                asked = true;
                day.date() == 8
            })
            .unwrap();
        assert!(asked);
        assert!(!month.day(8).unwrap().is_day_off());
        assert_eq!(dates_with(&month, "Standup"), [8]);
    }

    #[test]
    fn failed_override_restores_day_off() {
        let mut month = Month::new(Config {
            max_events_per_day: Some(0),
            ..Config::default()
        })
        .unwrap();
        month.set_day_off(8).unwrap();

        let err = month
            .schedule_event(8, event("Standup", "09:00", "10:00", Repeat::None), |_| true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DayFull);
        assert!(month.day(8).unwrap().is_day_off());
    }

    #[test]
    fn cancel_all_occurrences_spares_earlier_days() {
        let mut month = month(1);
        month
            .schedule_event(1, event("Gym", "07:00", "08:00", Repeat::Daily), |_| true)
            .unwrap();

        assert_eq!(month.cancel_event(15, "Gym", true).unwrap(), 17);
        assert_eq!(dates_with(&month, "Gym"), (1..=14).collect::<Vec<_>>());

        assert_eq!(month.cancel_event(3, "Gym", false).unwrap(), 1);
        assert!(month.day(3).unwrap().find("Gym").is_none());
        assert!(month.day(4).unwrap().find("Gym").is_some());
    }

    #[test]
    fn bulk_cancel_without_matches_follows_config() {
        let mut lenient = month(1);
        assert_eq!(lenient.cancel_event(2, "Nothing", true).unwrap(), 0);
        assert_eq!(
            lenient.cancel_event(2, "Nothing", false).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        let mut strict = Month::new(Config {
            error_if_no_match: true,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(
            strict.cancel_event(2, "Nothing", true).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn shift_in_both_directions() {
        let mut month = month(1);
        month
            .schedule_event(10, event("X", "09:00", "10:00", Repeat::None), |_| true)
            .unwrap();

        month.shift_event(10, "X", 4).unwrap();
        assert_eq!(dates_with(&month, "X"), [4]);

        month.shift_event(4, "X", 25).unwrap();
        assert_eq!(dates_with(&month, "X"), [25]);

        month.shift_event(25, "X", 25).unwrap();
        assert_eq!(
            month.shift_event(25, "Y", 25).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn set_day_off_discards_events() {
        let mut month = month(1);
        month
            .schedule_event(12, event("A", "09:00", "10:00", Repeat::None), |_| true)
            .unwrap();
        month
            .schedule_event(12, event("B", "11:00", "12:00", Repeat::None), |_| true)
            .unwrap();

        assert_eq!(month.set_day_off(12).unwrap(), 2);
        assert!(month.day(12).unwrap().is_empty());
        assert_eq!(
            month.to_records(),
            vec![Record::DayOff { date: 12 }]
        );
    }

    #[test]
    fn renders_only_days_with_content() {
        let mut month = month(1);
        month.set_day_off(2).unwrap();
        month
            .schedule_event(4, event("Standup", "09:00", "10:00", Repeat::None), |_| true)
            .unwrap();

        assert_eq!(
            render_days(month.view_month()),
            "2 July 2024 (Tuesday) (Day Off)\n\n4 July 2024 (Thursday)\n  Standup from 09:00 to 10:00 (none)\n"
        );
    }
}
