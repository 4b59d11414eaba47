use chrono::NaiveDate;
use ics::{
    parameters::TzIDParam,
    properties::{DtEnd, DtStart, RRule, Summary, TzName},
    Daylight, Standard, TimeZone,
};

use crate::{Event, Month, MONTH, YEAR};

const TZID: &str = "Europe/Berlin";

impl Month {
    /// Every scheduled occurrence as a `VEVENT`. Repeating events are
    /// already expanded per day, so no `RRULE` is emitted for them.
    #[must_use]
    pub fn to_ics<'a>(&'a self, name: &'a str) -> ics::ICalendar<'a> {
        let mut cet_standard = Standard::new("19701025T030000", "+0200", "+0100");
        cet_standard.push(TzName::new("CET"));
        cet_standard.push(RRule::new("FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU"));

        let mut cest_daylight = Daylight::new("19700329T020000", "+0100", "+0200");
        cest_daylight.push(TzName::new("CEST"));
        cest_daylight.push(RRule::new("FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU"));

        let mut timezone = TimeZone::daylight(TZID, cest_daylight);
        timezone.add_standard(cet_standard);

        let mut icalendar = ics::ICalendar::new("2.0", name);
        icalendar.add_timezone(timezone);

        for day in self.days() {
            let Some(date) = NaiveDate::from_ymd_opt(YEAR, MONTH, day.date()) else {
                continue;
            };
            for event in day.events() {
                icalendar.add_event(event.to_ics(date));
            }
        }

        icalendar
    }
}

impl Event {
    #[must_use]
    pub fn to_ics(&self, date: NaiveDate) -> ics::Event<'_> {
        let start = format!(
            "{}T{}00",
            date.format("%Y%m%d"),
            self.start().as_naive().format("%H%M")
        );

        let end = format!(
            "{}T{}00",
            date.format("%Y%m%d"),
            self.end().as_naive().format("%H%M")
        );

        let id = format!("{}_{}", start, self.title().replace(' ', "-"));

        let mut ics_event = ics::Event::new(id, start.clone());

        let mut dtstart = DtStart::new(start);
        dtstart.add(TzIDParam::new(TZID));
        let mut dtend = DtEnd::new(end);
        dtend.add(TzIDParam::new(TZID));

        ics_event.push(dtstart);
        ics_event.push(dtend);
        ics_event.push(Summary::new(self.title()));

        ics_event
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, Event, Month, Repeat, Time};

    #[test]
    fn exports_one_vevent_per_occurrence() {
        let mut month = Month::new(Config::default()).unwrap();
        let review = Event::new(
            "Design Review",
            Time::new(14, 0).unwrap(),
            Time::new(15, 30).unwrap(),
            Repeat::Weekly,
        )
        .unwrap();
        month.schedule_event(24, review, |_| true).unwrap();

        let ics = month.to_ics("july").to_string();

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("TZID:Europe/Berlin"));
        assert!(ics.contains("DTSTART;TZID=Europe/Berlin:20240724T140000"));
        assert!(ics.contains("DTEND;TZID=Europe/Berlin:20240731T153000"));
        assert!(ics.contains("UID:20240724T140000_Design-Review"));
        assert!(ics.contains("SUMMARY:Design Review"));
    }
}
