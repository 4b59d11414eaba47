mod day;
mod error;
mod event;
mod month;
mod record;
mod time;

#[cfg(feature = "ics")]
mod ics;

pub use day::{weekday_name, weekday_of, Day};
pub use error::{ErrorKind, Result, ScheduleError};
pub use event::{Event, Repeat};
pub use month::{
    render_days, Config, Month, Scheduled, FIRST_DATE, LAST_DATE, MONTH, MONTH_LABEL, YEAR,
};
pub use record::{decode_records, encode_records, FileStore, Record};
pub use time::Time;
