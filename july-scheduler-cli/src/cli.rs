use std::env;
use std::path::PathBuf;
use std::process;

use getopts::Options;
use july_scheduler::{Config, FileStore, FIRST_DATE, LAST_DATE};

const FILE_VAR: &str = "JULY_SCHEDULER_FILE";

pub struct Args {
    pub today: Option<u32>,
    pub file: PathBuf,
    pub max_events: Option<usize>,
    pub strict_cancel: bool,
    pub best_effort_repeats: bool,
    pub json: bool,
    pub export_ics: Option<PathBuf>,
}

impl Args {
    /// Month configuration for the given "today".
    pub fn config(&self, current_day: u32) -> Config {
        Config {
            current_day,
            max_events_per_day: self.max_events,
            error_if_no_match: self.strict_cancel,
            atomic_repeats: !self.best_effort_repeats,
        }
    }
}

fn check_today(today: Option<u32>) -> Result<Option<u32>, String> {
    match today {
        Some(day) if !(FIRST_DATE..=LAST_DATE).contains(&day) => {
            Err(format!("{day} is not between {FIRST_DATE} and {LAST_DATE}"))
        }
        _ => Ok(today),
    }
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "d",
        "today",
        "Current day of July 2024, prompted for when omitted",
        "DAY",
    );
    opts.optopt(
        "f",
        "file",
        "Schedule file [Default: $JULY_SCHEDULER_FILE or EventFile.txt]",
        "PATH",
    );
    opts.optopt(
        "m",
        "max-events",
        "Maximum number of events per day [Default: unlimited]",
        "COUNT",
    );
    opts.optflag(
        "",
        "strict-cancel",
        "Fail when cancelling all occurrences matches nothing [Default: false]",
    );
    opts.optflag(
        "",
        "best-effort-repeats",
        "Skip conflicting occurrences of repeating events instead of rejecting the series",
    );
    opts.optflag("", "json", "Print day, week and month views as JSON");
    opts.optopt(
        "",
        "export-ics",
        "Write the schedule as an iCalendar file and exit",
        "PATH",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let today = match matches.opt_get::<u32>("today") {
        Ok(today) => match check_today(today) {
            Ok(today) => today,
            Err(err) => {
                eprintln!("Provided value for option 'today' is invalid: {err}");
                process::exit(1);
            }
        },
        Err(err) => {
            eprintln!("Provided value for option 'today' is invalid: {err}");
            process::exit(1);
        }
    };

    let max_events = match matches.opt_get::<usize>("max-events") {
        Ok(max_events) => max_events,
        Err(err) => {
            eprintln!("Provided value for option 'max-events' is invalid: {err}");
            process::exit(1);
        }
    };

    let file = matches
        .opt_str("file")
        .or_else(|| env::var(FILE_VAR).ok())
        .unwrap_or_else(|| FileStore::DEFAULT_FILE.to_string())
        .into();

    Args {
        today,
        file,
        max_events,
        strict_cancel: matches.opt_present("strict-cancel"),
        best_effort_repeats: matches.opt_present("best-effort-repeats"),
        json: matches.opt_present("json"),
        export_ics: matches.opt_str("export-ics").map(PathBuf::from),
    }
}
