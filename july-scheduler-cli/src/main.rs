use std::{env, fs, io, path::Path};

use anyhow::{Context, Result};
use july_scheduler::{Config, FileStore, Month, ScheduleError, FIRST_DATE, LAST_DATE};
use log::{debug, error, info, warn};

mod cli;
mod display;
mod prompt;
mod session;

use prompt::Prompter;
use session::Session;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "july_scheduler=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

fn main() -> Result<()> {
    let args = cli::parse(env::args().skip(1).collect());
    setup_logging();

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let today = match args.today {
        Some(today) => today,
        None => match prompter.ask_number(
            &format!("Enter the current day ({FIRST_DATE}-{LAST_DATE}): "),
            FIRST_DATE,
            LAST_DATE,
        )? {
            Some(today) => today,
            None => return Ok(()),
        },
    };

    let config = args.config(today);
    let store = FileStore::new(&args.file);

    let (month, writable) = open_month(config, &store)?;

    if let Some(path) = &args.export_ics {
        return export_ics(&month, path);
    }

    let mut session = Session::new(month, prompter, args.json);
    session.run().context("Failed to talk to the terminal")?;

    let (month, _) = session.into_parts();
    save_on_exit(&month, &store, writable);

    Ok(())
}

/// Loads the schedule file. A missing or unreadable file gives an empty month
/// that is written out at exit. A file that fails to replay also gives an
/// empty month, but the returned flag is `false` so the file is left alone.
fn open_month(config: Config, store: &FileStore) -> Result<(Month, bool)> {
    match Month::load(config.clone(), store) {
        Ok(month) => {
            info!("Loaded schedule from {}", store.path().display());
            Ok((month, true))
        }
        Err(err @ ScheduleError::StorageUnavailable(_)) => {
            warn!("{err}; starting with an empty month");
            Ok((Month::new(config)?, true))
        }
        Err(err) => {
            error!("{err}");
            eprintln!(
                "Error: {err}\nStarting with an empty month; {} will not be overwritten.",
                store.path().display()
            );
            Ok((Month::new(config)?, false))
        }
    }
}

fn save_on_exit(month: &Month, store: &FileStore, writable: bool) {
    if !writable {
        warn!("Not saving over unreadable {}", store.path().display());
        return;
    }

    match month.save(store) {
        Ok(()) => debug!("Saved schedule to {}", store.path().display()),
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
        }
    }
}

fn export_ics(month: &Month, path: &Path) -> Result<()> {
    let ics = month.to_ics(env!("CARGO_PKG_NAME")).to_string();
    fs::write(path, ics).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Exported schedule to {}", path.display());
    Ok(())
}
