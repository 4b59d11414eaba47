use std::io::{self, BufRead, Write};

use july_scheduler::{render_days, Day, Event, Month, Scheduled, FIRST_DATE, LAST_DATE, MONTH_LABEL};
use log::warn;

use crate::display::{render_grid, render_menu, MENU};
use crate::prompt::Prompter;

enum Flow {
    Continue,
    Exit,
}

/// Interactive command loop over a [`Month`].
pub struct Session<R, W> {
    month: Month,
    prompter: Prompter<R, W>,
    json: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(month: Month, prompter: Prompter<R, W>, json: bool) -> Self {
        Self {
            month,
            prompter,
            json,
        }
    }

    pub fn into_parts(self) -> (Month, Prompter<R, W>) {
        (self.month, self.prompter)
    }

    /// Runs until the exit command or the end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let screen = format!("\n{}\n{}", render_grid(&self.month), render_menu());
            self.print(&screen)?;

            let Some(choice) = self
                .prompter
                .ask_number("\nChoose an option: ", 1, MENU.len() as u32)?
            else {
                return Ok(());
            };

            let flow = match choice {
                1 => self.schedule()?,
                2 => self.cancel()?,
                3 => self.shift()?,
                4 => self.day_off()?,
                5 => self.view_day()?,
                6 => self.view_week()?,
                7 => self.view_month()?,
                _ => Flow::Exit,
            };

            if let Flow::Exit = flow {
                self.print("You have exited the program.\n")?;
                return Ok(());
            }
        }
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        write!(self.prompter.output(), "{text}")
    }

    fn report<E: std::fmt::Display>(&mut self, err: E) -> io::Result<Flow> {
        warn!("Command failed: {err}");
        self.print(&format!("Error: {err}\n"))?;
        Ok(Flow::Continue)
    }

    fn ask_writable_date(&mut self, prompt: &str) -> io::Result<Option<u32>> {
        let current_day = self.month.current_day();
        self.prompter
            .ask_number(&format!("{prompt} ({current_day}-{LAST_DATE}): "), current_day, LAST_DATE)
    }

    fn ask_any_date(&mut self, prompt: &str) -> io::Result<Option<u32>> {
        self.prompter
            .ask_number(&format!("{prompt} ({FIRST_DATE}-{LAST_DATE}): "), FIRST_DATE, LAST_DATE)
    }

    fn schedule(&mut self) -> io::Result<Flow> {
        let Some(date) = self.ask_writable_date("Enter the date")? else {
            return Ok(Flow::Exit);
        };
        let Some(title) = self.prompter.ask_text("Enter event title: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(start) = self.prompter.ask_time("Enter start time (HH:MM): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(end) = self.prompter.ask_time("Enter end time (HH:MM): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(repeat) = self
            .prompter
            .ask_optional("Enter repeat type (none, daily, weekly): ")?
        else {
            return Ok(Flow::Exit);
        };

        let event = match Event::new(title, start, end, repeat.parse().unwrap_or_default()) {
            Ok(event) => event,
            Err(err) => return self.report(err),
        };

        let mut override_day_off = false;
        if self.month.day(date).is_ok_and(Day::is_day_off) {
            let Some(answer) = self
                .prompter
                .ask_yes("The selected day is marked as a day off. Do you want to proceed? (yes/no) ")?
            else {
                return Ok(Flow::Exit);
            };
            override_day_off = answer;
        }

        match self
            .month
            .schedule_event(date, event, |_| override_day_off)
        {
            Ok(Scheduled::Declined) => {
                self.print("Event not scheduled as the day is marked as a day off.\n")?;
            }
            Ok(Scheduled::Added { skipped, .. }) => {
                self.print("Event scheduled successfully.\n")?;
                for (date, err) in skipped {
                    self.print(&format!("  Skipped {date} {MONTH_LABEL}: {err}\n"))?;
                }
            }
            Err(err) => return self.report(err),
        }

        Ok(Flow::Continue)
    }

    fn cancel(&mut self) -> io::Result<Flow> {
        let Some(date) = self.ask_writable_date("Enter the date")? else {
            return Ok(Flow::Exit);
        };
        let Some(title) = self.prompter.ask_text("Enter event title: ")? else {
            return Ok(Flow::Exit);
        };

        let mut all_occurrences = false;
        if self.month.is_event_repeating(date, &title) {
            let Some(answer) = self.prompter.ask_yes(
                "This is a repeating event. Delete all repeating events with the same title? (yes/no) ",
            )?
            else {
                return Ok(Flow::Exit);
            };
            all_occurrences = answer;
        }

        match self.month.cancel_event(date, &title, all_occurrences) {
            Ok(0) => self.print("No matching events to cancel.\n")?,
            Ok(1) => self.print("Event cancelled successfully.\n")?,
            Ok(count) => self.print(&format!("{count} events cancelled successfully.\n"))?,
            Err(err) => return self.report(err),
        }

        Ok(Flow::Continue)
    }

    fn shift(&mut self) -> io::Result<Flow> {
        let Some(date) = self.ask_writable_date("Enter the shifting date")? else {
            return Ok(Flow::Exit);
        };
        let Some(title) = self.prompter.ask_text("Enter event title: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(new_date) = self.ask_writable_date("Enter the new date")? else {
            return Ok(Flow::Exit);
        };

        match self.month.shift_event(date, &title, new_date) {
            Ok(()) => self.print("Event shifted successfully.\n")?,
            Err(err) => return self.report(err),
        }

        Ok(Flow::Continue)
    }

    fn day_off(&mut self) -> io::Result<Flow> {
        let Some(date) = self.ask_writable_date("Enter date")? else {
            return Ok(Flow::Exit);
        };

        match self.month.set_day_off(date) {
            Ok(_) => self.print(&format!("Day off set for {date} {MONTH_LABEL}.\n"))?,
            Err(err) => return self.report(err),
        }

        Ok(Flow::Continue)
    }

    fn view_day(&mut self) -> io::Result<Flow> {
        let Some(date) = self.ask_any_date("Enter date")? else {
            return Ok(Flow::Exit);
        };

        let day = match self.month.view_day(date) {
            Ok(day) => day,
            Err(err) => return self.report(err),
        };

        let text = if self.json {
            to_json(day)
        } else if day.render().is_empty() {
            format!("No events scheduled for {date} {MONTH_LABEL}.\n")
        } else {
            day.render()
        };
        self.print(&text)?;

        Ok(Flow::Continue)
    }

    fn view_week(&mut self) -> io::Result<Flow> {
        let Some(date) = self.ask_any_date("Enter date")? else {
            return Ok(Flow::Exit);
        };

        let week = match self.month.view_week(date) {
            Ok(week) => week,
            Err(err) => return self.report(err),
        };

        let text = self.render(week);
        self.print(&text)?;

        Ok(Flow::Continue)
    }

    fn view_month(&mut self) -> io::Result<Flow> {
        let text = if self.json {
            self.render(self.month.view_month())
        } else {
            format!("\nSchedule - {MONTH_LABEL}\n\n{}", self.render(self.month.view_month()))
        };
        self.print(&text)?;

        Ok(Flow::Continue)
    }

    fn render(&self, days: &[Day]) -> String {
        if self.json {
            return to_json(days);
        }

        let text = render_days(days);
        if text.is_empty() {
            "Nothing scheduled.\n".to_string()
        } else {
            text
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => format!("{json}\n"),
        Err(err) => format!("Error: {err}\n"),
    }
}
