use std::fmt::Write;

use july_scheduler::{weekday_of, Month, LAST_DATE, MONTH_LABEL};

pub const MENU: [&str; 8] = [
    "Schedule an Event",
    "Cancel an Event",
    "Shift an Event",
    "Set a Day Off",
    "View Day Schedule",
    "View Week Schedule",
    "View Month Schedule",
    "Exit",
];

/// Monday-first month grid. Today is bracketed, days off are parenthesised.
pub fn render_grid(month: &Month) -> String {
    let mut out = format!("{MONTH_LABEL:^28}\n");
    out.push_str(" Mo  Tu  We  Th  Fr  Sa  Su \n");

    let leading = weekday_of(1).num_days_from_monday();
    for _ in 0..leading {
        out.push_str("    ");
    }

    for day in month.days() {
        let date = day.date();
        let cell = if date == month.current_day() {
            format!("[{date:>2}]")
        } else if day.is_day_off() {
            format!("({date:>2})")
        } else {
            format!(" {date:>2} ")
        };
        out.push_str(&cell);

        if weekday_of(date).num_days_from_monday() == 6 || date == LAST_DATE {
            out.push('\n');
        }
    }

    out.push_str("[dd] today  (dd) day off\n");
    out
}

pub fn render_menu() -> String {
    let mut out = String::new();
    for (idx, item) in MENU.iter().enumerate() {
        let _ = writeln!(out, "  {}. {item}", idx + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use july_scheduler::Config;

    use super::*;

    #[test]
    fn grid_marks_today_and_days_off() {
        let mut month = Month::new(Config {
            current_day: 10,
            ..Config::default()
        })
        .unwrap();
        month.set_day_off(13).unwrap();

        let grid = render_grid(&month);
        let lines: Vec<_> = grid.lines().collect();

        assert_eq!(lines[1], " Mo  Tu  We  Th  Fr  Sa  Su ");
        assert_eq!(lines[2], "  1   2   3   4   5   6   7 ");
        assert_eq!(lines[3], "  8   9 [10] 11  12 (13) 14 ");
        assert_eq!(lines[6], " 29  30  31 ");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn menu_is_numbered_from_one() {
        let menu = render_menu();
        assert!(menu.starts_with("  1. Schedule an Event\n"));
        assert!(menu.ends_with("  8. Exit\n"));
    }
}
