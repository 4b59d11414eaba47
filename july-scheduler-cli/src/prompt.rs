use std::io::{self, BufRead, Write};

use july_scheduler::Time;

/// Line-oriented question/answer over any reader and writer. Every `ask_*`
/// re-asks until the answer is valid and returns `None` once input runs out.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    pub fn ask_number(&mut self, prompt: &str, min: u32, max: u32) -> io::Result<Option<u32>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };

            match line.parse::<u32>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(Some(value)),
                _ => writeln!(
                    self.output,
                    "Invalid input. Please enter a valid number between {min} and {max}."
                )?,
            }
        }
    }

    pub fn ask_text(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };

            if !line.is_empty() {
                return Ok(Some(line));
            }
            writeln!(self.output, "This can not be left empty.")?;
        }
    }

    /// Free text that may be empty.
    pub fn ask_optional(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.read_line(prompt)
    }

    pub fn ask_time(&mut self, prompt: &str) -> io::Result<Option<Time>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };

            match Time::parse(&line) {
                Ok(time) => return Ok(Some(time)),
                Err(_) => writeln!(
                    self.output,
                    "Invalid time format. Please enter time in HH:MM format (24 hour)."
                )?,
            }
        }
    }

    /// Anything starting with `y` or `Y` counts as yes.
    pub fn ask_yes(&mut self, prompt: &str) -> io::Result<Option<bool>> {
        Ok(self
            .read_line(prompt)?
            .map(|answer| answer.starts_with(['y', 'Y'])))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn printed(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_output()).unwrap()
    }

    #[test]
    fn number_is_asked_again_until_in_range() {
        let mut prompter = prompter("abc\n40\n12\n");
        assert_eq!(prompter.ask_number("Day: ", 10, 31).unwrap(), Some(12));

        let out = printed(prompter);
        assert_eq!(out.matches("Day: ").count(), 3);
        assert_eq!(out.matches("between 10 and 31").count(), 2);
    }

    #[test]
    fn end_of_input_yields_none() {
        let mut prompter = prompter("");
        assert_eq!(prompter.ask_number("Day: ", 1, 31).unwrap(), None);
        assert_eq!(prompter.ask_text("Title: ").unwrap(), None);
    }

    #[test]
    fn text_and_time() {
        let mut prompter = prompter("\n  Standup  \n9.30\n09:30\n");
        assert_eq!(prompter.ask_text("Title: ").unwrap().as_deref(), Some("Standup"));
        assert_eq!(prompter.ask_time("Start: ").unwrap(), Time::new(9, 30).ok());
        assert!(printed(prompter).contains("HH:MM"));
    }

    #[test]
    fn yes_means_leading_y() {
        let mut prompter = prompter("Yes\nnope\n");
        assert_eq!(prompter.ask_yes("? ").unwrap(), Some(true));
        assert_eq!(prompter.ask_yes("? ").unwrap(), Some(false));
        assert_eq!(prompter.ask_yes("? ").unwrap(), None);
    }
}
