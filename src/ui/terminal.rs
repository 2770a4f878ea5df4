//! Line-oriented terminal implementation of the interaction ports

use super::{Answer, InputKind, Progress, Prompter};
use std::io::{BufRead, Write};

/// Prompts over any line reader/writer pair (stdin/stdout in the binary)
pub struct TerminalPrompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.output, "{}", text);
    }

    /// Prompt and read one trimmed line; `None` at end of input
    fn ask(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{} ", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                None
            }
        }
    }

    fn print_options(&mut self, heading: &str, options: &[String]) {
        self.say(&format!("\n{}", heading));
        for (i, option) in options.iter().enumerate() {
            self.say(&format!("  {:>2}) {}", i + 1, option));
        }
    }
}

/// Parse a 1-based option number
fn parse_choice(text: &str, count: usize) -> Option<usize> {
    let choice: usize = text.trim().parse().ok()?;
    (1..=count).contains(&choice).then(|| choice - 1)
}

fn is_cancel(text: &str) -> bool {
    text.is_empty() || text.eq_ignore_ascii_case("q")
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn select(&mut self, heading: &str, options: &[String]) -> Answer<usize> {
        self.print_options(heading, options);
        loop {
            let Some(line) = self.ask("Choose an option (empty to cancel):") else {
                return Answer::Cancelled;
            };
            if is_cancel(&line) {
                return Answer::Cancelled;
            }
            match parse_choice(&line, options.len()) {
                Some(idx) => return Answer::Value(idx),
                None => self.say(&format!("Enter a number between 1 and {}.", options.len())),
            }
        }
    }

    fn multi_select(&mut self, heading: &str, options: &[String]) -> Answer<Vec<usize>> {
        self.print_options(heading, options);
        loop {
            let Some(line) = self.ask("Choose options, comma separated (empty to cancel):")
            else {
                return Answer::Cancelled;
            };
            if is_cancel(&line) {
                return Answer::Cancelled;
            }

            let picked: Option<Vec<usize>> = line
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| parse_choice(part, options.len()))
                .collect();
            match picked {
                Some(mut picked) => {
                    picked.sort_unstable();
                    picked.dedup();
                    return Answer::Value(picked);
                }
                None => self.say(&format!(
                    "Enter numbers between 1 and {}, separated by commas.",
                    options.len()
                )),
            }
        }
    }

    fn input(&mut self, prompt: &str, default: Option<&str>, kind: InputKind) -> Answer<String> {
        let label = match default {
            Some(default) => format!("{} [{}]:", prompt, default),
            None => format!("{}:", prompt),
        };
        loop {
            let Some(line) = self.ask(&label) else {
                return Answer::Cancelled;
            };
            if line.is_empty() {
                return Answer::Value(default.unwrap_or_default().to_string());
            }
            if kind == InputKind::Numeric && !line.chars().all(|c| c.is_ascii_digit()) {
                self.say("Please enter digits only.");
                continue;
            }
            return Answer::Value(line);
        }
    }

    fn confirm(&mut self, heading: &str, message: &str) -> Answer<bool> {
        self.say(&format!("\n{}\n{}", heading, message));
        loop {
            let Some(line) = self.ask("[y/n]:") else {
                return Answer::Cancelled;
            };
            match line.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Answer::Value(true),
                "n" | "no" => return Answer::Value(false),
                "" | "q" => return Answer::Cancelled,
                _ => self.say("Please answer y or n."),
            }
        }
    }

    fn notify(&mut self, message: &str) {
        self.say(message);
    }

    fn text_viewer(&mut self, heading: &str, text: &str) {
        self.say(&format!("\n== {} ==\n{}", heading, text));
    }

    fn progress(&mut self, heading: &str, message: &str) -> Box<dyn Progress + '_> {
        self.say(&format!("{}: {}", heading, message));
        Box::new(TerminalProgress {
            output: &mut self.output,
            last: None,
        })
    }
}

/// Progress lines written to the prompter's output
struct TerminalProgress<'a, W: Write> {
    output: &'a mut W,
    last: Option<u8>,
}

impl<W: Write> Progress for TerminalProgress<'_, W> {
    fn update(&mut self, percent: u8, message: &str) {
        if self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);
        let _ = writeln!(self.output, "[{:>3}%] {}", percent, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn options(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_retries_until_valid() {
        let mut p = prompter("7\nabc\n2\n");
        assert_eq!(p.select("Pick", &options(&["a", "b"])), Answer::Value(1));

        let (_, out) = p.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("   1) a"));
        assert!(out.contains("Enter a number between 1 and 2."));
    }

    #[test]
    fn test_select_cancel_and_eof() {
        assert!(prompter("\n").select("Pick", &options(&["a"])).is_cancelled());
        assert!(prompter("q\n").select("Pick", &options(&["a"])).is_cancelled());
        assert!(prompter("").select("Pick", &options(&["a"])).is_cancelled());
    }

    #[test]
    fn test_multi_select() {
        let mut p = prompter("3, 1,3\n");
        assert_eq!(
            p.multi_select("Pick", &options(&["a", "b", "c"])),
            Answer::Value(vec![0, 2])
        );
    }

    #[test]
    fn test_input_default_and_numeric() {
        let mut p = prompter("\n12x\n12\n");
        assert_eq!(
            p.input("Number", Some("4"), InputKind::Numeric),
            Answer::Value("4".to_string())
        );
        assert_eq!(
            p.input("Number", None, InputKind::Numeric),
            Answer::Value("12".to_string())
        );
        assert!(p.input("Name", None, InputKind::Text).is_cancelled());
    }

    #[test]
    fn test_confirm() {
        let mut p = prompter("maybe\nY\nno\n");
        assert_eq!(p.confirm("Q", "Sure?"), Answer::Value(true));
        assert_eq!(p.confirm("Q", "Sure?"), Answer::Value(false));
        assert!(p.confirm("Q", "Sure?").is_cancelled());
    }

    #[test]
    fn test_progress_skips_repeated_percentages() {
        let mut p = prompter("");
        {
            let mut progress = p.progress("Channel", "Working");
            progress.update(10, "one");
            progress.update(10, "again");
            progress.update(50, "two");
            progress.close();
        }
        let (_, out) = p.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("[ 10%] one"));
        assert!(!out.contains("again"));
        assert!(out.contains("[ 50%] two"));
    }
}
