use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Where a running program prints and reads.
///
/// Output is written in fragments and never terminated implicitly;
/// a program that wants a newline prints one.
pub trait Console {
    fn write_str(&mut self, output: &str);

    /// Show `prompt` and read one line without its terminator.
    /// `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Console on the process stdin and stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_str(&mut self, output: &str) {
        print!("{}", output);
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        std::io::stdout().flush().ok()?;
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
        }
    }
}

/// Console that collects output into a string and reads from queued lines.
///
/// Prompts are not echoed into the output.
#[derive(Debug, Default)]
pub struct CollectConsole {
    output: String,
    input: VecDeque<String>,
}

impl CollectConsole {
    pub fn new() -> CollectConsole {
        CollectConsole::default()
    }

    pub fn with_input<I, S>(lines: I) -> CollectConsole
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CollectConsole {
            output: String::new(),
            input: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns the output collected so far and starts over.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Console for CollectConsole {
    fn write_str(&mut self, output: &str) {
        self.output.push_str(output);
    }

    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.input.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_console() {
        let mut c = CollectConsole::with_input(vec!["1", "2"]);
        c.write_str("a ");
        c.write_str("b");
        assert_eq!(c.read_line("$ "), Some("1".to_string()));
        assert_eq!(c.take_output(), "a b");
        assert_eq!(c.output(), "");
        assert_eq!(c.read_line("$ "), Some("2".to_string()));
        assert_eq!(c.read_line("$ "), None);
    }
}
