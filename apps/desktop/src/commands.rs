//! Interactive-mode input, one line at a time.

pub const HELP: &str = "\
Type or paste text; each line is appended to the input.
  /go        generate summary
  /clear     clear input and summary
  /copy      copy summary to clipboard
  /dismiss   dismiss the current error
  /about     show the about panel
  /close     hide the about panel
  /show      redraw
  /help      this help
  /quit      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Append(String),
    Submit,
    Clear,
    Copy,
    Dismiss,
    About,
    CloseAbout,
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(name) = trimmed.strip_prefix('/') else {
            return Command::Append(line.trim_end_matches(['\r', '\n']).to_string());
        };
        match name {
            "go" | "generate" => Command::Submit,
            "clear" => Command::Clear,
            "copy" => Command::Copy,
            "dismiss" => Command::Dismiss,
            "about" => Command::About,
            "close" => Command::CloseAbout,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Appends `line` to the current input as a new line.
pub fn append_line(current: &str, line: &str) -> String {
    if current.is_empty() {
        line.to_string()
    } else {
        format!("{current}\n{line}")
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
