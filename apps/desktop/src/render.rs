//! Plain-text rendering of the view state.

use std::fmt::Write as _;

use client_core::ViewState;

pub const ABOUT: &str = "\
About This Project
  An AI-powered summarization tool built on a fine-tuned T5 transformer
  model. Enter long-form text and generate a concise summary in one step.
  Summaries are produced by an external model process behind the relay
  service; this client only sends text and shows the result.";

const PLACEHOLDER: &str = "\
  No summary generated yet
  Enter your text and type /go to get started";

pub fn render(state: &ViewState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Enter text to summarize ==");
    if state.text.is_empty() {
        let _ = writeln!(out, "  (empty)");
    } else {
        for line in state.text.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    let action = if state.loading {
        "Generating..."
    } else {
        "Generate Summary"
    };
    let copy = if state.copied { "Copied" } else { "Copy" };
    let _ = writeln!(out, "[{action}] [Clear] [{copy}]");

    let _ = writeln!(out, "== Generated Summary ==");
    if state.summary.is_empty() {
        let _ = writeln!(out, "{PLACEHOLDER}");
    } else {
        for line in state.summary.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    if state.about_visible {
        let _ = writeln!(out, "\n{ABOUT}");
    }

    if let Some(message) = state.error_message() {
        let _ = writeln!(out, "\n! {message}");
    }

    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
