use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    Clipboard, HttpSummaryBackend, SummaryBackend, SummaryController, DEFAULT_SERVER_URL,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{append_line, Command, HELP};
use render::render;

/// Sends text to the summary relay and shows the result. Without --text or
/// --file an interactive session starts.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Text to summarize.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,
    /// Read the text to summarize from a file.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Copy the summary to the system clipboard.
    #[arg(long)]
    copy: bool,
}

/// Connects lazily so a headless session without a clipboard still works
/// until a copy is requested.
#[derive(Default)]
struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .context("system clipboard unavailable")?;
            self.inner = Some(clipboard);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text)
                .context("failed to write to clipboard")?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let backend = HttpSummaryBackend::new(&args.server_url)?;
    tracing::debug!(endpoint = %backend.endpoint(), "using summary relay");
    let mut controller = SummaryController::new(backend, SystemClipboard::default());

    let text = match (&args.text, &args.file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let mut stdout = std::io::stdout();
    match text {
        Some(text) => {
            let mut stderr = std::io::stderr();
            run_once(&mut controller, text, args.copy, &mut stdout, &mut stderr).await
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_interactive(&mut controller, stdin, &mut stdout).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prints the summary to `out`, or the error to `err` with a failing exit
/// code. With `copy`, waits out the copied window before returning.
async fn run_once<B: SummaryBackend, C: Clipboard>(
    controller: &mut SummaryController<B, C>,
    text: String,
    copy: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<ExitCode> {
    controller.edit_text(text).await;
    controller.submit().await;

    let state = controller.state();
    if let Some(message) = state.error_message() {
        writeln!(err, "{message}")?;
        return Ok(ExitCode::FAILURE);
    }
    writeln!(out, "{}", state.summary)?;

    if copy {
        controller.copy_to_clipboard().await;
        if controller.state().copied {
            writeln!(err, "Copied")?;
            controller.apply_next_timer().await;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Reads commands from `input` until EOF or /quit. The view is redrawn after
/// every command and every timer expiry.
async fn run_interactive<B: SummaryBackend, C: Clipboard>(
    controller: &mut SummaryController<B, C>,
    input: impl AsyncBufRead + Unpin,
    out: &mut impl Write,
) -> Result<()> {
    let mut view = controller.subscribe();
    tokio::spawn(async move {
        while view.changed().await.is_ok() {
            let loading = view.borrow_and_update().loading;
            if loading {
                eprintln!("Generating...");
            }
        }
    });

    writeln!(out, "{HELP}\n")?;
    writeln!(out, "{}", render(&controller.state()))?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                match Command::parse(&line) {
                    Command::Append(text) => {
                        let current = controller.state().text;
                        controller.edit_text(append_line(&current, &text)).await;
                        continue;
                    }
                    Command::Submit => controller.submit().await,
                    Command::Clear => controller.clear().await,
                    Command::Copy => controller.copy_to_clipboard().await,
                    Command::Dismiss => controller.dismiss_error().await,
                    Command::About => controller.toggle_about(true).await,
                    Command::CloseAbout => controller.toggle_about(false).await,
                    Command::Show => {}
                    Command::Help => {
                        writeln!(out, "{HELP}")?;
                        continue;
                    }
                    Command::Quit => break,
                    Command::Unknown(name) => {
                        writeln!(out, "unknown command /{name}; /help lists commands")?;
                        continue;
                    }
                }
            }
            _ = controller.apply_next_timer() => {}
        }
        writeln!(out, "{}", render(&controller.state()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
