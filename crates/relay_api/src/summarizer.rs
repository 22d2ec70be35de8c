//! External summarizer capability and its process-backed implementation.

use std::{io, process::Stdio, time::Duration};

use async_trait::async_trait;
use shared::protocol::SummarizeRequest;
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    process::Command,
};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("failed to spawn summarizer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("summarizer stream i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode summarizer input: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("summarizer exited unsuccessfully (code {code:?})")]
    NonZeroExit { code: Option<i32>, stderr: String },
    #[error("summarizer did not finish within {0:?}")]
    TimedOut(Duration),
}

impl SummarizeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SummarizeError::TimedOut(_))
    }
}

#[async_trait]
pub trait SummarizerClient: Send + Sync {
    /// Returns the summary for `text`, already trimmed of surrounding
    /// whitespace.
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

/// Spawns one fresh process per call. The process receives a single
/// `{"text": ...}` JSON document on stdin followed by EOF and is expected to
/// print the summary on stdout and exit with status 0.
#[derive(Debug, Clone)]
pub struct ProcessSummarizer {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessSummarizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// `None` lets a hung process stall its request indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn run(&self, payload: Vec<u8>) -> Result<String, SummarizeError> {
        // kill_on_drop reaps the child when the timeout drops this future.
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SummarizeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("summarizer stdin was not captured"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("summarizer stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("summarizer stderr was not captured"))?;

        let write_input = async move {
            match stdin.write_all(&payload).await {
                Ok(()) => stdin.shutdown().await,
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("summarizer closed stdin before reading all input");
                    Ok(())
                }
                Err(err) => Err(err),
            }
        };

        let read_output = async move {
            let mut output = Vec::new();
            stdout.read_to_end(&mut output).await?;
            Ok::<_, io::Error>(output)
        };

        let drain_diagnostics = async move {
            let mut segments = BufReader::new(stderr).split(b'\n');
            let mut collected = String::new();
            while let Some(segment) = segments.next_segment().await? {
                let line = String::from_utf8_lossy(&segment);
                let line = line.trim_end_matches('\r');
                warn!(target: "summarizer", "stderr: {line}");
                collected.push_str(line);
                collected.push('\n');
            }
            Ok::<_, io::Error>(collected)
        };

        let (written, output, diagnostics) =
            tokio::join!(write_input, read_output, drain_diagnostics);
        written?;
        let output = output?;
        let diagnostics = diagnostics?;

        let status = child.wait().await?;
        if !status.success() {
            return Err(SummarizeError::NonZeroExit {
                code: status.code(),
                stderr: diagnostics,
            });
        }

        Ok(String::from_utf8_lossy(&output).trim().to_string())
    }
}

#[async_trait]
impl SummarizerClient for ProcessSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let payload = serde_json::to_vec(&SummarizeRequest {
            text: text.to_string(),
        })?;

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(payload))
                .await
                .map_err(|_| SummarizeError::TimedOut(limit))?,
            None => self.run(payload).await,
        }
    }
}

#[cfg(test)]
#[path = "tests/summarizer_tests.rs"]
mod tests;
