use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{summarize_route, SummarizeReply, SummarizeRequest};
use tracing::{debug, warn};
use url::Url;

/// How one summarization request settled, from the UI's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeOutcome {
    Summary(String),
    /// The relay answered, but without a usable summary.
    MissingSummary,
    /// Unreachable relay or a body that is not JSON.
    TransportFailure(String),
}

impl SummarizeOutcome {
    pub fn from_reply(reply: SummarizeReply) -> Self {
        match reply.usable_summary() {
            Some(summary) => SummarizeOutcome::Summary(summary.to_string()),
            None => SummarizeOutcome::MissingSummary,
        }
    }
}

#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn summarize(&self, text: &str) -> SummarizeOutcome;
}

pub struct HttpSummaryBackend {
    http: Client,
    endpoint: Url,
}

impl HttpSummaryBackend {
    pub fn new(server_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            endpoint: summarize_endpoint(server_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn summarize_endpoint(server_url: &str) -> Result<Url> {
    let mut base = Url::parse(server_url.trim())
        .with_context(|| format!("invalid server url '{server_url}'"))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(summarize_route().trim_start_matches('/'))
        .with_context(|| format!("cannot build summarize endpoint from '{server_url}'"))
}

#[async_trait]
impl SummaryBackend for HttpSummaryBackend {
    async fn summarize(&self, text: &str) -> SummarizeOutcome {
        let response = match self
            .http
            .post(self.endpoint.clone())
            .json(&SummarizeRequest {
                text: text.to_string(),
            })
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, endpoint = %self.endpoint, "summarize request failed");
                return SummarizeOutcome::TransportFailure(err.to_string());
            }
        };

        // Any JSON body counts as an answer, whatever the status; the relay's
        // 500 body classifies as a missing summary.
        let status = response.status();
        match response.json::<serde_json::Value>().await {
            Ok(body) => {
                debug!(%status, "summarize reply received");
                let reply = match serde_json::from_value::<SummarizeReply>(body) {
                    Ok(reply) => reply,
                    Err(err) => {
                        warn!(error = %err, %status, "summarize reply has unexpected shape");
                        SummarizeReply::default()
                    }
                };
                SummarizeOutcome::from_reply(reply)
            }
            Err(err) => {
                warn!(error = %err, %status, "summarize reply was not json");
                SummarizeOutcome::TransportFailure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
