use serde::{Deserialize, Serialize};

/// Shown by the relay for every failed summarization, whatever the cause.
pub const PROCESS_FAILED_MESSAGE: &str = "Python process failed";
/// Body message for requests rejected by the origin allow-list.
pub const ORIGIN_REJECTED_MESSAGE: &str = "Not allowed by CORS";

pub const VALIDATION_MESSAGE: &str = "Please enter some text to summarize";
pub const GENERATION_FAILED_MESSAGE: &str = "Error generating summary";
pub const CONNECTION_FAILED_MESSAGE: &str = "Error connecting to backend";

pub fn summarize_route() -> &'static str {
    "/summarize"
}

pub fn healthz_route() -> &'static str {
    "/healthz"
}

/// Body of `POST /summarize`, and the single JSON document written to the
/// summarizer's stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Lenient client-side view of any `/summarize` reply. Both fields are
/// optional so that error bodies and unexpected JSON still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SummarizeReply {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SummarizeReply {
    /// The summary, if the relay sent a non-empty one.
    pub fn usable_summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|summary| !summary.is_empty())
    }
}
