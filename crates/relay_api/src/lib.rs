use std::sync::Arc;

use shared::{
    error::{ApiError, ErrorCode},
    protocol::{SummarizeRequest, SummarizeResponse},
};
use tracing::error;

mod summarizer;

pub use summarizer::{ProcessSummarizer, SummarizeError, SummarizerClient};

#[derive(Clone)]
pub struct ApiContext {
    pub summarizer: Arc<dyn SummarizerClient>,
}

impl ApiContext {
    pub fn new(summarizer: impl SummarizerClient + 'static) -> Self {
        Self {
            summarizer: Arc::new(summarizer),
        }
    }
}

/// Runs one summarization round trip. The text is forwarded untouched; empty
/// input is the client's concern.
pub async fn summarize(
    ctx: &ApiContext,
    request: SummarizeRequest,
) -> Result<SummarizeResponse, ApiError> {
    let summary = ctx
        .summarizer
        .summarize(&request.text)
        .await
        .map_err(summarizer_failure)?;
    Ok(SummarizeResponse { summary })
}

fn summarizer_failure(err: SummarizeError) -> ApiError {
    if err.is_timeout() {
        error!(error = %err, "summarizer timed out; process killed");
        return ApiError::new(ErrorCode::Timeout, err.to_string());
    }
    match &err {
        SummarizeError::NonZeroExit { code, .. } => {
            error!(?code, "summarizer process failed");
            ApiError::new(ErrorCode::ProcessFailed, err.to_string())
        }
        _ => {
            error!(error = %err, "summarizer could not be run");
            ApiError::new(ErrorCode::Internal, err.to_string())
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
