use serde::{Deserialize, Serialize};

use crate::protocol::{ErrorBody, ORIGIN_REJECTED_MESSAGE, PROCESS_FAILED_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ProcessFailed,
    Timeout,
    OriginRejected,
    Internal,
}

impl ErrorCode {
    /// The fixed text sent over the wire for this code. Timeouts are
    /// reported exactly like any other process failure.
    pub fn public_message(self) -> &'static str {
        match self {
            ErrorCode::OriginRejected => ORIGIN_REJECTED_MESSAGE,
            ErrorCode::ProcessFailed | ErrorCode::Timeout | ErrorCode::Internal => {
                PROCESS_FAILED_MESSAGE
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Caller-facing body; `message` stays server-side.
    pub fn body(&self) -> ErrorBody {
        ErrorBody::new(self.code.public_message())
    }
}
