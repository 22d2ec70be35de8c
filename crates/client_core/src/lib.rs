//! Renderer-independent client for the summary relay: view state, the pure
//! reducer, the HTTP backend and the controller tying them together.

pub mod backend;
pub mod controller;
pub mod state;

pub use backend::{HttpSummaryBackend, SummarizeOutcome, SummaryBackend};
pub use controller::{Clipboard, SummaryController};
pub use state::{
    reduce, Effect, ErrorNotice, Event, ViewState, COPY_FEEDBACK_WINDOW, ERROR_DISPLAY_WINDOW,
};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
