//! View state and its pure transition function.
//!
//! `reduce` never performs I/O. Anything with a side effect (the HTTP call,
//! the clipboard write, timers) comes back as an [`Effect`] for the
//! controller to run.

use std::time::Duration;

use serde::Serialize;
use shared::protocol::{CONNECTION_FAILED_MESSAGE, GENERATION_FAILED_MESSAGE, VALIDATION_MESSAGE};

use crate::backend::SummarizeOutcome;

pub const ERROR_DISPLAY_WINDOW: Duration = Duration::from_secs(3);
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub message: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub text: String,
    pub summary: String,
    pub loading: bool,
    pub error: Option<ErrorNotice>,
    pub copied: bool,
    pub about_visible: bool,
    #[serde(skip)]
    generation: u64,
    #[serde(skip)]
    copy_generation: u64,
}

impl ViewState {
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|notice| notice.message.as_str())
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    TextEdited(String),
    SubmitRequested,
    ResponseSettled(SummarizeOutcome),
    ClearRequested,
    CopyRequested,
    CopyExpired { generation: u64 },
    ErrorDismissed,
    ErrorExpired { generation: u64 },
    AboutToggled(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendRequest { text: String },
    WriteClipboard { text: String },
    Schedule { after: Duration, event: Event },
}

pub fn reduce(state: &ViewState, event: Event) -> (ViewState, Vec<Effect>) {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        Event::TextEdited(text) => next.text = text,
        // Single-flight: the generate action is disabled while loading.
        Event::SubmitRequested if next.loading => {}
        Event::SubmitRequested => {
            if next.text.trim().is_empty() {
                raise_error(&mut next, &mut effects, VALIDATION_MESSAGE);
            } else {
                next.loading = true;
                effects.push(Effect::SendRequest {
                    text: next.text.clone(),
                });
            }
        }
        Event::ResponseSettled(outcome) => {
            next.loading = false;
            match outcome {
                SummarizeOutcome::Summary(summary) => {
                    next.summary = summary;
                    next.error = None;
                }
                // The previous summary stays on screen in both failure cases.
                SummarizeOutcome::MissingSummary => {
                    raise_error(&mut next, &mut effects, GENERATION_FAILED_MESSAGE)
                }
                SummarizeOutcome::TransportFailure(_) => {
                    raise_error(&mut next, &mut effects, CONNECTION_FAILED_MESSAGE)
                }
            }
        }
        Event::ClearRequested => {
            if !next.loading {
                next.text.clear();
                next.summary.clear();
            }
        }
        Event::CopyRequested => {
            if !next.summary.is_empty() {
                let generation = next.next_generation();
                next.copied = true;
                next.copy_generation = generation;
                effects.push(Effect::WriteClipboard {
                    text: next.summary.clone(),
                });
                effects.push(Effect::Schedule {
                    after: COPY_FEEDBACK_WINDOW,
                    event: Event::CopyExpired { generation },
                });
            }
        }
        Event::CopyExpired { generation } => {
            if next.copy_generation == generation {
                next.copied = false;
            }
        }
        Event::ErrorDismissed => next.error = None,
        Event::ErrorExpired { generation } => {
            if next
                .error
                .as_ref()
                .is_some_and(|notice| notice.generation == generation)
            {
                next.error = None;
            }
        }
        Event::AboutToggled(visible) => next.about_visible = visible,
    }

    (next, effects)
}

fn raise_error(state: &mut ViewState, effects: &mut Vec<Effect>, message: &str) {
    let generation = state.next_generation();
    state.error = Some(ErrorNotice {
        message: message.to_string(),
        generation,
    });
    effects.push(Effect::Schedule {
        after: ERROR_DISPLAY_WINDOW,
        event: Event::ErrorExpired { generation },
    });
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
