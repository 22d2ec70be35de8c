//! Single-writer owner of the [`ViewState`].

use std::collections::VecDeque;

use tokio::sync::{mpsc, watch};
use tracing::warn;

use crate::{
    backend::SummaryBackend,
    state::{reduce, Effect, Event, ViewState},
};

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Drives [`reduce`] and runs the effects it asks for. Timers run as
/// detached tasks and report back through an internal channel; call
/// [`SummaryController::apply_next_timer`] to fold them into the state.
pub struct SummaryController<B, C> {
    backend: B,
    clipboard: C,
    state: watch::Sender<ViewState>,
    timer_tx: mpsc::UnboundedSender<Event>,
    timer_rx: mpsc::UnboundedReceiver<Event>,
}

impl<B: SummaryBackend, C: Clipboard> SummaryController<B, C> {
    pub fn new(backend: B, clipboard: C) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            clipboard,
            state,
            timer_tx,
            timer_rx,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Observers see every transition, including `loading` while a request
    /// is in flight.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub async fn edit_text(&mut self, text: impl Into<String>) {
        self.handle(Event::TextEdited(text.into())).await;
    }

    pub async fn submit(&mut self) {
        self.handle(Event::SubmitRequested).await;
    }

    pub async fn clear(&mut self) {
        self.handle(Event::ClearRequested).await;
    }

    pub async fn copy_to_clipboard(&mut self) {
        self.handle(Event::CopyRequested).await;
    }

    pub async fn dismiss_error(&mut self) {
        self.handle(Event::ErrorDismissed).await;
    }

    pub async fn toggle_about(&mut self, visible: bool) {
        self.handle(Event::AboutToggled(visible)).await;
    }

    /// Waits for the next timer to fire and applies it.
    pub async fn apply_next_timer(&mut self) {
        if let Some(event) = self.timer_rx.recv().await {
            self.handle(event).await;
        }
    }

    pub async fn handle(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let (next, effects) = {
                let current = self.state.borrow();
                reduce(&current, event)
            };
            self.state.send_replace(next);

            for effect in effects {
                match effect {
                    Effect::SendRequest { text } => {
                        let outcome = self.backend.summarize(&text).await;
                        queue.push_back(Event::ResponseSettled(outcome));
                    }
                    Effect::WriteClipboard { text } => {
                        if let Err(error) = self.clipboard.set_text(&text) {
                            warn!(%error, "failed to copy summary to clipboard");
                        }
                    }
                    Effect::Schedule { after, event } => {
                        let tx = self.timer_tx.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(after).await;
                            let _ = tx.send(event);
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
