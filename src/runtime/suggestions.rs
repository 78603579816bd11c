//! Debounced tag-suggestion worker.
//!
//! [`suggestion_pipeline`] splits the pipeline into a cheap [`SuggestionHandle`]
//! for the input box and a [`SuggestionWorker`] that owns the state machine.
//! The worker waits on three things at once: new input, the debounce deadline,
//! and whichever fetches are still in flight. Replies may land in any order;
//! the machine's generation check decides which ones count.

use crate::model::{Generation, SuggestionFetchError, TagOption};
use crate::source::TagSource;
use crate::state::{SuggestionMachine, SuggestionRequest, SuggestionSettings};
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

type PendingFetch<'a> =
    LocalBoxFuture<'a, (Generation, Result<Vec<TagOption>, SuggestionFetchError>)>;

/// Input from the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionInput {
    /// The raw text changed.
    Text(String),
    /// A suggestion was picked.
    Accept(String),
}

/// What the search box should render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionSnapshot {
    pub text: String,
    pub candidates: Vec<String>,
    /// A fetch for the current token is outstanding.
    pub pending: bool,
    pub generation: Generation,
}

impl SuggestionSnapshot {
    fn of(machine: &SuggestionMachine) -> Self {
        Self {
            text: machine.text().to_string(),
            candidates: machine.candidates().to_vec(),
            pending: machine.is_pending(),
            generation: machine.state().generation(),
        }
    }
}

/// Sending side, held by the input box.
#[derive(Debug, Clone)]
pub struct SuggestionHandle {
    inputs: mpsc::UnboundedSender<SuggestionInput>,
    snapshots: watch::Receiver<SuggestionSnapshot>,
}

impl SuggestionHandle {
    /// Report the current raw text. Returns false once the worker is gone.
    pub fn input(&self, text: impl Into<String>) -> bool {
        self.inputs.send(SuggestionInput::Text(text.into())).is_ok()
    }

    /// Report that `suggestion` was picked. Returns false once the worker is gone.
    pub fn accept(&self, suggestion: impl Into<String>) -> bool {
        self.inputs
            .send(SuggestionInput::Accept(suggestion.into()))
            .is_ok()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> SuggestionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<SuggestionSnapshot> {
        self.snapshots.clone()
    }
}

/// Owner of the suggestion state machine.
pub struct SuggestionWorker<T> {
    source: T,
    machine: SuggestionMachine,
    inputs: mpsc::UnboundedReceiver<SuggestionInput>,
    snapshots: watch::Sender<SuggestionSnapshot>,
}

/// Build a connected handle and worker.
pub fn suggestion_pipeline<T: TagSource>(
    source: T,
    settings: SuggestionSettings,
) -> (SuggestionHandle, SuggestionWorker<T>) {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(SuggestionSnapshot::default());

    let handle = SuggestionHandle {
        inputs: input_tx,
        snapshots: snapshot_rx,
    };
    let worker = SuggestionWorker {
        source,
        machine: SuggestionMachine::new(settings),
        inputs: input_rx,
        snapshots: snapshot_tx,
    };
    (handle, worker)
}

impl<T: TagSource> SuggestionWorker<T> {
    pub fn machine(&self) -> &SuggestionMachine {
        &self.machine
    }

    /// Drive the pipeline.
    ///
    /// Returns the final machine once every handle is dropped and no window
    /// or fetch is left open.
    pub async fn run(self) -> SuggestionMachine {
        let Self {
            source,
            mut machine,
            mut inputs,
            snapshots,
        } = self;

        let mut in_flight: FuturesUnordered<PendingFetch<'_>> = FuturesUnordered::new();
        let mut inputs_open = true;

        loop {
            let deadline = machine.deadline();
            if !inputs_open && deadline.is_none() && in_flight.is_empty() {
                break;
            }

            tokio::select! {
                input = inputs.recv(), if inputs_open => match input {
                    Some(SuggestionInput::Text(text)) => machine.on_input(text, Instant::now()),
                    Some(SuggestionInput::Accept(value)) => {
                        let text = machine.accept(&value);
                        debug!(text, "suggestion accepted");
                    }
                    None => {
                        debug!("suggestion inputs closed");
                        inputs_open = false;
                    }
                },
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(request) = machine.on_deadline(Instant::now()) {
                        in_flight.push(fetch(&source, request).boxed_local());
                    }
                }
                Some((generation, result)) = in_flight.next(), if !in_flight.is_empty() => {
                    machine.on_response(generation, result);
                }
            }

            let next = SuggestionSnapshot::of(&machine);
            snapshots.send_if_modified(|current| {
                if *current == next {
                    false
                } else {
                    *current = next;
                    true
                }
            });
        }

        machine
    }
}

async fn fetch<T: TagSource>(
    source: &T,
    request: SuggestionRequest,
) -> (Generation, Result<Vec<TagOption>, SuggestionFetchError>) {
    let result = source
        .suggest(&request.token)
        .await
        .map_err(|err| SuggestionFetchError {
            token: request.token.clone(),
            source: err,
        });
    (request.generation, result)
}

#[cfg(test)]
#[path = "suggestions_tests.rs"]
mod tests;
