//! Debounced, per-document analysis trigger.
//!
//! Document-change events arm a quiescence timer; only the last event in a
//! burst survives. When the timer fires, the text captured with that event
//! is sent to the model and the outcome is delivered to the sink - unless a
//! newer change has superseded the run, in which case the result is
//! dropped.
//!
//! Per-document states:
//!
//! - **idle** - no map entry, or an entry with no armed timer and no
//!   current run
//! - **armed** - an abortable sleep task is pending; a new change aborts
//!   and replaces it (cancel-then-set, no await in between)
//! - **running** - the model call is in flight; a new change arms a fresh
//!   timer without touching the call, and bumps the generation so the
//!   in-flight result is discarded on arrival
//!
//! At most one armed timer exists per document at any time. In-flight
//! calls are never aborted; superseding only suppresses their delivery.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use sage_providers::{ModelClient, ModelError};
use sage_types::{AnalysisRequest, DocumentId, TaskKind};

use crate::prompt;

/// Receives the outcome of each debounced analysis run.
#[async_trait]
pub trait AnalysisSink: Send + Sync {
    async fn deliver(&self, document: DocumentId, outcome: Result<String, ModelError>);
}

#[derive(Default)]
struct DocState {
    /// Bumped on every change event; a run only delivers while its own
    /// generation is still current.
    generation: u64,
    armed: Option<JoinHandle<()>>,
}

type StateMap = Arc<Mutex<HashMap<DocumentId, DocState>>>;

/// The debounced trigger. One instance serves all documents.
pub struct DebouncedTrigger {
    window: Duration,
    client: Arc<dyn ModelClient>,
    sink: Arc<dyn AnalysisSink>,
    states: StateMap,
}

impl DebouncedTrigger {
    #[must_use]
    pub fn new(window: Duration, client: Arc<dyn ModelClient>, sink: Arc<dyn AnalysisSink>) -> Self {
        Self {
            window,
            client,
            sink,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a change to `document`, whose full text is `text`.
    ///
    /// Re-arms the document's quiescence timer; after `window` without a
    /// further change, the text is analyzed and the outcome delivered to
    /// the sink.
    pub fn document_changed(&self, document: DocumentId, text: impl Into<String>) {
        let text = text.into();
        let window = self.window;
        let client = Arc::clone(&self.client);
        let sink = Arc::clone(&self.sink);
        let states = Arc::clone(&self.states);

        let mut guard = self.states.lock().expect("trigger state poisoned");
        let state = guard.entry(document).or_default();
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        // Cancel-then-set: the previous timer must be gone before the new
        // one is stored, with no suspension point in between.
        if let Some(armed) = state.armed.take() {
            armed.abort();
        }
        state.armed = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;

            // armed -> running: detach from the abortable handle first so
            // a later change event cannot abort the call mid-flight.
            {
                let mut guard = states.lock().expect("trigger state poisoned");
                let Some(state) = guard.get_mut(&document) else {
                    return;
                };
                if state.generation != generation {
                    return;
                }
                state.armed = None;
            }

            tokio::spawn(run_analysis(states, client, sink, document, generation, text));
        }));
    }

    /// Number of documents with an armed timer.
    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.states
            .lock()
            .expect("trigger state poisoned")
            .values()
            .filter(|state| state.armed.is_some())
            .count()
    }

    /// Abort every armed timer and invalidate outstanding runs. In-flight
    /// model calls finish on their own, but their results are dropped.
    pub fn shutdown(&self) {
        let mut guard = self.states.lock().expect("trigger state poisoned");
        for state in guard.values_mut() {
            state.generation = state.generation.wrapping_add(1);
            if let Some(armed) = state.armed.take() {
                armed.abort();
            }
        }
    }
}

impl Drop for DebouncedTrigger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_analysis(
    states: StateMap,
    client: Arc<dyn ModelClient>,
    sink: Arc<dyn AnalysisSink>,
    document: DocumentId,
    generation: u64,
    text: String,
) {
    let request = AnalysisRequest::for_document(document, text, TaskKind::Diagnostics);
    let prompt = prompt::build(request.task(), request.source());
    let outcome = client.generate(&prompt).await;

    if let Err(err) = &outcome {
        tracing::error!(document = %document, error = %err, "background analysis failed");
    }

    let superseded = {
        let guard = states.lock().expect("trigger state poisoned");
        guard
            .get(&document)
            .is_none_or(|state| state.generation != generation)
    };
    if superseded {
        tracing::debug!(document = %document, "dropping superseded analysis result");
        return;
    }

    sink.deliver(document, outcome).await;
}
