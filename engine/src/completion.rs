//! Method-completion provider.
//!
//! Fires when the text before the cursor ends with the trigger character,
//! sends a trailing context window to the model, and splits the response
//! into newline-delimited candidates. Failures produce an empty list; the
//! caller cannot distinguish "no suggestions" from "call failed", which is
//! deliberate - completion is best-effort.

use std::sync::Arc;

use sage_providers::ModelClient;
use sage_types::{AnalysisRequest, TaskKind};

use crate::document::{Document, Position};
use crate::prompt;

/// Character that arms the provider.
pub const TRIGGER_CHARACTER: char = '.';

/// A single completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    label: String,
}

impl CompletionItem {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Shown next to the label so users can tell model candidates from the
    /// host's own.
    #[must_use]
    pub fn detail(&self) -> &'static str {
        "AI suggestion"
    }
}

/// Completion provider over an injected model client.
pub struct CompletionProvider {
    client: Arc<dyn ModelClient>,
    context_lines: usize,
}

impl CompletionProvider {
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>, context_lines: usize) -> Self {
        Self {
            client,
            context_lines,
        }
    }

    /// Produce candidates for `position` in `document`.
    ///
    /// Returns an empty list when the cursor is not behind the trigger
    /// character or when the model call fails.
    pub async fn complete(&self, document: &Document, position: Position) -> Vec<CompletionItem> {
        let prefix = document.line_prefix(position);
        if !prefix.ends_with(TRIGGER_CHARACTER) {
            return Vec::new();
        }

        let context = document.context_window(position, self.context_lines);
        let request =
            AnalysisRequest::for_document(document.id(), context, TaskKind::Completion);
        let prompt = prompt::build(request.task(), request.source());

        match self.client.generate(&prompt).await {
            Ok(text) => split_candidates(&text),
            Err(err) => {
                tracing::warn!(document = %document.id(), error = %err, "completion request failed");
                Vec::new()
            }
        }
    }
}

/// Newline-delimited candidates, blank lines dropped.
fn split_candidates(text: &str) -> Vec<CompletionItem> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(CompletionItem::new)
        .collect()
}
