use crate::{DocumentId, TaskKind};

/// A single analysis request: where the text came from, the text to send,
/// and the task describing what to ask for.
///
/// Requests are immutable once built and are discarded after the matching
/// response (or failure) has been consumed. Snippet generation is the one
/// task with no originating document; it uses [`AnalysisRequest::detached`].
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    document: Option<DocumentId>,
    source: String,
    task: TaskKind,
}

impl AnalysisRequest {
    #[must_use]
    pub fn for_document(document: DocumentId, source: impl Into<String>, task: TaskKind) -> Self {
        Self {
            document: Some(document),
            source: source.into(),
            task,
        }
    }

    #[must_use]
    pub fn detached(source: impl Into<String>, task: TaskKind) -> Self {
        Self {
            document: None,
            source: source.into(),
            task,
        }
    }

    #[must_use]
    pub fn document(&self) -> Option<DocumentId> {
        self.document
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn task(&self) -> &TaskKind {
        &self.task
    }
}
