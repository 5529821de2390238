//! Session lifecycle.
//!
//! The host starts a session explicitly and stops it at most once; this
//! replaces framework-managed activation hooks. A stopped session rejects
//! every further operation instead of silently ignoring it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use sage_config::Settings;
use sage_providers::{ModelClient, ModelError};
use sage_types::DocumentId;

use crate::commands::{Assistant, EditorContext};
use crate::completion::{CompletionItem, CompletionProvider};
use crate::debounce::{AnalysisSink, DebouncedTrigger};
use crate::document::{Document, Position};
use crate::present::Presenter;

/// Shared, lockable handle to the host's presenter.
pub type SharedPresenter = Arc<Mutex<dyn Presenter>>;

/// The palette commands a host can invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GenerateDocs,
    AnalyzeBugs,
    GetSuggestions,
    RefactorCode,
    OptimizePerformance,
    GenerateSnippet { language: String, description: String },
    ScanSecurity,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is stopped")]
    Stopped,
}

/// A running Sage session.
///
/// Created by [`Session::start`]; torn down by [`Session::stop`] (idempotent)
/// or by dropping the session. All operations after `stop` fail with
/// [`SessionError::Stopped`].
pub struct Session {
    assistant: Assistant,
    completion: CompletionProvider,
    trigger: DebouncedTrigger,
    presenter: SharedPresenter,
    stopped: AtomicBool,
}

impl Session {
    /// Start a session over an injected model client and presenter.
    ///
    /// Credential validation happens earlier, in
    /// [`Settings::resolve`](sage_config::Settings::resolve); a session is
    /// only constructible from settings that already carry a key.
    #[must_use]
    pub fn start(
        settings: Settings,
        client: Arc<dyn ModelClient>,
        presenter: SharedPresenter,
    ) -> Self {
        let sink = Arc::new(DiagnosticsPublisher {
            presenter: Arc::clone(&presenter),
        });
        let trigger = DebouncedTrigger::new(settings.debounce(), Arc::clone(&client), sink);
        let completion = CompletionProvider::new(Arc::clone(&client), settings.context_lines());
        let assistant = Assistant::new(client, settings);

        Self {
            assistant,
            completion,
            trigger,
            presenter,
            stopped: AtomicBool::new(false),
        }
    }

    /// Run one palette command against the current editor state.
    pub async fn run(
        &self,
        command: Command,
        editor: Option<&EditorContext>,
    ) -> Result<(), SessionError> {
        self.ensure_running()?;
        let mut presenter = self.presenter.lock().await;
        let presenter = &mut *presenter;

        match command {
            Command::GenerateDocs => self.assistant.generate_docs(editor, presenter).await,
            Command::AnalyzeBugs => self.assistant.analyze_bugs(editor, presenter).await,
            Command::GetSuggestions => self.assistant.get_suggestions(editor, presenter).await,
            Command::RefactorCode => self.assistant.refactor_code(editor, presenter).await,
            Command::OptimizePerformance => {
                self.assistant.optimize_performance(editor, presenter).await;
            }
            Command::GenerateSnippet {
                language,
                description,
            } => {
                self.assistant
                    .generate_snippet(&language, &description, presenter)
                    .await;
            }
            Command::ScanSecurity => self.assistant.scan_security(editor, presenter).await,
        }
        Ok(())
    }

    /// Feed a document-change notification into the debounced trigger.
    pub fn document_changed(
        &self,
        document: DocumentId,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.ensure_running()?;
        self.trigger.document_changed(document, text);
        Ok(())
    }

    /// Produce completion candidates for `position` in `document`.
    pub async fn complete(
        &self,
        document: &Document,
        position: Position,
    ) -> Result<Vec<CompletionItem>, SessionError> {
        self.ensure_running()?;
        Ok(self.completion.complete(document, position).await)
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        self.assistant.settings()
    }

    /// Tear the session down: armed timers are aborted and outstanding
    /// analysis results are dropped. Safe to call more than once.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.trigger.shutdown();
        }
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.is_stopped() {
            Err(SessionError::Stopped)
        } else {
            Ok(())
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Routes debounced-analysis outcomes to the diagnostics surface.
///
/// Successful runs replace the document's diagnostics with an empty set;
/// the analysis text is not parsed into entries. Failed runs publish
/// nothing (the trigger has already logged them).
struct DiagnosticsPublisher {
    presenter: SharedPresenter,
}

#[async_trait]
impl AnalysisSink for DiagnosticsPublisher {
    async fn deliver(&self, document: DocumentId, outcome: Result<String, ModelError>) {
        if outcome.is_ok() {
            let mut presenter = self.presenter.lock().await;
            presenter.publish_diagnostics(document, Vec::new());
        }
    }
}
