//! Command handlers.
//!
//! All seven palette commands share one shape: guard on the editor context,
//! build a task-specific prompt, make a single model call, present the raw
//! response. A failed call surfaces exactly one generic user-visible error;
//! the detail goes to the log. Handlers never retry and are independent of
//! each other.
//!
//! Every handler is a plain `async fn`, so each invocation is a future the
//! caller may drop to abandon the work before its next await point.

use std::sync::Arc;

use sage_config::Settings;
use sage_providers::{ModelClient, ModelError};
use sage_types::{AnalysisRequest, TaskKind};

use crate::document::{Document, Position, Selection};
use crate::present::Presenter;
use crate::{prompt, render};

const NO_ACTIVE_EDITOR: &str = "No active editor";

/// Editor state a command operates on: the active document, the current
/// selection, and the cursor.
#[derive(Debug, Clone)]
pub struct EditorContext {
    pub document: Document,
    pub selection: Selection,
    pub cursor: Position,
}

impl EditorContext {
    /// Context with the whole document selected and the cursor at its end.
    #[must_use]
    pub fn whole_document(document: Document) -> Self {
        let selection = Selection::all(document.text());
        let line = document.text().lines().count().saturating_sub(1);
        let column = document
            .text()
            .lines()
            .next_back()
            .map_or(0, |last| last.chars().count());
        Self {
            document,
            selection,
            cursor: Position::new(line, column),
        }
    }
}

/// The command handlers, bound to an injected model client and resolved
/// settings.
pub struct Assistant {
    client: Arc<dyn ModelClient>,
    settings: Settings,
}

impl Assistant {
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>, settings: Settings) -> Self {
        Self { client, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Document the selected code and insert the result as a block comment
    /// at the selection start.
    pub async fn generate_docs(
        &self,
        editor: Option<&EditorContext>,
        presenter: &mut dyn Presenter,
    ) {
        let Some(editor) = editor else {
            presenter.show_info(NO_ACTIVE_EDITOR);
            return;
        };

        let text = editor.document.slice(editor.selection);
        let request =
            AnalysisRequest::for_document(editor.document.id(), text, TaskKind::GenerateDocs);

        match self.generate(&request).await {
            Ok(documentation) => {
                let comment = render::block_comment(&documentation);
                presenter.insert_text(editor.document.id(), editor.selection.start, &comment);
            }
            Err(_) => presenter.show_error("Failed to generate documentation"),
        }
    }

    /// Analyze the whole document for bugs and render the findings in a
    /// panel.
    pub async fn analyze_bugs(
        &self,
        editor: Option<&EditorContext>,
        presenter: &mut dyn Presenter,
    ) {
        self.document_panel(
            editor,
            presenter,
            TaskKind::AnalyzeBugs,
            "Bug Analysis",
            "Failed to analyze code",
        )
        .await;
    }

    /// Suggest improvements for the code around the cursor; the response is
    /// shown as an informational message.
    pub async fn get_suggestions(
        &self,
        editor: Option<&EditorContext>,
        presenter: &mut dyn Presenter,
    ) {
        let Some(editor) = editor else {
            presenter.show_info(NO_ACTIVE_EDITOR);
            return;
        };

        let context = editor
            .document
            .context_window(editor.cursor, self.settings.context_lines());
        let request =
            AnalysisRequest::for_document(editor.document.id(), context, TaskKind::Suggestions);

        match self.generate(&request).await {
            Ok(suggestions) => presenter.show_info(&suggestions),
            Err(_) => presenter.show_error("Failed to get code suggestions"),
        }
    }

    /// Suggest refactorings for the whole document.
    pub async fn refactor_code(
        &self,
        editor: Option<&EditorContext>,
        presenter: &mut dyn Presenter,
    ) {
        self.document_panel(
            editor,
            presenter,
            TaskKind::Refactor,
            "Refactoring Suggestions",
            "Failed to generate refactoring suggestions",
        )
        .await;
    }

    /// Suggest performance optimizations for the whole document.
    pub async fn optimize_performance(
        &self,
        editor: Option<&EditorContext>,
        presenter: &mut dyn Presenter,
    ) {
        self.document_panel(
            editor,
            presenter,
            TaskKind::Optimize,
            "Performance Optimization Suggestions",
            "Failed to generate performance optimization suggestions",
        )
        .await;
    }

    /// Generate a snippet in `language` from a natural-language description
    /// and open it as a new document. The host collects both values (the
    /// language from [`Settings::snippet_languages`], the description from
    /// an input box).
    pub async fn generate_snippet(
        &self,
        language: &str,
        description: &str,
        presenter: &mut dyn Presenter,
    ) {
        if description.trim().is_empty() {
            presenter.show_info("No snippet description provided");
            return;
        }

        let task = TaskKind::Snippet {
            language: language.to_string(),
        };
        let request = AnalysisRequest::detached(description, task);

        match self.generate(&request).await {
            Ok(snippet) => presenter.open_document(language, &snippet),
            Err(_) => presenter.show_error("Failed to generate code snippet"),
        }
    }

    /// Scan the whole document for vulnerabilities at the configured level.
    pub async fn scan_security(
        &self,
        editor: Option<&EditorContext>,
        presenter: &mut dyn Presenter,
    ) {
        let Some(editor) = editor else {
            presenter.show_info(NO_ACTIVE_EDITOR);
            return;
        };

        let level = self.settings.scan_level().clone();
        let request = AnalysisRequest::for_document(
            editor.document.id(),
            editor.document.text(),
            TaskKind::SecurityScan {
                level: level.clone(),
            },
        );

        match self.generate(&request).await {
            Ok(analysis) => {
                let panel = render::security_panel("Security Scan Results", &level, &analysis);
                presenter.show_panel(panel);
            }
            Err(_) => presenter.show_error("Failed to perform security scan"),
        }
    }

    /// Shared shape of the whole-document panel commands.
    async fn document_panel(
        &self,
        editor: Option<&EditorContext>,
        presenter: &mut dyn Presenter,
        task: TaskKind,
        panel_title: &str,
        error_message: &str,
    ) {
        let Some(editor) = editor else {
            presenter.show_info(NO_ACTIVE_EDITOR);
            return;
        };

        let request =
            AnalysisRequest::for_document(editor.document.id(), editor.document.text(), task);

        match self.generate(&request).await {
            Ok(analysis) => presenter.show_panel(render::analysis_panel(panel_title, &analysis)),
            Err(_) => presenter.show_error(error_message),
        }
    }

    async fn generate(&self, request: &AnalysisRequest) -> Result<String, ModelError> {
        let prompt = prompt::build(request.task(), request.source());
        self.client.generate(&prompt).await.inspect_err(|err| {
            tracing::error!(
                task = request.task().name(),
                document = request.document().map(|id| id.value()),
                error = %err,
                "model call failed"
            );
        })
    }
}
