//! Host presentation surfaces.
//!
//! These types define the interface between the engine and whatever UI the
//! host provides. The engine never renders anything itself; every outcome
//! is pushed through a [`Presenter`], which test doubles implement by
//! recording calls.

use sage_types::DocumentId;

/// A rendered panel ready for a webview-style surface.
///
/// The HTML is built by [`crate::render`] with all untrusted content
/// escaped; hosts can hand it to a sandboxed view as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    title: String,
    html: String,
}

impl Panel {
    #[must_use]
    pub(crate) fn new(title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            html: html.into(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// A single entry for the host's diagnostics surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    /// 0-indexed line number.
    line: u32,
}

impl Diagnostic {
    #[must_use]
    pub fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// Sink for everything Sage wants the host to show.
pub trait Presenter: Send {
    /// Non-blocking informational message.
    fn show_info(&mut self, message: &str);
    /// User-visible error message.
    fn show_error(&mut self, message: &str);
    /// Insert `text` into `document` at byte `offset`.
    fn insert_text(&mut self, document: DocumentId, offset: usize, text: &str);
    /// Render a panel in a side surface.
    fn show_panel(&mut self, panel: Panel);
    /// Open a new document in `language` containing `content`.
    fn open_document(&mut self, language: &str, content: &str);
    /// Replace the diagnostics shown for `document`.
    fn publish_diagnostics(&mut self, document: DocumentId, diagnostics: Vec<Diagnostic>);
}
