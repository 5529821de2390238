//! Editor document snapshots.
//!
//! The host owns the real buffers; Sage works on immutable snapshots taken
//! at event time. All accessors are total - out-of-range positions clamp
//! instead of panicking, since host coordinates can lag behind edits.

use sage_types::DocumentId;

/// Cursor position: 0-indexed line, column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Half-open byte range into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Selection covering all of `text`.
    #[must_use]
    pub fn all(text: &str) -> Self {
        Self {
            start: 0,
            end: text.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Immutable snapshot of a document open in the host.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    text: String,
}

impl Document {
    #[must_use]
    pub fn new(id: DocumentId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text covered by `selection`. Invalid ranges (out of bounds, not on
    /// a char boundary, inverted) yield the empty string.
    #[must_use]
    pub fn slice(&self, selection: Selection) -> &str {
        if selection.is_empty() {
            return "";
        }
        self.text.get(selection.start..selection.end).unwrap_or("")
    }

    /// The part of `position`'s line before the cursor.
    #[must_use]
    pub fn line_prefix(&self, position: Position) -> String {
        let Some(line) = self.text.lines().nth(position.line) else {
            return String::new();
        };
        line.chars().take(position.column).collect()
    }

    /// Trailing context window: up to `lines` full lines preceding
    /// `position`, plus the current line truncated at the cursor.
    #[must_use]
    pub fn context_window(&self, position: Position, lines: usize) -> String {
        let all: Vec<&str> = self.text.lines().collect();
        if all.is_empty() {
            return String::new();
        }

        let line = position.line.min(all.len().saturating_sub(1));
        let first = line.saturating_sub(lines);

        let mut window: Vec<String> = all[first..line].iter().map(ToString::to_string).collect();
        window.push(self.line_prefix(Position::new(line, position.column)));
        window.join("\n")
    }
}
