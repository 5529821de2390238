//! Assistance task kinds and their prompt parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Intensity of a security scan.
///
/// The value is interpolated into the scan prompt and shown in the
/// results panel; beyond trimming, the core does not constrain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanLevel(String);

impl ScanLevel {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ScanLevel {
    fn default() -> Self {
        Self("standard".to_string())
    }
}

impl fmt::Display for ScanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of assistance being requested from the model.
///
/// Variants carry the per-task prompt parameters; the source text itself
/// travels separately in [`crate::AnalysisRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Document the selected code.
    GenerateDocs,
    /// Analyze the whole document for bugs.
    AnalyzeBugs,
    /// Suggest improvements for the code around the cursor.
    Suggestions,
    /// Suggest refactorings for the whole document.
    Refactor,
    /// Suggest performance optimizations for the whole document.
    Optimize,
    /// Generate a snippet in `language` from a natural-language description.
    Snippet { language: String },
    /// Scan the whole document for vulnerabilities at `level`.
    SecurityScan { level: ScanLevel },
    /// Background analysis driving the diagnostics surface.
    Diagnostics,
    /// Method-completion candidates for the text before the cursor.
    Completion,
}

impl TaskKind {
    /// Stable name, used for logging and presenter labels.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::GenerateDocs => "generate-docs",
            TaskKind::AnalyzeBugs => "analyze-bugs",
            TaskKind::Suggestions => "suggestions",
            TaskKind::Refactor => "refactor",
            TaskKind::Optimize => "optimize",
            TaskKind::Snippet { .. } => "snippet",
            TaskKind::SecurityScan { .. } => "security-scan",
            TaskKind::Diagnostics => "diagnostics",
            TaskKind::Completion => "completion",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
