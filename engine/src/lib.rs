//! Core engine for Sage - command handling and orchestration.
//!
//! # Architecture
//!
//! Everything the host integrates with lives here:
//!
//! | Component | Role |
//! |-----------|------|
//! | [`Session`] | Explicit start/stop lifecycle owning the pieces below |
//! | [`Assistant`] | The seven palette command handlers |
//! | [`CompletionProvider`] | Dot-triggered method completion |
//! | [`DebouncedTrigger`] | Per-document quiescence timer driving background analysis |
//! | [`Presenter`] | Trait the host implements to render results |
//!
//! Control flow is always: host event → prompt construction → one call on
//! the injected [`ModelClient`](sage_providers::ModelClient) → presentation
//! of the raw response text. The engine holds no state beyond the
//! per-document timers in the trigger.

pub mod prompt;

mod commands;
mod completion;
mod debounce;
mod document;
mod present;
mod render;
mod session;

pub use commands::{Assistant, EditorContext};
pub use completion::{CompletionItem, CompletionProvider, TRIGGER_CHARACTER};
pub use debounce::{AnalysisSink, DebouncedTrigger};
pub use document::{Document, Position, Selection};
pub use present::{Diagnostic, Panel, Presenter};
pub use render::escape_html;
pub use session::{Command, Session, SessionError, SharedPresenter};

pub use sage_config::{ConfigError, SageConfig, Settings};
pub use sage_providers::{GeminiClient, ModelClient, ModelError};
pub use sage_types::{AnalysisRequest, ApiKey, DocumentId, ScanLevel, TaskKind};
