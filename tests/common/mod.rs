//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sage_config::Settings;
use sage_engine::{Diagnostic, DocumentId, Panel, Presenter};
use sage_providers::{ModelClient, ModelError};
use sage_types::ApiKey;

/// Settings with a test credential, a short debounce, and defaults
/// everywhere else.
pub fn test_settings() -> Settings {
    Settings::new(ApiKey::new("test-key").unwrap()).with_debounce(Duration::from_millis(20))
}

/// Scripted model client: returns the same outcome for every call and
/// records the prompts it received.
pub struct StubClient {
    outcome: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn responding(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            outcome: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for StubClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.outcome {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ModelError::Api { status: *status }),
        }
    }
}

/// Presenter double that records every call and maintains editable
/// buffers so insertions can be asserted against the final text.
#[derive(Default)]
pub struct RecordingPresenter {
    pub infos: Vec<String>,
    pub errors: Vec<String>,
    pub panels: Vec<Panel>,
    pub opened_documents: Vec<(String, String)>,
    pub diagnostics: Vec<(DocumentId, Vec<Diagnostic>)>,
    pub buffers: HashMap<DocumentId, String>,
}

impl RecordingPresenter {
    pub fn with_buffer(document: DocumentId, text: &str) -> Self {
        let mut presenter = Self::default();
        presenter.buffers.insert(document, text.to_string());
        presenter
    }

    pub fn buffer(&self, document: DocumentId) -> &str {
        self.buffers.get(&document).map_or("", String::as_str)
    }
}

impl Presenter for RecordingPresenter {
    fn show_info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn insert_text(&mut self, document: DocumentId, offset: usize, text: &str) {
        let buffer = self.buffers.entry(document).or_default();
        if offset <= buffer.len() {
            buffer.insert_str(offset, text);
        }
    }

    fn show_panel(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    fn open_document(&mut self, language: &str, content: &str) {
        self.opened_documents
            .push((language.to_string(), content.to_string()));
    }

    fn publish_diagnostics(&mut self, document: DocumentId, diagnostics: Vec<Diagnostic>) {
        self.diagnostics.push((document, diagnostics));
    }
}

/// Start a mock server that simulates the Gemini API.
pub async fn start_gemini_mock() -> MockServer {
    MockServer::start().await
}

/// Mount a successful generateContent response for `model`.
pub async fn mount_generate_content(server: &MockServer, model: &str, response_text: &str) {
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": response_text }]
            },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 10,
            "candidatesTokenCount": 20
        }
    });

    Mock::given(method("POST"))
        .and(path(format!("/models/{model}:generateContent")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
