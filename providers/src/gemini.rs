//! Google Gemini API implementation.
//!
//! Communicates with
//! `https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent`.
//!
//! The request carries the prompt as a single `user` content entry plus a
//! `generationConfig`; the response text is the concatenation of the first
//! candidate's parts. Note the API's mixed casing: `contents` is lowercase,
//! `generationConfig`/`maxOutputTokens` are camelCase.

use async_trait::async_trait;
use serde_json::{Value, json};

use sage_types::ApiKey;

use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};
use crate::{GEMINI_API_BASE_URL, ModelClient, ModelError, read_capped_error_body};

const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Client for the Gemini GenerateContent API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
    max_output_tokens: u32,
    retry: RetryConfig,
}

impl GeminiClient {
    #[must_use]
    pub fn new(api_key: ApiKey, model: impl Into<String>) -> Self {
        Self {
            client: crate::hardened_client(),
            api_key,
            model: model.into(),
            base_url: GEMINI_API_BASE_URL.to_string(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            retry: RetryConfig::default(),
        }
    }

    /// Point the client at a different endpoint (local mock servers).
    ///
    /// The override also relaxes the HTTPS-only transport requirement,
    /// which production construction keeps enabled.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.client = crate::local_client();
        self
    }

    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

fn build_request_body(prompt: &str, max_output_tokens: u32) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "maxOutputTokens": max_output_tokens,
            "temperature": 1.0
        }
    })
}

/// Pull the response text out of a GenerateContent payload.
///
/// The first candidate's parts are concatenated; Gemini may split one
/// logical answer across several parts.
fn extract_text(data: &Value) -> Result<String, ModelError> {
    let candidates = data
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or_else(|| ModelError::InvalidResponse("missing 'candidates'".to_string()))?;

    let Some(first) = candidates.first() else {
        return Err(ModelError::EmptyResponse);
    };

    let parts = first
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| ModelError::InvalidResponse("missing 'content.parts'".to_string()))?;

    let mut text = String::new();
    for part in parts {
        if let Some(fragment) = part.get("text").and_then(Value::as_str) {
            text.push_str(fragment);
        }
    }

    if text.trim().is_empty() {
        Err(ModelError::EmptyResponse)
    } else {
        Ok(text)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = self.request_url();
        let body = build_request_body(prompt, self.max_output_tokens);

        let outcome = send_with_retry(
            || {
                self.client
                    .post(&url)
                    .header("x-goog-api-key", self.api_key.expose_secret())
                    .header("content-type", "application/json")
                    .json(&body)
            },
            &self.retry,
        )
        .await;

        let response = match outcome {
            RetryOutcome::Success(response) => response,
            RetryOutcome::HttpError(response) => {
                let status = response.status().as_u16();
                let error_text = read_capped_error_body(response).await;
                tracing::error!(status, body = %error_text, "Gemini API error");
                return Err(ModelError::Api { status });
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                tracing::error!(attempts, error = %source, "Gemini request failed");
                return Err(ModelError::Transport(source));
            }
            RetryOutcome::NonRetryable(source) => {
                tracing::error!(error = %source, "Gemini request failed");
                return Err(ModelError::Transport(source));
            }
        };

        let data: Value = response.json().await?;
        extract_text(&data)
    }
}
