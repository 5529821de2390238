//! Configuration loading and resolution for Sage.
//!
//! Raw configuration is read from `~/.sage/config.toml` into [`SageConfig`],
//! where every field is optional. [`Settings::resolve`] turns that into the
//! validated, defaulted form the engine consumes. `${VAR}` references in the
//! API key are expanded from the environment before validation.

use serde::Deserialize;
use std::time::Duration;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use sage_types::{ApiKey, ScanLevel};

/// Model used when the config does not name one.
pub const DEFAULT_MODEL: &str = "gemini-pro";
/// Quiescence window for the debounced diagnostics trigger.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1500;
/// Lines of leading context sent with suggestion/completion prompts.
pub const DEFAULT_CONTEXT_LINES: usize = 10;

const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

fn default_snippet_languages() -> Vec<String> {
    ["javascript", "typescript", "python"]
        .map(String::from)
        .to_vec()
}

/// Raw on-disk configuration. All fields optional; see [`Settings`] for the
/// resolved form.
#[derive(Debug, Default, Deserialize)]
pub struct SageConfig {
    pub api: Option<ApiSection>,
    pub assist: Option<AssistSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    pub key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssistSection {
    pub snippet_languages: Option<Vec<String>>,
    pub security_scan_level: Option<String>,
    pub debounce_ms: Option<u64>,
    pub context_lines: Option<usize>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < value.len() {
        if value[i..].starts_with("${") {
            let start = i + 2;
            if let Some(end_rel) = value[start..].find('}') {
                let end = start + end_rel;
                let var = &value[start..end];
                if !var.is_empty() {
                    let replacement = env::var(var).unwrap_or_default();
                    out.push_str(&replacement);
                }
                i = end + 1;
                continue;
            }
        }

        let ch = value[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

impl SageConfig {
    /// Load from the default config path. Missing or unparseable files
    /// resolve to `None` (with a warning logged) rather than an error so a
    /// bad config never takes the whole session down.
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return None;
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                None
            }
        }
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sage").join("config.toml"))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no API key configured; set api.key in config.toml or the GEMINI_API_KEY environment variable"
    )]
    MissingApiKey,
}

/// Validated configuration consumed by the engine.
#[derive(Debug, Clone)]
pub struct Settings {
    api_key: ApiKey,
    model: String,
    base_url: Option<String>,
    max_output_tokens: u32,
    snippet_languages: Vec<String>,
    scan_level: ScanLevel,
    debounce: Duration,
    context_lines: usize,
}

impl Settings {
    /// Defaulted settings around a credential. Builder methods below adjust
    /// individual knobs; [`Settings::resolve`] maps a [`SageConfig`] onto
    /// them.
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            snippet_languages: default_snippet_languages(),
            scan_level: ScanLevel::default(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    /// Resolve raw config into settings, reading the credential from the
    /// config (with `${VAR}` expansion) or falling back to `GEMINI_API_KEY`.
    pub fn resolve(config: &SageConfig) -> Result<Self, ConfigError> {
        Self::resolve_with_env(config, env::var(API_KEY_ENV_VAR).ok())
    }

    fn resolve_with_env(config: &SageConfig, env_key: Option<String>) -> Result<Self, ConfigError> {
        let api = config.api.as_ref();
        let assist = config.assist.as_ref();

        let raw_key = api
            .and_then(|section| section.key.as_deref())
            .map(expand_env_vars)
            .filter(|key| !key.trim().is_empty())
            .or(env_key);
        let api_key = raw_key
            .and_then(|key| ApiKey::new(key).ok())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut settings = Self::new(api_key);

        if let Some(model) = api.and_then(|section| section.model.clone()) {
            settings = settings.with_model(model);
        }
        if let Some(base_url) = api.and_then(|section| section.base_url.clone()) {
            settings = settings.with_base_url(base_url);
        }
        if let Some(max) = api.and_then(|section| section.max_output_tokens) {
            settings.max_output_tokens = max;
        }
        if let Some(languages) = assist.and_then(|section| section.snippet_languages.clone()) {
            settings = settings.with_snippet_languages(languages);
        }
        if let Some(level) = assist.and_then(|section| section.security_scan_level.as_deref()) {
            settings = settings.with_scan_level(ScanLevel::new(level));
        }
        if let Some(ms) = assist.and_then(|section| section.debounce_ms) {
            settings = settings.with_debounce(Duration::from_millis(ms));
        }
        if let Some(lines) = assist.and_then(|section| section.context_lines) {
            settings.context_lines = lines;
        }

        Ok(settings)
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_snippet_languages(mut self, languages: Vec<String>) -> Self {
        self.snippet_languages = languages;
        self
    }

    #[must_use]
    pub fn with_scan_level(mut self, level: ScanLevel) -> Self {
        self.scan_level = level;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    #[must_use]
    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    #[must_use]
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    #[must_use]
    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    #[must_use]
    pub fn snippet_languages(&self) -> &[String] {
        &self.snippet_languages
    }

    #[must_use]
    pub fn scan_level(&self) -> &ScanLevel {
        &self.scan_level
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    #[must_use]
    pub fn context_lines(&self) -> usize {
        self.context_lines
    }
}
