use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("API key must not be empty")]
pub struct EmptyKeyError;

/// API credential for the model service.
///
/// The inner value is only reachable through [`ApiKey::expose_secret`],
/// and the `Debug` implementation redacts it so the key cannot leak
/// through logs or error formatting.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyKeyError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyKeyError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
