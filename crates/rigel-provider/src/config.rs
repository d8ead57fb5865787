//! Backend configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Configuration for a backend instance.
///
/// The time limits are handed through to the compiler/executor unchanged;
/// the pipeline itself enforces no timeout.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// API endpoint URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Authentication token.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Time limit for compiler requests, in seconds.
    #[serde(default = "default_timeout")]
    pub compiler_timeout: f64,
    /// Time limit for execution requests, in seconds.
    #[serde(default = "default_timeout")]
    pub execution_timeout: f64,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_timeout() -> f64 {
    5.0
}

impl BackendConfig {
    /// Create a new backend configuration with default time limits.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            token: None,
            compiler_timeout: default_timeout(),
            execution_timeout: default_timeout(),
            extra: serde_json::Map::new(),
        }
    }

    /// Set the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the authentication token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the compiler time limit in seconds.
    #[must_use]
    pub fn with_compiler_timeout(mut self, seconds: f64) -> Self {
        self.compiler_timeout = seconds;
        self
    }

    /// Set the execution time limit in seconds.
    #[must_use]
    pub fn with_execution_timeout(mut self, seconds: f64) -> Self {
        self.execution_timeout = seconds;
        self
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .field("compiler_timeout", &self.compiler_timeout)
            .field("execution_timeout", &self.execution_timeout)
            .field("extra", &self.extra)
            .finish()
    }
}
