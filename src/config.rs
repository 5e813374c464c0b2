//! Mock mode configuration.
//!
//! A [`MockConfig`] is handed to each [`Client`](crate::Client) at build time
//! and shared by all clones of that client. Flipping it on makes every call
//! answer from the [mock router](crate::mock) instead of the network.

use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Environment variable toggling mock mode.
pub const MOCK_ENV_VAR: &str = "SGAI_MOCK";

/// Environment variable conventionally holding the API key.
pub const API_KEY_ENV_VAR: &str = "SGAI_APIKEY";

const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];

/// Boxed error returned by custom mock handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Custom handler invoked with `(method, url)` before any other mock rule.
pub type MockHandler =
    Arc<dyn Fn(&Method, &str) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// Canned response registered for a URL path.
#[derive(Clone)]
pub enum MockResponse {
    /// Returned as-is.
    Static(Value),
    /// Evaluated on every call.
    Lazy(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl MockResponse {
    /// Wrap a closure producing the response lazily.
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        MockResponse::Lazy(Arc::new(f))
    }

    pub(crate) fn resolve(&self) -> Value {
        match self {
            MockResponse::Static(v) => v.clone(),
            MockResponse::Lazy(f) => f(),
        }
    }
}

impl From<Value> for MockResponse {
    fn from(value: Value) -> Self {
        MockResponse::Static(value)
    }
}

impl fmt::Debug for MockResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockResponse::Static(v) => f.debug_tuple("Static").field(v).finish(),
            MockResponse::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Mock mode settings.
#[derive(Clone)]
pub struct MockConfig {
    /// Whether calls are answered by the mock router.
    pub enabled: bool,
    /// Responses keyed by URL path, e.g. `/v1/credits`.
    pub custom_responses: HashMap<String, MockResponse>,
    /// Handler consulted before everything else.
    pub custom_handler: Option<MockHandler>,
}

impl MockConfig {
    /// Enabled configuration without overrides.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::disabled()
        }
    }

    /// Disabled configuration without overrides.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            custom_responses: HashMap::new(),
            custom_handler: None,
        }
    }

    /// Register a response for a URL path.
    pub fn with_response(
        mut self,
        path: impl Into<String>,
        response: impl Into<MockResponse>,
    ) -> Self {
        self.custom_responses.insert(path.into(), response.into());
        self
    }

    /// Install a custom handler.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Method, &str) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.custom_handler = Some(Arc::new(handler));
        self
    }
}

/// Seeds `enabled` from [`MOCK_ENV_VAR`].
impl Default for MockConfig {
    fn default() -> Self {
        Self {
            enabled: mock_enabled_from_env(),
            ..Self::disabled()
        }
    }
}

impl fmt::Debug for MockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&String> = self.custom_responses.keys().collect();
        paths.sort();
        f.debug_struct("MockConfig")
            .field("enabled", &self.enabled)
            .field("custom_responses", &paths)
            .field("custom_handler", &self.custom_handler.is_some())
            .finish()
    }
}

/// Whether [`MOCK_ENV_VAR`] asks for mock mode.
pub fn mock_enabled_from_env() -> bool {
    is_truthy(std::env::var(MOCK_ENV_VAR).ok().as_deref())
}

fn is_truthy(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim();
            TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(v))
        }
        None => false,
    }
}
