//! Per-request configuration.

use std::time::Duration;

/// Options accompanying one [`crate::AiClient::generate`] call.
///
/// Only `expect_structured` affects cache identity; everything else is
/// transport or diagnostics and leaves the key untouched.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Whether this request may be served from or written to the cache.
    pub cache_enabled: bool,
    /// Validity window for a cached entry.
    pub cache_ttl: Duration,
    /// Whether the raw text response must parse into structured data.
    /// Parse failure is then a hard error, not a soft fallback.
    pub expect_structured: bool,
    /// Total number of upstream attempts before giving up.
    pub max_retries: u32,
    /// Opaque label for logging and diagnostics (e.g. which feature
    /// screen issued the request). Does not affect cache identity.
    pub context: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl: Duration::from_millis(300_000),
            expect_structured: false,
            max_retries: 3,
            context: "general".to_string(),
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_expect_structured(mut self, expect: bool) -> Self {
        self.expect_structured = expect;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Shorthand for a request that must return structured data.
    pub fn structured() -> Self {
        Self::default().with_expect_structured(true)
    }
}
