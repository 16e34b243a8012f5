//! 请求门面：缓存、重试、归一化与错误分类的统一入口。
//!
//! The facade every feature screen calls through.
//!
//! [`AiClient::generate`] wires the layer's responsibilities into a single
//! entry point per logical request:
//!
//! 1. If caching is enabled, compute the cache key and attempt a lookup;
//!    a hit returns immediately.
//! 2. Otherwise run the upstream call through the retry executor.
//! 3. On success, normalize the response (parsing it when structured
//!    output was requested), insert into the cache, and return.
//! 4. On failure, classify the raw error and surface exactly one of the
//!    four taxonomy kinds.

mod classify;
mod options;

pub use options::GenerateOptions;

use crate::cache::{CacheKeyGenerator, CacheStats, ResponseCache, DEFAULT_MAX_ENTRIES};
use crate::normalize::normalize;
use crate::provider::{HostedModelProvider, ModelProvider};
use crate::retry::RetryPolicy;
use crate::types::Payload;
use crate::Result;
use classify::classify;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Unified entry point for model-generated content.
///
/// One instance is constructed at process start (no implicit singleton)
/// and shared by reference wherever recommendations are produced. The
/// cache it owns is process-local and non-durable: discarding the client
/// and recreating it at startup loses nothing that matters.
pub struct AiClient {
    provider: Arc<dyn ModelProvider>,
    cache: ResponseCache,
    keys: CacheKeyGenerator,
    retry: RetryPolicy,
}

impl AiClient {
    /// Client over the given provider with default cache and retry
    /// settings. Use [`AiClientBuilder`] for anything custom.
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            cache: ResponseCache::new(DEFAULT_MAX_ENTRIES),
            keys: CacheKeyGenerator::new(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn builder() -> AiClientBuilder {
        AiClientBuilder::new()
    }

    /// Resolve a prompt to a payload.
    ///
    /// Resolves to [`Payload::Text`] normally, or [`Payload::Structured`]
    /// when `options.expect_structured` is set. Fails with exactly one
    /// classified [`crate::Error`]; there is no degraded third outcome.
    pub async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<Payload> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        let key = self.keys.generate(prompt, options.expect_structured);

        if options.cache_enabled {
            if let Some(payload) = self.cache.lookup(&key) {
                debug!(
                    request_id = request_id.as_str(),
                    context = options.context.as_str(),
                    key = %key,
                    "serving response from cache"
                );
                return Ok(payload);
            }
        }

        let provider = Arc::clone(&self.provider);
        let prompt_owned = prompt.to_string();
        let outcome = self
            .retry
            .run(options.max_retries, move || {
                let provider = Arc::clone(&provider);
                let prompt = prompt_owned.clone();
                async move { provider.call_model(&prompt).await }
            })
            .await;

        let raw = match outcome {
            Ok(raw) => raw,
            Err(err) => {
                let classified = classify(&err, &options.context);
                warn!(
                    request_id = request_id.as_str(),
                    context = options.context.as_str(),
                    error_kind = classified.kind(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "model request failed"
                );
                return Err(classified);
            }
        };

        let payload = normalize(&raw, options.expect_structured)?;

        if options.cache_enabled {
            self.cache
                .insert(&key, payload.clone(), options.cache_ttl, &options.context);
        }

        info!(
            request_id = request_id.as_str(),
            context = options.context.as_str(),
            structured = options.expect_structured,
            duration_ms = start.elapsed().as_millis() as u64,
            "model request completed"
        );
        Ok(payload)
    }

    /// [`generate`](Self::generate) with default options.
    pub async fn generate_text(&self, prompt: &str) -> Result<Payload> {
        self.generate(prompt, GenerateOptions::default()).await
    }

    /// Drop every cached entry (manual refresh, tests).
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("response cache cleared");
    }

    /// Diagnostic snapshot of the cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Builder for [`AiClient`].
///
/// Keep this surface small and predictable: a provider, the cache bound,
/// the retry delay schedule, and an optional key salt.
pub struct AiClientBuilder {
    provider: Option<Arc<dyn ModelProvider>>,
    max_cache_entries: usize,
    retry: RetryPolicy,
    key_salt: Option<String>,
}

impl AiClientBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            max_cache_entries: DEFAULT_MAX_ENTRIES,
            retry: RetryPolicy::default(),
            key_salt: None,
        }
    }

    /// Use a specific provider (required for tests; production code may
    /// rely on [`build`](Self::build) constructing the hosted default).
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Bound on the number of cached entries.
    pub fn with_max_cache_entries(mut self, max: usize) -> Self {
        self.max_cache_entries = max;
        self
    }

    /// Retry delay schedule shared by all requests.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Salt the cache key space (e.g. per app release).
    pub fn with_key_salt(mut self, salt: impl Into<String>) -> Self {
        self.key_salt = Some(salt.into());
        self
    }

    /// Build the client, constructing the hosted default provider when
    /// none was supplied.
    pub fn build(self) -> Result<AiClient> {
        let provider: Arc<dyn ModelProvider> = match self.provider {
            Some(provider) => provider,
            None => Arc::new(
                HostedModelProvider::new_default().map_err(|e| classify(&e, "startup"))?,
            ),
        };
        let keys = match self.key_salt {
            Some(salt) => CacheKeyGenerator::new().with_salt(salt),
            None => CacheKeyGenerator::new(),
        };
        Ok(AiClient {
            provider,
            cache: ResponseCache::new(self.max_cache_entries),
            keys,
            retry: self.retry,
        })
    }
}

impl Default for AiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
