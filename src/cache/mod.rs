//! 响应缓存模块：在有界空间和有界时间内记忆成功的模型响应。
//!
//! # Response Caching Module
//!
//! Memoizes successful model responses for a bounded time and bounded
//! space, so that identical requests issued while an entry is live are
//! served without touching the upstream endpoint.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | Bounded FIFO store with per-entry TTL |
//! | [`CacheKey`] | Deterministic request fingerprint |
//! | [`CacheKeyGenerator`] | Key derivation from prompt + response-affecting options |
//! | [`CacheStats`] | Diagnostic snapshot (size, entries, hit counters) |
//!
//! ## Identity
//!
//! Keys are derived from the prompt text plus every option that affects
//! the response shape (`expect_structured`). Transport-only options such
//! as the retry budget never participate: they don't change the expected
//! output, so requests differing only in transport settings still dedup.
//!
//! A cache hit never triggers a retry, an upstream call, or error
//! classification; it is always cheaper than a miss.

mod key;
mod store;

pub use key::{CacheKey, CacheKeyGenerator};
pub use store::{CacheEntryInfo, CacheStats, ResponseCache, DEFAULT_MAX_ENTRIES};
