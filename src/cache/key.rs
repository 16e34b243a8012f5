//! Cache key generation.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Deterministic fingerprint of a request's prompt and response-affecting
/// options.
///
/// Two requests with identical prompt and identical response-affecting
/// options produce the same key and intentionally collide; dedup is the
/// point. Options that only affect transport (retry count, TTL, the
/// diagnostic context label) never participate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    hash: String,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Generates cache keys from request parameters.
///
/// The canonical form is a sorted map serialized to JSON and hashed with
/// SHA-256, so field ordering can never change the key. An optional salt
/// partitions key spaces (used by tests and by deployments that share a
/// process across app versions).
pub struct CacheKeyGenerator {
    salt: Option<String>,
}

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self { salt: None }
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Generate the key for a prompt plus its response-affecting options.
    ///
    /// `expect_structured` changes the shape of the payload a request
    /// resolves to, so it is part of identity. Nothing else is.
    pub fn generate(&self, prompt: &str, expect_structured: bool) -> CacheKey {
        let mut parts: BTreeMap<&str, String> = BTreeMap::new();
        parts.insert("prompt", prompt.to_string());
        parts.insert("expect_structured", expect_structured.to_string());
        if let Some(ref s) = self.salt {
            parts.insert("salt", s.clone());
        }
        let canonical = serde_json::to_string(&parts).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        CacheKey::new(hash)
    }
}

impl Default for CacheKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_collide() {
        let gen = CacheKeyGenerator::new();
        let a = gen.generate("recommend three electives", false);
        let b = gen.generate("recommend three electives", false);
        assert_eq!(a, b);
    }

    #[test]
    fn structured_flag_changes_identity() {
        let gen = CacheKeyGenerator::new();
        let text = gen.generate("recommend three electives", false);
        let structured = gen.generate("recommend three electives", true);
        assert_ne!(text, structured);
    }

    #[test]
    fn different_prompts_differ() {
        let gen = CacheKeyGenerator::new();
        let a = gen.generate("essay feedback", false);
        let b = gen.generate("schedule optimization", false);
        assert_ne!(a, b);
    }

    #[test]
    fn salt_partitions_key_space() {
        let plain = CacheKeyGenerator::new();
        let salted = CacheKeyGenerator::new().with_salt("v2");
        assert_ne!(
            plain.generate("same prompt", false),
            salted.generate("same prompt", false)
        );
    }
}
