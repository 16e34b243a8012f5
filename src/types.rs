//! Core payload type shared by the cache, the normalizer, and the facade.

use serde::{Deserialize, Serialize};

/// The unit of content a request resolves to.
///
/// Free-text requests resolve to [`Payload::Text`]; requests made with
/// `expect_structured` resolve to [`Payload::Structured`] holding the
/// parsed JSON value. The cache stores payloads as-is, so a hit returns
/// exactly what the original miss produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Structured(serde_json::Value),
    Text(String),
}

impl Payload {
    /// Borrow the text content, if this is a text payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Structured(_) => None,
        }
    }

    /// Borrow the structured value, if this is a structured payload.
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Structured(v) => Some(v),
            Payload::Text(_) => None,
        }
    }

    /// Approximate size in bytes, used for cache diagnostics.
    pub fn size_hint(&self) -> usize {
        match self {
            Payload::Text(s) => s.len(),
            Payload::Structured(v) => v.to_string().len(),
        }
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(v: serde_json::Value) -> Self {
        Payload::Structured(v)
    }
}
