//! The upstream collaborator: a generative-content provider behind one
//! function signature.
//!
//! The request layer assumes nothing about the provider beyond
//! [`ModelProvider::call_model`]: prompt in, raw text out, failure as a
//! [`ProviderError`] carrying whatever the transport knows. Classification
//! into the caller-facing taxonomy happens in the facade, not here.

mod http;

pub use http::HostedModelProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Raw upstream failure, before classification.
///
/// Preserves the HTTP status when one exists so the classifier can match
/// on structured codes and only fall back to message heuristics when it
/// must.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection-level failure: DNS, TLS, timeout, reset.
    #[error("transport failure: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// No API key could be resolved for the provider.
    #[error("no API key configured for provider '{provider}'")]
    MissingApiKey { provider: String },

    /// The configured base URL does not parse.
    #[error("invalid provider base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A well-formed response that carried no usable content.
    #[error("provider response contained no content")]
    EmptyResponse,
}

impl ProviderError {
    /// The HTTP status associated with this failure, when one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// A generative-content provider that turns a prompt into raw text.
///
/// Implementations perform exactly one upstream attempt per call; the
/// retry loop lives above this boundary.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn call_model(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Short provider name for logs and diagnostics.
    fn name(&self) -> &'static str;
}
