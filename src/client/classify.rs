//! Error classification.
//!
//! Maps raw upstream failures onto the small caller-facing taxonomy.
//! Structured signals (the HTTP status, when one exists) are preferred;
//! substring heuristics against the error message are the fallback, since
//! the provider does not guarantee a stable structured error contract.
//! An unrecognized error is classified as `ServiceUnavailable` rather
//! than left unclassified, so callers never handle an open-ended type.

use crate::error::Error;
use crate::provider::ProviderError;

/// Classify a provider failure, tagging the catch-all kind with the
/// request's context label.
pub(crate) fn classify(err: &ProviderError, context: &str) -> Error {
    match err {
        ProviderError::MissingApiKey { .. } | ProviderError::InvalidBaseUrl { .. } => {
            Error::configuration(err.to_string())
        }
        _ => match err.status() {
            Some(401) | Some(403) => Error::configuration(err.to_string()),
            Some(429) => Error::quota_exceeded(err.to_string()),
            _ => classify_message(err, context),
        },
    }
}

fn classify_message(err: &ProviderError, context: &str) -> Error {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("api key")
        || lowered.contains("api_key")
        || lowered.contains("credential")
        || lowered.contains("unauthorized")
        || lowered.contains("permission denied")
    {
        return Error::configuration(message);
    }

    if lowered.contains("quota")
        || lowered.contains("rate limit")
        || lowered.contains("resource_exhausted")
        || lowered.contains("resource exhausted")
        || lowered.contains("too many requests")
    {
        return Error::quota_exceeded(message);
    }

    Error::service_unavailable(context, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, message: &str) -> ProviderError {
        ProviderError::Status {
            status: code,
            message: message.to_string(),
        }
    }

    #[test]
    fn missing_key_is_configuration() {
        let err = ProviderError::MissingApiKey {
            provider: "hosted-model".to_string(),
        };
        assert_eq!(classify(&err, "general").kind(), "configuration");
    }

    #[test]
    fn unauthorized_statuses_are_configuration() {
        assert_eq!(classify(&status(401, ""), "general").kind(), "configuration");
        assert_eq!(classify(&status(403, ""), "general").kind(), "configuration");
    }

    #[test]
    fn rate_limit_status_is_quota() {
        assert_eq!(
            classify(&status(429, "slow down"), "general").kind(),
            "quota_exceeded"
        );
    }

    #[test]
    fn quota_message_without_status_is_quota() {
        let err = ProviderError::Status {
            status: 400,
            message: "RESOURCE_EXHAUSTED: daily quota exceeded".to_string(),
        };
        assert_eq!(classify(&err, "general").kind(), "quota_exceeded");
    }

    #[test]
    fn api_key_message_is_configuration() {
        let err = status(400, "API key not valid. Please pass a valid API key.");
        assert_eq!(classify(&err, "general").kind(), "configuration");
    }

    #[test]
    fn server_error_is_service_unavailable() {
        let err = status(503, "backend overloaded");
        let classified = classify(&err, "essay_feedback");
        assert_eq!(classified.kind(), "service_unavailable");
        assert!(classified.to_string().contains("essay_feedback"));
    }

    #[test]
    fn unrecognized_error_defaults_to_service_unavailable() {
        let err = ProviderError::EmptyResponse;
        assert_eq!(
            classify(&err, "general").kind(),
            "service_unavailable"
        );
    }
}
