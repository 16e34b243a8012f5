use thiserror::Error;

/// Caller-facing error taxonomy for the AI request layer.
///
/// Every failure surfaced by [`crate::AiClient::generate`] is one of these
/// four kinds. Raw transport and provider errors never escape the layer;
/// they are classified exactly once, after the final retry attempt's
/// outcome is known, so feature screens can react to a small closed set.
#[derive(Debug, Error)]
pub enum Error {
    /// The provider credentials or endpoint configuration are invalid.
    ///
    /// Never retried: repeating a call with a bad API key cannot succeed.
    #[error("AI provider configuration error: {message}")]
    Configuration { message: String },

    /// The provider reported resource exhaustion (quota or rate limit).
    #[error("AI quota exceeded: {message}; try again later")]
    QuotaExceeded { message: String },

    /// The model returned text that could not be parsed into the
    /// structured form the caller required.
    ///
    /// Carries the head of the offending raw text for diagnostics.
    /// Partial or default data is never substituted.
    #[error("malformed model response: {message}")]
    MalformedResponse { message: String, raw: String },

    /// Catch-all for transport failures, timeouts, and unrecognized
    /// upstream errors, tagged with the request's context label.
    #[error("AI service temporarily unavailable ({context}): {message}")]
    ServiceUnavailable { context: String, message: String },
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Error::QuotaExceeded {
            message: message.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::MalformedResponse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn service_unavailable(context: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ServiceUnavailable {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable name of the error kind.
    ///
    /// Useful for logging and for UI code that switches on the kind
    /// without matching the enum directly.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration { .. } => "configuration",
            Error::QuotaExceeded { .. } => "quota_exceeded",
            Error::MalformedResponse { .. } => "malformed_response",
            Error::ServiceUnavailable { .. } => "service_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context_label() {
        let err = Error::service_unavailable("scholarship_search", "connection reset");
        let msg = err.to_string();
        assert!(msg.contains("scholarship_search"));
        assert!(msg.contains("temporarily unavailable"));
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(Error::configuration("x").kind(), "configuration");
        assert_eq!(Error::quota_exceeded("x").kind(), "quota_exceeded");
        assert_eq!(
            Error::malformed_response("x", "raw").kind(),
            "malformed_response"
        );
        assert_eq!(
            Error::service_unavailable("general", "x").kind(),
            "service_unavailable"
        );
    }
}
