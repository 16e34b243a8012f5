//! Response normalization.
//!
//! The upstream model returns free text that may wrap its answer in a
//! markdown code fence, with or without leading commentary. When the
//! caller expects structured output, this module extracts the fenced
//! interior (or takes the whole trimmed response) and parses it as JSON.
//!
//! Parse failure is a hard [`Error::MalformedResponse`], never a soft
//! fallback: returning partially-parsed or default data would be silent
//! data loss.

use crate::error::Error;
use crate::types::Payload;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of characters of raw model output carried in a
/// `MalformedResponse` error.
const RAW_HEAD_CHARS: usize = 200;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").unwrap());
static FENCED_ANY: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").unwrap());

/// Normalize a raw model response into a [`Payload`].
///
/// With `expect_structured` false this is a no-op apart from trimming.
pub fn normalize(raw: &str, expect_structured: bool) -> Result<Payload, Error> {
    if !expect_structured {
        return Ok(Payload::Text(raw.trim().to_string()));
    }

    let candidate = extract_candidate(raw);
    match serde_json::from_str::<serde_json::Value>(candidate) {
        Ok(value) => Ok(Payload::Structured(value)),
        Err(err) => Err(Error::malformed_response(
            format!("expected structured output but parsing failed: {err}"),
            head(raw),
        )),
    }
}

/// Extract the structured-payload candidate from a raw response.
///
/// A ```json fence wins over a bare fence; with no fence at all the whole
/// trimmed response is the candidate.
fn extract_candidate(raw: &str) -> &str {
    if let Some(captures) = FENCED_JSON.captures(raw) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str();
        }
    }
    if let Some(captures) = FENCED_ANY.captures(raw) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str();
        }
    }
    raw.trim()
}

fn head(raw: &str) -> String {
    raw.chars().take(RAW_HEAD_CHARS).collect()
}
