//! JSON parsing helpers for AI backend responses
//!
//! Structured-output mode should return a bare JSON object, but local models
//! sometimes wrap it in a markdown code fence. Anything else around the
//! payload is treated as a malformed response.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Maximum characters of raw model output quoted in error messages
const RAW_PREVIEW_CHARS: usize = 200;

/// Strip surrounding whitespace and an optional ```json fence
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// Parse a structured response into `T`
///
/// `what` names the payload for error messages.
pub fn parse_structured<T: DeserializeOwned>(response: &str, what: &str) -> Result<T> {
    let json_str = extract_json(response);

    if json_str.is_empty() {
        return Err(Error::InvalidData(format!("Empty {} response from AI", what)));
    }

    serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid {} JSON from AI: {} | Raw: {}",
            what,
            e,
            preview(json_str)
        ))
    })
}

/// Truncate long responses for error messages
fn preview(raw: &str) -> String {
    if raw.chars().count() > RAW_PREVIEW_CHARS {
        let head: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_extract_plain() {
        assert_eq!(extract_json("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_fenced() {
        let response = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(response), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_unterminated_fence_is_left_alone() {
        let response = "```json\n{\"a\": 1}";
        assert_eq!(extract_json(response), response);
    }

    #[test]
    fn test_parse_structured() {
        let result: Sample = parse_structured(r#"{"name": "Netflix"}"#, "sample").unwrap();
        assert_eq!(result.name, "Netflix");
    }

    #[test]
    fn test_parse_structured_rejects_prose() {
        let response = r#"Here's the result: {"name": "Netflix"}"#;
        let err = parse_structured::<Sample>(response, "sample").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_parse_structured_rejects_empty() {
        let err = parse_structured::<Sample>("   ", "sample").unwrap_err();
        assert!(err.to_string().contains("Empty sample response"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let raw = "₹".repeat(300);
        let short = preview(&raw);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), RAW_PREVIEW_CHARS + 3);
    }
}
