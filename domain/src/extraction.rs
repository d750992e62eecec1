//! Lenient JSON extraction from model output.
//!
//! Models asked for JSON frequently wrap it in prose or markdown fences.
//! The extractor scans for the outermost brace pair and parses the slice in
//! between, tolerating any surrounding text. When no object can be found or
//! the slice is not valid JSON, it returns an explicit error so callers can
//! substitute a default instead of crashing.

use thiserror::Error;

/// Errors from lenient JSON extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no JSON object found in response")]
    NoObject,

    #[error("extracted text is not valid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Extract the outermost JSON object from free-form model output.
///
/// Scans for the first `{` and the last `}` and parses everything in
/// between. Prose before, after, and markdown fences around the object are
/// all tolerated.
pub fn extract_json_object(text: &str) -> Result<serde_json::Value, ExtractError> {
    let start = text.find('{').ok_or(ExtractError::NoObject)?;
    let end = text.rfind('}').ok_or(ExtractError::NoObject)?;
    if end < start {
        return Err(ExtractError::NoObject);
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bare_object() {
        let value = extract_json_object(r#"{"alignment": 0.8}"#).unwrap();
        assert_eq!(value["alignment"], 0.8);
    }

    #[test]
    fn test_extract_with_surrounding_prose() {
        let text = r#"Here is my analysis of the discussion:

```json
{"agreements": ["hybrid work"], "alignment": 0.6}
```

Let me know if you need more detail."#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["agreements"][0], "hybrid work");
    }

    #[test]
    fn test_no_braces_is_explicit_error() {
        let err = extract_json_object("The group mostly agreed.").unwrap_err();
        assert!(matches!(err, ExtractError::NoObject));
    }

    #[test]
    fn test_reversed_braces_is_no_object() {
        let err = extract_json_object("} nothing here {").unwrap_err();
        assert!(matches!(err, ExtractError::NoObject));
    }

    #[test]
    fn test_invalid_json_between_braces() {
        let err = extract_json_object("{not json at all}").unwrap_err();
        assert!(matches!(err, ExtractError::Invalid(_)));
    }
}
