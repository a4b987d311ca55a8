//! Best-effort recovery of JSON fragments.
//!
//! People copy server configs out of READMEs, usually without the enclosing
//! braces or with the comma that separated it from the next entry. Exactly two
//! repairs are tried, once each; anything still invalid is rejected.

use serde_json::Value;

/// Which attempt produced the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Parsed as-is
    Strict,
    /// `"key": {...}` wrapped into `{"key": {...}}`
    Wrapped,
    /// One trailing comma removed
    TrailingComma,
}

/// Parse `text`, falling back to the two fragment repairs.
pub fn parse_fragment(text: &str) -> Option<(Value, Recovery)> {
    let text = text.trim();

    if let Some(value) = parse_strict(text) {
        return Some((value, Recovery::Strict));
    }

    if looks_like_object_body(text) {
        let body = text.strip_suffix(',').unwrap_or(text);
        if let Some(value) = parse_strict(&format!("{{{body}}}")) {
            tracing::debug!("Recovered JSON by wrapping object body in braces");
            return Some((value, Recovery::Wrapped));
        }
    }

    if let Some(stripped) = text.strip_suffix(',')
        && let Some(value) = parse_strict(stripped)
    {
        tracing::debug!("Recovered JSON by dropping a trailing comma");
        return Some((value, Recovery::TrailingComma));
    }

    None
}

fn parse_strict(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// `"key"` then `:` then `{`, with optional whitespace in between.
fn looks_like_object_body(text: &str) -> bool {
    let Some(rest) = text.trim_start().strip_prefix('"') else {
        return false;
    };
    let Some(close) = rest.find('"') else {
        return false;
    };
    if close == 0 {
        return false;
    }
    let Some(rest) = rest[close + 1..].trim_start().strip_prefix(':') else {
        return false;
    };
    rest.trim_start().starts_with('{')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_json_needs_no_repair() {
        let (value, recovery) = parse_fragment(r#"{"a":{"command":"x"}}"#).unwrap();
        assert_eq!(recovery, Recovery::Strict);
        assert_eq!(value, json!({"a": {"command": "x"}}));
    }

    #[test]
    fn test_wraps_bare_object_body() {
        let (value, recovery) =
            parse_fragment(r#""weather": {"command":"npx","args":["weather-mcp"]}"#).unwrap();
        assert_eq!(recovery, Recovery::Wrapped);
        assert_eq!(
            value,
            json!({"weather": {"command": "npx", "args": ["weather-mcp"]}})
        );
    }

    #[test]
    fn test_wraps_body_with_trailing_comma() {
        let text = r#"
            "a": {"command": "x"},
            "b": {"url": "https://b.dev/mcp"},
        "#;
        let (value, recovery) = parse_fragment(text).unwrap();
        assert_eq!(recovery, Recovery::Wrapped);
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_strips_trailing_comma_from_object() {
        let (value, recovery) = parse_fragment(r#"{"command": "npx"},"#).unwrap();
        assert_eq!(recovery, Recovery::TrailingComma);
        assert_eq!(value, json!({"command": "npx"}));
    }

    #[test]
    fn test_only_one_trailing_comma_is_removed() {
        assert!(parse_fragment(r#"{"command": "npx"},,"#).is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_fragment("npx -y weather-mcp").is_none());
        assert!(parse_fragment(r#""a": {"command": "x""#).is_none());
        assert!(parse_fragment("").is_none());
    }

    #[test]
    fn test_object_body_detection() {
        assert!(looks_like_object_body(r#""k" : {"#));
        assert!(!looks_like_object_body(r#""k": ["#));
        assert!(!looks_like_object_body(r#""": {"#));
        assert!(!looks_like_object_body(r#"k: {"#));
    }
}
