//! Parsing of free-text form buffers.
//!
//! Lines without a separator, blank lines and lines with an empty key are
//! ignored. Keys and values are trimmed; later duplicates overwrite earlier ones.

use crate::mcp::EnvMap;

/// `KEY=VALUE` per line
pub fn parse_env_lines(text: &str) -> EnvMap {
    parse_pairs(text, '=')
}

/// `Name: value` per line
pub fn parse_header_lines(text: &str) -> EnvMap {
    parse_pairs(text, ':')
}

/// Whitespace-separated arguments; no quoting
pub fn split_args(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn parse_pairs(text: &str, separator: char) -> EnvMap {
    text.lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once(separator)?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}
