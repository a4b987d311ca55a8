//! Clipboard import of MCP server configurations
//!
//! Text goes through [`repair::parse_fragment`] and then
//! [`classify::classify`]. Every failure is returned as an [`ImportError`]
//! carrying the message shown to the user.

pub mod classify;
pub mod repair;

use thiserror::Error;

use crate::mcp::ParsedServer;

pub use classify::classify;
pub use repair::{Recovery, parse_fragment};

/// Hint attached to unparseable input
pub const PARSE_HINT: &str = "Please ensure the copied content is a valid MCP configuration";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Clipboard is empty")]
    Empty,

    #[error("Failed to parse as JSON")]
    NotJson,

    #[error("Invalid configuration format")]
    InvalidFormat,

    #[error("Cannot recognize as MCP configuration")]
    Unrecognized,

    #[error("No valid server configurations found")]
    NoValidServers,
}

impl ImportError {
    /// Follow-up advice for the user, when there is any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ImportError::NotJson => Some(PARSE_HINT),
            _ => None,
        }
    }
}

/// Source of pasted text
pub trait ClipboardSource {
    /// Current clipboard text; empty when unavailable
    fn read_text(&self) -> String;
}

impl ClipboardSource for String {
    fn read_text(&self) -> String {
        self.clone()
    }
}

/// Parse servers out of free text.
pub fn parse_content(input: &str) -> Result<Vec<ParsedServer>, ImportError> {
    if input.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let (value, recovery) = parse_fragment(input).ok_or(ImportError::NotJson)?;
    tracing::debug!("Clipboard text parsed ({:?})", recovery);

    classify(&value)
}

/// Parse servers out of whatever the clipboard currently holds.
pub fn parse_from_clipboard<C: ClipboardSource + ?Sized>(
    clipboard: &C,
) -> Result<Vec<ParsedServer>, ImportError> {
    parse_content(&clipboard.read_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::AgentServerEntry;

    #[test]
    fn test_empty_clipboard() {
        assert_eq!(parse_content("   \n\t"), Err(ImportError::Empty));
        assert_eq!(
            parse_from_clipboard(&String::new()),
            Err(ImportError::Empty)
        );
    }

    #[test]
    fn test_not_json_has_hint() {
        let err = parse_content("npx -y @acme/server").unwrap_err();
        assert_eq!(err, ImportError::NotJson);
        assert_eq!(err.to_string(), "Failed to parse as JSON");
        assert_eq!(err.hint(), Some(PARSE_HINT));
    }

    #[test]
    fn test_fragment_recovers_to_named_server() {
        let servers =
            parse_content(r#""weather": {"command":"npx","args":["weather-mcp"]}"#).unwrap();

        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "weather");
        assert!(matches!(servers[0].config, AgentServerEntry::Local(_)));
    }

    #[test]
    fn test_clipboard_source() {
        let text = r#"{"url": "https://api.example.com/mcp"}"#.to_string();
        let servers = parse_from_clipboard(&text).unwrap();
        assert_eq!(servers[0].name, "example-mcp");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ImportError::Unrecognized.to_string(),
            "Cannot recognize as MCP configuration"
        );
        assert_eq!(
            ImportError::NoValidServers.to_string(),
            "No valid server configurations found"
        );
        assert_eq!(ImportError::InvalidFormat.hint(), None);
    }
}
