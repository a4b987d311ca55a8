//! System clipboard access.

use rain_core::import::ClipboardSource;

/// Reads the OS clipboard through arboard. Unavailable clipboards read as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&self) -> String {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => {
                tracing::debug!(
                    "Clipboard read: {} lines, {} bytes",
                    text.lines().count(),
                    text.len()
                );
                text
            }
            Err(e) => {
                tracing::debug!("Clipboard unavailable: {}", e);
                String::new()
            }
        }
    }
}
