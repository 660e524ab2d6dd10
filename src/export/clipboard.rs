use arboard::Clipboard;

use crate::core::ExportError;

/// Destination of the formatted export. The system clipboard in the binary;
/// an in-memory buffer in tests.
pub trait ClipboardSink {
    /// Replaces the sink's entire contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), ExportError>;
}

pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        let mut clipboard = Clipboard::new()
            .map_err(|error| ExportError::ClipboardWrite(error.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|error| ExportError::ClipboardWrite(error.to_string()))
    }
}
