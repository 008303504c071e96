use super::*;
use wb_gameplay::GameError;

/// Wire boundary between raw socket text and typed commands.
/// Decoding failures become ordinary [`GameError`] rejections so the
/// client sees one error shape for bad JSON and bad moves alike.
pub struct Protocol;

impl Protocol {
    /// Parses a client text frame into a [`ClientCommand`].
    pub fn decode(text: &str) -> Result<ClientCommand, GameError> {
        serde_json::from_str(text)
            .map_err(|e| GameError::Validation(format!("malformed command: {}", e)))
    }
}
