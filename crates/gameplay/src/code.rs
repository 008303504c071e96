use super::*;
use serde::Deserialize;
use serde::Serialize;
use wb_core::*;

/// Uppercase invite code identifying a session.
///
/// Construction normalizes: surrounding whitespace is trimmed, letters are
/// upcased, and anything past [`CODE_MAX_LENGTH`] characters is clipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Code {
    type Error = GameError;
    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        let code = raw
            .trim()
            .to_uppercase()
            .chars()
            .take(CODE_MAX_LENGTH)
            .collect::<String>();
        match code.is_empty() {
            true => Err(GameError::Validation("invite code required".to_string())),
            false => Ok(Self(code)),
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
