/// Why a command was refused. The display form goes back verbatim to the
/// offending client as a rejection reason; state is never touched by a
/// refused command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// User-supplied text failed scrubbing or validation.
    Validation(String),
    /// The acting player lacks the authority for this command.
    Unauthorized(&'static str),
    /// The command does not fit the current phase or state.
    Conflict(&'static str),
    /// A roster or registry limit refused the command.
    Capacity(&'static str),
    /// The referenced game or player does not exist.
    NotFound(&'static str),
}

impl GameError {
    /// Stable lowercase tag carried on rejection messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Unauthorized(_) => "unauthorized",
            Self::Conflict(_) => "conflict",
            Self::Capacity(_) => "capacity",
            Self::NotFound(_) => "not_found",
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(reason) => write!(f, "{}", reason),
            Self::Unauthorized(reason) => write!(f, "{}", reason),
            Self::Conflict(reason) => write!(f, "{}", reason),
            Self::Capacity(reason) => write!(f, "{}", reason),
            Self::NotFound(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for GameError {}
