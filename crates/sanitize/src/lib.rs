//! Input validation and safety for user-supplied text.
//!
//! Display names, clues, and blank guesses all pass through here before
//! they touch game state. Scrubbing strips control characters, trims, and
//! clips to a per-kind length cap; a profanity blocklist then rejects
//! whole-word matches and their simple suffixed forms.

use wb_core::*;

/// The three kinds of free text a client may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Name,
    Clue,
    Guess,
}

impl Kind {
    /// Length cap applied after scrubbing, counted in characters.
    fn cap(&self) -> usize {
        match self {
            Self::Name => NAME_MAX_LENGTH,
            Self::Clue => CLUE_MAX_LENGTH,
            Self::Guess => GUESS_MAX_LENGTH,
        }
    }
}

/// Why a piece of text was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    Empty(Kind),
    TooShort(Kind),
    Blocked(Kind),
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(Kind::Name) => write!(f, "name is required"),
            Self::Empty(Kind::Clue) => write!(f, "clue cannot be empty"),
            Self::Empty(Kind::Guess) => write!(f, "guess cannot be empty"),
            Self::TooShort(_) => write!(f, "name must be at least {} characters", NAME_MIN_LENGTH),
            Self::Blocked(Kind::Name) => write!(f, "please choose a different name"),
            Self::Blocked(Kind::Clue) => write!(f, "clue contains inappropriate language"),
            Self::Blocked(Kind::Guess) => write!(f, "please try a different word"),
        }
    }
}
impl std::error::Error for Refusal {}

/// Scrub and validate one piece of user text, returning the normalized form.
pub fn admit(kind: Kind, raw: &str) -> Result<String, Refusal> {
    let text = scrub(raw, kind.cap());
    if text.is_empty() {
        return Err(Refusal::Empty(kind));
    }
    if kind == Kind::Name && text.chars().count() < NAME_MIN_LENGTH {
        return Err(Refusal::TooShort(kind));
    }
    if blocked(&text) {
        return Err(Refusal::Blocked(kind));
    }
    Ok(text)
}

/// Strip control characters, trim surrounding whitespace, clip to the cap.
fn scrub(raw: &str, cap: usize) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .chars()
        .take(cap)
        .collect()
}

/// True when any word of the text, lowercased and stripped of punctuation,
/// hits the blocklist directly or after dropping its final character. The
/// suffix pass catches simple plurals and -y forms.
fn blocked(text: &str) -> bool {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .any(|word| {
            BLOCKLIST.contains(&word)
                || (word.len() > 2 && BLOCKLIST.contains(&&word[..word.len() - 1]))
        })
}

// Lowercase, one entry per line. Extend as needed.
#[rustfmt::skip]
const BLOCKLIST: &[&str] = &[
    "damn", "crap", "hell", "ass", "asshole", "bastard", "bitch",
    "dick", "dickhead", "shit", "shitty", "bullshit", "dipshit", "dumbass",
    "fuck", "fucking", "fucker", "motherfucker",
    "piss", "prick", "cock", "pussy", "whore", "slut", "cunt", "twat",
    "wanker", "bollocks", "bugger", "bellend", "jackass",
    "wtf", "stfu", "idiot", "moron", "stupid", "dumb",
];
