//! Hidden-role game engine with lobby management, round flow, and scoring.
//!
//! This module implements the rules and mechanics of a wordblur session,
//! tracking state from the lobby through clue, discussion, and elimination
//! rounds to a scored finish.
//!
//! ## State Representation
//!
//! - [`Game`] — One session: roster, phase, roles, and the working round
//! - [`RoundState`] — Per-round clue order, clues, votes, and blank guess
//! - [`Phase`] — Where the session sits in the round flow
//!
//! ## Identity
//!
//! - [`Code`] — Normalized uppercase invite code
//! - [`Player`] — Roster member with display name and running score
//! - [`Role`] — Hidden allegiance: crew, blur, or blank
//! - [`Faction`] — Scoring side: crew, or blur with the blank
//!
//! ## Resolution
//!
//! - [`Ballot`] — Elimination votes with insertion-ordered tallying
//! - [`BlankGuess`] — The eliminated blank's shot at the crew word
//!
//! ## Boundaries
//!
//! - [`View`] — Per-player projection with secrets withheld
//! - [`Snapshot`] — Storable mirror of a session, links excluded
//! - [`GameError`] — Why a command was refused
mod ballot;
mod code;
mod error;
mod game;
mod phase;
mod player;
mod role;
mod round;
mod scoring;
mod snapshot;
mod view;

pub use ballot::*;
pub use code::*;
pub use error::*;
pub use game::*;
pub use phase::*;
pub use player::*;
pub use role::*;
pub use round::*;
pub use scoring::*;
pub use snapshot::*;
pub use view::*;
