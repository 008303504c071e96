//! Async runtime for live word-deduction sessions.
//!
//! This module orchestrates multiplayer sessions, coordinating between
//! the game engine and connected clients through message-passing channels.
//!
//! ## Architecture
//!
//! - [`Parlor`] — Registry of active rooms keyed by invite code
//! - [`Room`] — Session coordinator pairing one [`wb_gameplay::Game`] with its links
//! - [`Link`] — Outbound half of one WebSocket connection
//! - [`Protocol`] — Wire decoding between JSON text and typed commands
//!
//! ## Messages
//!
//! - [`ClientCommand`] — Requests from client to server (join, clue, vote, ...)
//! - [`ServerMessage`] — Responses and state pushes from server to client
mod link;
mod message;
mod parlor;
mod protocol;
mod room;

pub use link::*;
pub use message::*;
pub use parlor::*;
pub use protocol::*;
pub use room::*;
