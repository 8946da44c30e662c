//! Whitelist applications.
//!
//! The lifecycle engine decides which status transitions are legal and
//! keeps at most one active application per submitter; the lookup service
//! answers read-only questions for the game server and the chat bot.

pub mod application;
pub mod domain;
