//! Whitelist application service: HTTP surface.
//!
//! Exposes the game-server lookup endpoints and the application command
//! surface used by the chat bot.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
