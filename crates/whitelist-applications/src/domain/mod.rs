//! Domain layer: commands, the transition table, and input validation.

pub mod commands;
pub mod lifecycle;
pub mod validation;
