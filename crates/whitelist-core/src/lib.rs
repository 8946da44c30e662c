//! Shared domain types and ports for the whitelist application service.
//!
//! This crate defines the application record, its status and platform
//! enumerations, the domain error taxonomy, and the traits through which
//! the lifecycle engine talks to storage and external collaborators.
//! It contains no infrastructure code.

pub mod authorization;
pub mod clock;
pub mod error;
pub mod identifier;
pub mod model;
pub mod notifier;
pub mod repository;
pub mod verifier;
