//! Concrete collaborators for the lifecycle engine: a Steam Web API profile
//! verifier and status notifiers.

pub mod notifier;
pub mod steam;

pub use notifier::{LogNotifier, WebhookNotifier};
pub use steam::SteamProfileVerifier;
