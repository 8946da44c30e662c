//! Shared test doubles for the whitelist application service.

mod clock;
mod collaborators;
mod repository;

pub use clock::FixedClock;
pub use collaborators::{
    FailingNotifier, FailingVerifier, HangingNotifier, HangingVerifier, RecordingNotifier,
    StaticVerifier,
};
pub use repository::{FailingApplicationRepository, InMemoryApplicationRepository};
