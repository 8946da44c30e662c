//! Profile verification port.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DomainError;

/// Result of a platform profile visibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProfileVisibility {
    /// The profile itself is public.
    pub profile_public: bool,
    /// Owned games report non-zero playtime.
    pub has_games_with_playtime: bool,
    /// Recently played games are visible.
    pub has_recent_games: bool,
    /// All of the above hold.
    pub open: bool,
}

impl ProfileVisibility {
    /// Builds a result, deriving `open` from the three checks.
    #[must_use]
    pub fn new(profile_public: bool, has_games_with_playtime: bool, has_recent_games: bool) -> Self {
        Self {
            profile_public,
            has_games_with_playtime,
            has_recent_games,
            open: profile_public && has_games_with_playtime && has_recent_games,
        }
    }
}

/// Hours played on one owned title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamePlaytime {
    /// Title as reported by the platform.
    pub name: String,
    /// Lifetime playtime in hours, two decimals.
    pub hours: f64,
}

/// Checks whether a PC applicant's platform profile is public.
///
/// Callers bound the call with a timeout and treat any error as "check
/// skipped".
#[async_trait]
pub trait ProfileVerifier: Send + Sync {
    /// Checks the profile behind a normalised external account id.
    async fn check_profile_public(
        &self,
        external_account_id: &str,
    ) -> Result<ProfileVisibility, DomainError>;

    /// Owned titles the community plays, with hours. Titles without
    /// playtime are left out; a closed profile yields an empty list.
    async fn relevant_playtime(
        &self,
        external_account_id: &str,
    ) -> Result<Vec<GamePlaytime>, DomainError>;
}
