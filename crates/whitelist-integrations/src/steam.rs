//! Steam Web API profile verifier.
//!
//! A profile is open when the player summary is public, owned games report
//! playtime, and recently played games are visible. Reviewers also see the
//! applicant's hours in the titles the community plays. Any transport or
//! decoding failure is surfaced as `DomainError::Dependency`, which callers
//! treat as "check skipped".

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use whitelist_core::error::DomainError;
use whitelist_core::verifier::{GamePlaytime, ProfileVerifier, ProfileVisibility};

/// Public Steam Web API host.
pub const STEAM_API_BASE_URL: &str = "https://api.steampowered.com";

const PLAYER_SUMMARIES_PATH: &str = "/ISteamUser/GetPlayerSummaries/v2/";
const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v1/";
const RECENT_GAMES_PATH: &str = "/IPlayerService/GetRecentlyPlayedGames/v1/";

/// Individual account base of the 64-bit SteamID space.
const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;

/// Owned titles whose name contains one of these (case-insensitive) are
/// reported to reviewers.
pub const RELEVANT_TITLE_KEYWORDS: [&str; 3] = ["ARMA", "SQUAD", "DAYZ"];

const VISIBILITY_PUBLIC: i64 = 3;
const PROFILE_CONFIGURED: i64 = 1;

/// Converts an account id to its 64-bit form. Accepts a 17-digit SteamID64
/// or the legacy `STEAM_X:Y:Z` form in any case.
#[must_use]
pub fn to_steam_id64(external_account_id: &str) -> Option<String> {
    let id = external_account_id.trim();
    if id.len() == 17 && id.bytes().all(|b| b.is_ascii_digit()) {
        return Some(id.to_owned());
    }

    let prefix = id.get(..6)?;
    if !prefix.eq_ignore_ascii_case("steam_") {
        return None;
    }
    let mut parts = id[6..].split(':');
    let (Some(universe), Some(auth), Some(account), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    if !universe.parse::<u8>().is_ok_and(|u| u <= 5) {
        return None;
    }
    let auth = auth.parse::<u64>().ok().filter(|y| *y <= 1)?;
    let account = account.parse::<u64>().ok()?;

    account
        .checked_mul(2)
        .and_then(|a| a.checked_add(auth))
        .and_then(|a| a.checked_add(STEAM_ID64_BASE))
        .map(|id64| id64.to_string())
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    response: T,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlayerSummaries {
    #[serde(default)]
    players: Vec<PlayerSummary>,
}

#[derive(Debug, Default, Deserialize)]
struct PlayerSummary {
    #[serde(default)]
    communityvisibilitystate: i64,
    #[serde(default)]
    profilestate: i64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OwnedGames {
    #[serde(default)]
    game_count: u64,
    #[serde(default)]
    games: Vec<OwnedGame>,
}

#[derive(Debug, Default, Deserialize)]
struct OwnedGame {
    #[serde(default)]
    name: Option<String>,
    /// Minutes.
    #[serde(default)]
    playtime_forever: u64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecentGames {
    #[serde(default)]
    total_count: u64,
}

/// Combines the three Steam responses into a visibility verdict.
pub(crate) fn evaluate(
    summaries: &PlayerSummaries,
    owned: &OwnedGames,
    recent: &RecentGames,
) -> ProfileVisibility {
    let profile_public = summaries.players.first().is_some_and(|p| {
        p.communityvisibilitystate == VISIBILITY_PUBLIC && p.profilestate == PROFILE_CONFIGURED
    });
    let total_playtime: u64 = owned.games.iter().map(|g| g.playtime_forever).sum();
    let has_games_with_playtime = owned.game_count > 0 && total_playtime > 0;
    let has_recent_games = recent.total_count > 0;

    ProfileVisibility::new(profile_public, has_games_with_playtime, has_recent_games)
}

/// Picks the relevant titles with playtime out of the owned games, in the
/// order Steam reports them.
pub(crate) fn relevant_titles(owned: &OwnedGames) -> Vec<GamePlaytime> {
    owned
        .games
        .iter()
        .filter(|game| game.playtime_forever > 0)
        .filter_map(|game| {
            let name = game.name.as_deref()?.trim();
            let upper = name.to_uppercase();
            RELEVANT_TITLE_KEYWORDS
                .iter()
                .any(|keyword| upper.contains(keyword))
                .then(|| GamePlaytime {
                    name: name.to_owned(),
                    hours: minutes_to_hours(game.playtime_forever),
                })
        })
        .collect()
}

fn minutes_to_hours(minutes: u64) -> f64 {
    let minutes = f64::from(u32::try_from(minutes).unwrap_or(u32::MAX));
    (minutes / 60.0 * 100.0).round() / 100.0
}

fn steam_id64(external_account_id: &str) -> Result<String, DomainError> {
    to_steam_id64(external_account_id).ok_or_else(|| {
        DomainError::Dependency(format!("'{external_account_id}' is not a SteamID"))
    })
}

fn dependency(context: &str, err: reqwest::Error) -> DomainError {
    DomainError::Dependency(format!("steam {context}: {}", err.without_url()))
}

/// Verifies Steam profiles through the Steam Web API.
#[derive(Debug, Clone)]
pub struct SteamProfileVerifier {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SteamProfileVerifier {
    /// Creates a verifier against the public Steam API. `timeout` bounds
    /// each HTTP request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Dependency` if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        Self::with_base_url(api_key, STEAM_API_BASE_URL, timeout)
    }

    /// Creates a verifier against another host exposing the same API.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Dependency` if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| dependency("client", e))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    async fn get<T>(&self, path: &str, params: &[(&str, &str)]) -> Result<T, DomainError>
    where
        T: DeserializeOwned + Default,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| dependency(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Dependency(format!(
                "steam {path} returned {status}"
            )));
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| dependency(path, e))?;
        Ok(envelope.response)
    }
}

#[async_trait]
impl ProfileVerifier for SteamProfileVerifier {
    #[instrument(skip(self))]
    async fn check_profile_public(
        &self,
        external_account_id: &str,
    ) -> Result<ProfileVisibility, DomainError> {
        let steam_id = steam_id64(external_account_id)?;
        let steam_id = steam_id.as_str();

        let summaries_params = [("steamids", steam_id)];
        let owned_params = [("steamid", steam_id), ("include_appinfo", "1")];
        let recent_params = [("steamid", steam_id)];
        let (summaries, owned, recent) = tokio::try_join!(
            self.get::<PlayerSummaries>(PLAYER_SUMMARIES_PATH, &summaries_params),
            self.get::<OwnedGames>(OWNED_GAMES_PATH, &owned_params),
            self.get::<RecentGames>(RECENT_GAMES_PATH, &recent_params),
        )?;

        let visibility = evaluate(&summaries, &owned, &recent);
        debug!(?visibility, "steam profile checked");
        Ok(visibility)
    }

    #[instrument(skip(self))]
    async fn relevant_playtime(
        &self,
        external_account_id: &str,
    ) -> Result<Vec<GamePlaytime>, DomainError> {
        let steam_id = steam_id64(external_account_id)?;
        let owned: OwnedGames = self
            .get(
                OWNED_GAMES_PATH,
                &[("steamid", steam_id.as_str()), ("include_appinfo", "1")],
            )
            .await?;

        let games = relevant_titles(&owned);
        debug!(titles = games.len(), "steam playtime read");
        Ok(games)
    }
}
