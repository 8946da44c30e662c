//! Input validation for submissions and decisions.

use std::sync::LazyLock;

use regex::Regex;
use whitelist_core::error::DomainError;
use whitelist_core::identifier;
use whitelist_core::model::{ApplicationProfile, Platform};

use super::commands::{Decision, ProfileSubmission};
use super::lifecycle::APPROVAL_COMMENT;

/// Longest accepted display name or game identifier, in characters.
pub const MAX_PROFILE_FIELD_LEN: usize = 64;

/// Longest accepted administrator comment, in characters.
pub const MAX_COMMENT_LEN: usize = 300;

static STEAM_ID64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{17}$").expect("SteamID64 pattern is valid"));

static LEGACY_STEAM_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^STEAM_[0-5]:[01]:[0-9]+$").expect("legacy SteamID pattern is valid")
});

const PROFILE_HOSTS: [&str; 2] = ["steamcommunity", "steampowered"];

fn required(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    if value.chars().count() > MAX_PROFILE_FIELD_LEN {
        return Err(DomainError::validation(
            field,
            format!("must be at most {MAX_PROFILE_FIELD_LEN} characters"),
        ));
    }
    Ok(())
}

fn looks_like_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.contains("://")
        || PROFILE_HOSTS.iter().any(|host| lower.contains(host))
}

/// Validates a PC account id: a 17-digit SteamID64 or the legacy
/// `STEAM_X:Y:Z` form, never a profile link.
///
/// # Errors
///
/// Returns `DomainError::Validation` on `external_account_id`.
pub fn validate_steam_id(raw: &str) -> Result<(), DomainError> {
    const FIELD: &str = "external_account_id";

    if raw.is_empty() {
        return Err(DomainError::validation(
            FIELD,
            "a SteamID is required for PC players, e.g. 76561198000000000",
        ));
    }
    if looks_like_url(raw) {
        return Err(DomainError::validation(
            FIELD,
            "looks like a profile link; enter the SteamID itself, e.g. 76561198000000000",
        ));
    }
    if !STEAM_ID64.is_match(raw) && !LEGACY_STEAM_ID.is_match(raw) {
        return Err(DomainError::validation(
            FIELD,
            "expected a 17-digit SteamID64 (e.g. 76561198000000000) or STEAM_X:Y:Z",
        ));
    }
    Ok(())
}

/// Validates and normalises a submitted profile.
///
/// # Errors
///
/// Returns `DomainError::Validation` naming the first offending field.
pub fn validate_profile(submission: &ProfileSubmission) -> Result<ApplicationProfile, DomainError> {
    let display_name = submission.display_name.trim();
    required("display_name", display_name)?;

    let game_identifier = identifier::normalize(&submission.game_identifier);
    required("game_identifier", &game_identifier)?;

    let platform: Platform = submission.platform.parse()?;

    let raw_account_id = submission.external_account_id.as_deref().unwrap_or("").trim();
    if platform == Platform::Pc {
        validate_steam_id(raw_account_id)?;
    } else if raw_account_id.chars().count() > MAX_PROFILE_FIELD_LEN {
        return Err(DomainError::validation(
            "external_account_id",
            format!("must be at most {MAX_PROFILE_FIELD_LEN} characters"),
        ));
    }

    Ok(ApplicationProfile {
        display_name: display_name.to_owned(),
        game_identifier,
        platform,
        external_account_id: identifier::normalize_optional(Some(raw_account_id)),
    })
}

/// Resolves the comment stored with a decision. Approvals always carry
/// `APPROVAL_COMMENT`; other decisions keep the trimmed free text.
///
/// # Errors
///
/// Returns `DomainError::Validation` on `comment` if it is too long.
pub fn decision_comment(
    decision: Decision,
    comment: Option<&str>,
) -> Result<Option<String>, DomainError> {
    if decision == Decision::Approved {
        return Ok(Some(APPROVAL_COMMENT.to_owned()));
    }
    let comment = comment.map(str::trim).filter(|c| !c.is_empty());
    if comment.is_some_and(|text| text.chars().count() > MAX_COMMENT_LEN) {
        return Err(DomainError::validation(
            "comment",
            format!("must be at most {MAX_COMMENT_LEN} characters"),
        ));
    }
    Ok(comment.map(str::to_owned))
}
