//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use whitelist_applications::domain::lifecycle::LifecycleConfig;

use crate::error::AppError;

/// Typed server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database URL.
    pub database_url: String,
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Identities allowed to decide applications.
    pub admin_ids: Vec<i64>,
    /// Steam Web API key; enables profile verification.
    pub steam_api_key: Option<String>,
    /// Bound on a single profile verification.
    pub profile_check_timeout: Duration,
    /// Where status notifications are posted; logged when unset.
    pub notify_webhook_url: Option<String>,
    /// Whether the `needs_fix` decision is available.
    pub needs_fix_enabled: bool,
    /// Whether approved applications may be decided again.
    pub redecide_approved: bool,
    /// OTLP collector endpoint; enables trace export.
    pub otlp_endpoint: Option<String>,
}

fn parse<T>(name: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e| AppError::Config(format!("{name} is invalid: {e}"))),
    }
}

fn parse_admin_ids(raw: Option<String>) -> Result<Vec<i64>, AppError> {
    raw.as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse()
                .map_err(|_| AppError::Config(format!("ADMIN_IDS contains a non-numeric id '{id}'")))
        })
        .collect()
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`. Blank values count as
    /// unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let timeout_secs: u64 = parse(
            "PROFILE_CHECK_TIMEOUT_SECS",
            var("PROFILE_CHECK_TIMEOUT_SECS"),
            10,
        )?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "PROFILE_CHECK_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| "sqlite:whitelist.db".to_owned()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse("PORT", var("PORT"), 5000)?,
            admin_ids: parse_admin_ids(var("ADMIN_IDS"))?,
            steam_api_key: var("STEAM_API_KEY"),
            profile_check_timeout: Duration::from_secs(timeout_secs),
            notify_webhook_url: var("NOTIFY_WEBHOOK_URL"),
            needs_fix_enabled: parse("WHITELIST_NEEDS_FIX", var("WHITELIST_NEEDS_FIX"), true)?,
            redecide_approved: parse(
                "WHITELIST_REDECIDE_APPROVED",
                var("WHITELIST_REDECIDE_APPROVED"),
                false,
            )?,
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// Lifecycle policy derived from this configuration.
    #[must_use]
    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig {
            needs_fix_enabled: self.needs_fix_enabled,
            redecide_approved: self.redecide_approved,
            verification_timeout: self.profile_check_timeout,
        }
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
