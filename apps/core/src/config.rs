//! Runtime configuration.
//!
//! Values come from the process environment, after an optional `.env` file
//! has been loaded. Every variable has a default; a present but unparseable
//! value is a configuration error rather than a silent fallback.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::lookup_host;
use validator::Validate;

use crate::error::AppError;

const ENV_PREFIX: &str = "STUDYBUDDY_";

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Interface to bind.
    #[validate(length(min = 1))]
    pub host: String,
    /// TCP port to bind.
    #[validate(range(min = 1))]
    pub port: u16,
    /// Idle time after which a session's transcript is dropped.
    #[validate(range(min = 1))]
    pub session_ttl_secs: u64,
    /// Upper bound on live sessions; least recently used are evicted.
    #[validate(range(min = 1))]
    pub max_sessions: usize,
    /// Longest accepted message, in characters.
    #[validate(range(min = 1, max = 10000))]
    pub max_message_len: usize,
    /// Submissions allowed per session within one rate window.
    #[validate(range(min = 1))]
    pub rate_limit: usize,
    #[validate(range(min = 1))]
    pub rate_window_secs: u64,
    /// Fixed seed for reply selection; `None` seeds from OS entropy.
    pub reply_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            session_ttl_secs: 3600,
            max_sessions: 10_000,
            max_message_len: 2000,
            rate_limit: 30,
            rate_window_secs: 60,
            reply_seed: None,
        }
    }
}

/// Reads `STUDYBUDDY_<name>`, parsing it when present.
fn env_value<T: FromStr>(name: &str) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    let key = format!("{}{}", ENV_PREFIX, name);
    read_var(&key)
}

fn read_var<T: FromStr>(key: &str) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{} = {:?}: {}", key, raw, e))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(AppError::Config(format!("{} is not valid unicode", key)))
        }
    }
}

impl AppConfig {
    /// Builds the configuration from the current environment.
    ///
    /// Callers load `.env` first (see `main`) so file values are visible here.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        // STUDYBUDDY_PORT wins over the conventional PORT
        let port = match env_value::<u16>("PORT")? {
            Some(port) => port,
            None => read_var::<u16>("PORT")?.unwrap_or(defaults.port),
        };

        let config = Self {
            host: env_value("HOST")?.unwrap_or(defaults.host),
            port,
            session_ttl_secs: env_value("SESSION_TTL_SECS")?.unwrap_or(defaults.session_ttl_secs),
            max_sessions: env_value("MAX_SESSIONS")?.unwrap_or(defaults.max_sessions),
            max_message_len: env_value("MAX_MESSAGE_LEN")?.unwrap_or(defaults.max_message_len),
            rate_limit: env_value("RATE_LIMIT")?.unwrap_or(defaults.rate_limit),
            rate_window_secs: env_value("RATE_WINDOW_SECS")?.unwrap_or(defaults.rate_window_secs),
            reply_seed: env_value("REPLY_SEED")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Resolves `host:port`; the host may be an IP literal (v4 or v6) or a name.
    pub async fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        let mut addrs = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| AppError::Config(format!("cannot resolve host {:?}: {}", self.host, e)))?;
        addrs
            .next()
            .ok_or_else(|| AppError::Config(format!("host {:?} resolved to no address", self.host)))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }

    pub fn session_capacity(&self) -> Result<NonZeroUsize, AppError> {
        NonZeroUsize::new(self.max_sessions)
            .ok_or_else(|| AppError::Config("max_sessions must be at least 1".to_string()))
    }
}
