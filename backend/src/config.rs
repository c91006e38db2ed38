//! Runtime configuration loaded from the environment (and `.env` if present).

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Production deployment of the reservation service
pub const DEFAULT_API_URL: &str = "https://desplieguebackproyecto-caewexbzb2hbhje2.eastus-01.azurewebsites.net";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// How room booking treats a click on an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Validate labels only; availability is display-only
    #[default]
    Raw,
    /// Also reject slots the room marks as occupied
    AvailabilityGated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub selection_policy: SelectionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            selection_policy: SelectionPolicy::Raw,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("RESERVATIONS_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let http_timeout = match lookup("RESERVATIONS_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                if secs == 0 {
                    return Err(ConfigError::InvalidTimeout(raw));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let selection_policy = match lookup("RESERVATIONS_GATE_ON_AVAILABILITY") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => SelectionPolicy::AvailabilityGated,
                "0" | "false" | "no" | "off" | "" => SelectionPolicy::Raw,
                _ => return Err(ConfigError::InvalidFlag(raw)),
            },
            None => SelectionPolicy::Raw,
        };

        Ok(Config {
            api_base_url,
            http_timeout,
            selection_policy,
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("RESERVATIONS_HTTP_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("RESERVATIONS_GATE_ON_AVAILABILITY must be true or false, got '{0}'")]
    InvalidFlag(String),
}
