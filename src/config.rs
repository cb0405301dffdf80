use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::ws::{ArchiveLimits, StartPolicy};

/// Longest retention accepted for completed sessions (one year).
pub const MAX_COMPLETED_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins, comma separated, or `*`
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Refuse `start-session` while a live session exists instead of resuming/replacing it
    #[serde(default)]
    pub strict_session_start: bool,

    /// How long a completed session stays readable after it ends
    #[serde(default = "default_completed_session_ttl_secs")]
    pub completed_session_ttl_secs: u64,

    /// Upper bound on retained completed sessions
    #[serde(default = "default_completed_session_capacity")]
    pub completed_session_capacity: u64,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("✅ Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Allowed CORS origins; `None` means any origin.
    pub fn cors_origin_list(&self) -> Option<Vec<String>> {
        if self.cors_origins.trim() == "*" {
            return None;
        }
        Some(
            self.cors_origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn start_policy(&self) -> StartPolicy {
        if self.strict_session_start {
            StartPolicy::Strict
        } else {
            StartPolicy::Compatible
        }
    }

    /// Archive retention, with the TTL clamped to `MAX_COMPLETED_SESSION_TTL_SECS`.
    pub fn archive_limits(&self) -> ArchiveLimits {
        let mut ttl_secs = self.completed_session_ttl_secs;
        if ttl_secs > MAX_COMPLETED_SESSION_TTL_SECS {
            warn!(
                "COMPLETED_SESSION_TTL_SECS={} exceeds the maximum, using {}",
                ttl_secs, MAX_COMPLETED_SESSION_TTL_SECS
            );
            ttl_secs = MAX_COMPLETED_SESSION_TTL_SECS;
        }
        ArchiveLimits {
            ttl: Duration::from_secs(ttl_secs),
            capacity: self.completed_session_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            service_name: default_service_name(),
            strict_session_start: false,
            completed_session_ttl_secs: default_completed_session_ttl_secs(),
            completed_session_capacity: default_completed_session_capacity(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvError(#[from] envy::Error),
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_cors_origins() -> String {
    "http://localhost:3000".to_string()
}

fn default_service_name() -> String {
    "classroom-live".to_string()
}

fn default_completed_session_ttl_secs() -> u64 {
    60 * 60
}

fn default_completed_session_capacity() -> u64 {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string()))).unwrap()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.server_address(), "0.0.0.0:3001");
        assert_eq!(config.start_policy(), StartPolicy::Compatible);
        assert_eq!(config.cors_origin_list(), Some(vec!["http://localhost:3000".to_string()]));
        assert_eq!(config.archive_limits().ttl, Duration::from_secs(3600));
    }

    #[test]
    fn reads_overrides_from_environment_pairs() {
        let config = from_pairs(&[
            ("PORT", "9000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("STRICT_SESSION_START", "true"),
            ("COMPLETED_SESSION_TTL_SECS", "60"),
            ("COMPLETED_SESSION_CAPACITY", "5"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.cors_origin_list(),
            Some(vec!["https://a.example".to_string(), "https://b.example".to_string()])
        );
        assert_eq!(config.start_policy(), StartPolicy::Strict);
        assert_eq!(config.archive_limits().ttl, Duration::from_secs(60));
        assert_eq!(config.archive_limits().capacity, 5);
    }

    #[tokio::test]
    async fn oversized_ttl_is_clamped_and_the_app_still_builds() {
        let config = from_pairs(&[("COMPLETED_SESSION_TTL_SECS", "18446744073709551615")]);
        assert_eq!(config.completed_session_ttl_secs, u64::MAX);
        assert_eq!(
            config.archive_limits().ttl,
            Duration::from_secs(MAX_COMPLETED_SESSION_TTL_SECS)
        );

        let state = crate::AppState::new(config);
        assert_eq!(state.hub.stats().await.archived_sessions, 0);
    }

    #[test]
    fn wildcard_cors_allows_any_origin() {
        let config = Config { cors_origins: "*".to_string(), ..Config::default() };
        assert_eq!(config.cors_origin_list(), None);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let result = envy::from_iter::<_, Config>(vec![("PORT".to_string(), "not-a-port".to_string())]);
        let err = ConfigError::from(result.unwrap_err());
        assert!(err.to_string().starts_with("Environment variable error"));
    }
}
