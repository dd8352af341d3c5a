//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                          | Default                         |
//! |-----------------------------------|---------------------------------|
//! | `CINEMA_HOST`                     | `0.0.0.0`                       |
//! | `CINEMA_PORT`                     | `3000`                          |
//! | `CINEMA_DB_PATH`                  | `<data dir>/cinema.db`          |
//! | `CINEMA_DB_MAX_CONNECTIONS`       | `5`                             |
//! | `CINEMA_DB_CONNECT_TIMEOUT_SECS`  | `30`                            |

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cinema_db::DbConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub db_connect_timeout_secs: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `load` passes the process environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            host: lookup("CINEMA_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: parse_or(&lookup, "CINEMA_PORT", 3000)?,

            db_path: match lookup("CINEMA_DB_PATH") {
                Some(path) => PathBuf::from(path),
                None => default_db_path()?,
            },

            db_max_connections: parse_or(&lookup, "CINEMA_DB_MAX_CONNECTIONS", 5)?,

            db_connect_timeout_secs: parse_or(&lookup, "CINEMA_DB_CONNECT_TIMEOUT_SECS", 30)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "CINEMA_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Address for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone())
            .max_connections(self.db_max_connections)
            .connect_timeout(Duration::from_secs(self.db_connect_timeout_secs))
    }

    /// Directory that must exist before the database file can be created.
    pub fn db_dir(&self) -> Option<&Path> {
        self.db_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Platform data directory, e.g. `~/.local/share/cinema/cinema.db` on Linux.
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "cinema", "cinema").ok_or_else(|| {
        ConfigError::MissingRequired("CINEMA_DB_PATH (no home directory found)".to_string())
    })?;

    Ok(dirs.data_dir().join("cinema.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
