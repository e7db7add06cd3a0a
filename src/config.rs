// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup (after an
//! optional `.env` file has been loaded) and handed to the components that
//! need it. Nothing reads the environment after that.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATABASE_URL` | Directory holding the store file | Required |
//! | `DATABASE_NAME` | Store file stem | `gramaconnect` |
//! | `SECRET_KEY` | Token signing secret | Required |
//! | `JWT_EXPIRATION_DAYS` | Token validity window in days | `7` |
//! | `STORE_OPEN_TIMEOUT_SECS` | Bound on opening the store | `5` |
//! | `OFFICIALS_SEED_FILE` | JSON array of officials loaded at startup | Unset |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration;

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const DATABASE_NAME_ENV: &str = "DATABASE_NAME";
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";
pub const JWT_EXPIRATION_DAYS_ENV: &str = "JWT_EXPIRATION_DAYS";
pub const STORE_OPEN_TIMEOUT_ENV: &str = "STORE_OPEN_TIMEOUT_SECS";
pub const OFFICIALS_SEED_FILE_ENV: &str = "OFFICIALS_SEED_FILE";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_DATABASE_NAME: &str = "gramaconnect";
const DEFAULT_TOKEN_DAYS: i64 = 7;
const DEFAULT_STORE_OPEN_TIMEOUT_SECS: u64 = 5;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Process configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Directory holding the store file
    pub database_url: PathBuf,
    pub database_name: String,
    pub secret_key: String,
    pub token_validity: chrono::Duration,
    pub store_open_timeout: Duration,
    pub officials_seed_file: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("database_name", &self.database_name)
            .field("secret_key", &"<redacted>")
            .field("token_validity", &self.token_validity)
            .field("store_open_timeout", &self.store_open_timeout)
            .field("officials_seed_file", &self.officials_seed_file)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get(DATABASE_URL_ENV)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(DATABASE_URL_ENV))?;
        let secret_key = get(SECRET_KEY_ENV).ok_or(ConfigError::Missing(SECRET_KEY_ENV))?;

        let token_days: i64 = parse_or(get(JWT_EXPIRATION_DAYS_ENV), JWT_EXPIRATION_DAYS_ENV, DEFAULT_TOKEN_DAYS)?;
        if token_days <= 0 {
            return Err(ConfigError::Invalid {
                name: JWT_EXPIRATION_DAYS_ENV,
                value: token_days.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let timeout_secs: u64 = parse_or(
            get(STORE_OPEN_TIMEOUT_ENV),
            STORE_OPEN_TIMEOUT_ENV,
            DEFAULT_STORE_OPEN_TIMEOUT_SECS,
        )?;

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                    reason: "expected `json` or `pretty`".to_string(),
                })
            }
        };

        Ok(Self {
            database_url,
            database_name: get(DATABASE_NAME_ENV).unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            secret_key,
            token_validity: chrono::Duration::days(token_days),
            store_open_timeout: Duration::from_secs(timeout_secs),
            officials_seed_file: get(OFFICIALS_SEED_FILE_ENV).map(PathBuf::from),
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?,
            log_format,
        })
    }

    /// Path of the store file.
    pub fn database_path(&self) -> PathBuf {
        self.database_url.join(format!("{}.redb", self.database_name))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [("DATABASE_URL", "/var/lib/gramaconnect"), ("SECRET_KEY", "s3cret")];

    #[test]
    fn defaults_apply() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.database_name, "gramaconnect");
        assert_eq!(config.token_validity, chrono::Duration::days(7));
        assert_eq!(config.store_open_timeout, Duration::from_secs(5));
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.officials_seed_file.is_none());
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/gramaconnect/gramaconnect.redb")
        );
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(
            load(&[("SECRET_KEY", "s3cret")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn secret_key_must_be_non_empty() {
        assert_eq!(
            load(&[("DATABASE_URL", "/tmp/db"), ("SECRET_KEY", "  ")]).unwrap_err(),
            ConfigError::Missing("SECRET_KEY")
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("DATABASE_NAME", "test"),
            ("JWT_EXPIRATION_DAYS", "1"),
            ("PORT", "8080"),
            ("LOG_FORMAT", "JSON"),
            ("OFFICIALS_SEED_FILE", "data/officials.json"),
        ]);
        let config = load(&vars).unwrap();
        assert_eq!(config.token_validity, chrono::Duration::days(1));
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.officials_seed_file, Some(PathBuf::from("data/officials.json")));
        assert!(config.database_path().ends_with("test.redb"));
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));

        let mut vars = REQUIRED.to_vec();
        vars.push(("JWT_EXPIRATION_DAYS", "0"));
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "JWT_EXPIRATION_DAYS", .. })
        ));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = load(&REQUIRED).unwrap();
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
