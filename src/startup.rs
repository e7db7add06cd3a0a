// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process bootstrap: logging, store and seed data.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, ConfigError, LogFormat, DEFAULT_LOG_FILTER};
use crate::storage::{DocumentStore, Official, OfficialRepository, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open document store: {0}")]
    Store(#[from] StoreError),

    #[error("opening the document store timed out after {0:?}")]
    StoreTimeout(Duration),

    #[error("store open task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to read officials seed file {path}: {source}")]
    SeedRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("officials seed file {path} is not a JSON array of officials: {source}")]
    SeedFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// Open the store file named by `config`, giving up after the configured
/// timeout.
pub async fn open_store(config: &AppConfig) -> Result<DocumentStore, StartupError> {
    let path = config.database_path();
    tracing::info!(path = %path.display(), "Opening document store");

    let open = tokio::task::spawn_blocking(move || DocumentStore::open(&path));
    match tokio::time::timeout(config.store_open_timeout, open).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(StartupError::StoreTimeout(config.store_open_timeout)),
    }
}

/// Replace the officials directory with the contents of `path`.
pub fn seed_officials(store: &DocumentStore, path: &Path) -> Result<usize, StartupError> {
    let raw = std::fs::read(path).map_err(|source| StartupError::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    let officials: Vec<Official> = serde_json::from_slice(&raw).map_err(|source| StartupError::SeedFormat {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(OfficialRepository::new(store).replace_all(&officials)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::OfficialSearch;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> AppConfig {
        let dir = dir.to_string_lossy().to_string();
        AppConfig::from_lookup(|name| match name {
            "DATABASE_URL" => Some(dir.clone()),
            "SECRET_KEY" => Some("test".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn open_store_creates_file_under_database_url() {
        let temp = TempDir::new().unwrap();
        let config = config_for(&temp.path().join("nested"));

        let store = open_store(&config).await.unwrap();
        assert!(store.ping());
        assert!(config.database_path().exists());
    }

    #[test]
    fn seed_file_replaces_directory() {
        let temp = TempDir::new().unwrap();
        let seed = temp.path().join("officials.json");
        std::fs::write(
            &seed,
            serde_json::json!([{
                "employee_id": "GN2024001",
                "name": "Mr. K.A. Silva",
                "designation": "Grama Niladhari",
                "district": "Colombo",
                "divisional_secretariat": "Colombo",
                "grama_niladhari_division": "Colombo 01",
                "division_code": "COL001",
                "status": "active"
            }])
            .to_string(),
        )
        .unwrap();

        let store = DocumentStore::in_memory().unwrap();
        assert_eq!(seed_officials(&store, &seed).unwrap(), 1);

        let found = OfficialRepository::new(&store)
            .search(&OfficialSearch::default())
            .unwrap();
        assert_eq!(found[0].employee_id, "GN2024001");
        assert!(found[0].languages_spoken.is_empty());
    }

    #[test]
    fn bad_seed_files_are_reported() {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::in_memory().unwrap();

        let missing = seed_officials(&store, &temp.path().join("absent.json"));
        assert!(matches!(missing, Err(StartupError::SeedRead { .. })));

        let garbage = temp.path().join("garbage.json");
        std::fs::write(&garbage, "{\"not\": \"a list\"}").unwrap();
        assert!(matches!(
            seed_officials(&store, &garbage),
            Err(StartupError::SeedFormat { .. })
        ));
    }
}
