// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document store backed by redb (pure Rust, ACID).
//!
//! Every record is a JSON document keyed by a store-generated id. Secondary
//! tables provide lookups and the uniqueness constraints the API relies on.
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_email`: normalized email → user_id (unique)
//! - `applications`: application_id → serialized StoredApplication
//! - `applications_by_user`: composite key (user_id|!submitted_at|app_id) → app_id
//! - `reference_numbers`: reference number → application_id (unique)
//! - `officials`: employee_id → serialized Official

use std::path::Path;

use redb::{backends::InMemoryBackend, Database, ReadableDatabase, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Unique index: lowercase email → user_id.
pub(crate) const USERS_BY_EMAIL: TableDefinition<&str, &str> =
    TableDefinition::new("users_by_email");

/// Primary table: application_id → serialized StoredApplication (JSON bytes).
pub(crate) const APPLICATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("applications");

/// Index: composite key → application_id.
/// Key format: `user_id|!submitted_at_be|application_id` for newest-first range scans.
pub(crate) const APPLICATIONS_BY_USER: TableDefinition<&[u8], &str> =
    TableDefinition::new("applications_by_user");

/// Unique index: reference number → application_id.
pub(crate) const REFERENCE_NUMBERS: TableDefinition<&str, &str> =
    TableDefinition::new("reference_numbers");

/// Primary table: employee_id → serialized Official (JSON bytes).
pub(crate) const OFFICIALS: TableDefinition<&str, &[u8]> = TableDefinition::new("officials");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Whether the failure came from the storage engine rather than the data.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Redb(_)
                | StoreError::RedbDatabase(_)
                | StoreError::RedbTransaction(_)
                | StoreError::RedbTable(_)
                | StoreError::RedbStorage(_)
                | StoreError::RedbCommit(_)
                | StoreError::Io(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// DocumentStore
// =============================================================================

/// Embedded ACID document store.
///
/// Shared by every request through `AppState`; redb serializes write
/// transactions, so each repository write is atomic.
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::with_database(db)
    }

    /// Open a store that lives only in memory (tests and tooling).
    pub fn in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::with_database(db)
    }

    fn with_database(db: Database) -> StoreResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(APPLICATIONS)?;
            let _ = write_txn.open_table(APPLICATIONS_BY_USER)?;
            let _ = write_txn.open_table(REFERENCE_NUMBERS)?;
            let _ = write_txn.open_table(OFFICIALS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Underlying database handle for the repositories.
    pub(crate) fn db(&self) -> &Database {
        &self.db
    }

    /// Check that the store can serve reads.
    pub fn ping(&self) -> bool {
        match self.db.begin_read() {
            Ok(txn) => txn.open_table(USERS).is_ok(),
            Err(_) => false,
        }
    }
}

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for the applications_by_user table.
///
/// Format: `user_id | inverted_micros_be_bytes | application_id`
///
/// The inverted timestamp ensures newest-first ordering when scanning forward.
pub(crate) fn make_index_key(user_id: &str, submitted_micros: i64, application_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(user_id.len() + 1 + 8 + 1 + application_id.len());
    key.extend_from_slice(user_id.as_bytes());
    key.push(b'|');
    key.extend_from_slice(&(u64::MAX - submitted_micros.max(0) as u64).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(application_id.as_bytes());
    key
}

/// Build the `[start, end)` bounds for scanning all index entries of a user.
pub(crate) fn make_prefix_range(user_id: &str) -> (Vec<u8>, Vec<u8>) {
    let mut start = Vec::with_capacity(user_id.len() + 1);
    start.extend_from_slice(user_id.as_bytes());
    start.push(b'|');

    // '|' + 1 sorts after every key carrying the prefix
    let mut end = start.clone();
    if let Some(last) = end.last_mut() {
        *last += 1;
    }
    (start, end)
}

// =============================================================================
// Tests
// =============================================================================
