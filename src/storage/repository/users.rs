// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User directory.
//!
//! Users live in the `users` table; `users_by_email` maps the normalized
//! email to the user id and is what makes email addresses unique. Both rows
//! are written in one transaction, so two concurrent registrations of the
//! same address cannot both succeed.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{hash_password, verify_dummy_password, verify_password, AuthError, Role};
use crate::storage::database::{DocumentStore, StoreError, StoreResult, USERS, USERS_BY_EMAIL};

/// User record as persisted. Carries the password hash and therefore never
/// leaves the server; convert to [`User`] for any outbound representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    /// Trimmed, lowercase
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// National identity card number
    #[serde(default)]
    pub nic: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user (no password material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub nic: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for User {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            nic: user.nic,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Input for [`UserRepository::create`].
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub nic: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Hashing(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Register a new user and return its id.
    ///
    /// The email is normalized before the uniqueness check; the role
    /// defaults to citizen.
    pub fn create(&self, new_user: NewUser) -> Result<String, DirectoryError> {
        let email = normalize_email(&new_user.email);

        // Fail fast before paying for the hash; `insert` re-checks atomically.
        if self.find_by_email(&email)?.is_some() {
            return Err(DirectoryError::EmailTaken);
        }

        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email,
            password_hash: hash_password(&new_user.password)?,
            phone: new_user.phone,
            address: new_user.address,
            nic: new_user.nic,
            role: Role::default(),
            created_at: Utc::now(),
        };

        match self.insert(&user) {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "User created");
                Ok(user.id)
            }
            Err(StoreError::AlreadyExists(_)) => Err(DirectoryError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a user row and its email index entry in one transaction.
    pub fn insert(&self, user: &StoredUser) -> StoreResult<()> {
        let json = serde_json::to_vec(user)?;

        let write_txn = self.store.db().begin_write()?;
        {
            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
            if by_email.get(user.email.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("User {}", user.email)));
            }
            by_email.insert(user.email.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a user by id. Ids that are not valid UUIDs are simply unknown.
    pub fn find_by_id(&self, user_id: &str) -> StoreResult<Option<StoredUser>> {
        if Uuid::parse_str(user_id).is_err() {
            return Ok(None);
        }

        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a user by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        let email = normalize_email(email);

        let user_id = {
            let read_txn = self.store.db().begin_read()?;
            let table = read_txn.open_table(USERS_BY_EMAIL)?;
            let found = table.get(email.as_str())?.map(|v| v.value().to_string());
            found
        };

        match user_id {
            Some(id) => self.find_by_id(&id),
            None => Ok(None),
        }
    }

    /// Check credentials and return the public view of the user.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller,
    /// in the error and in the time taken: both pay for one Argon2
    /// verification.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, DirectoryError> {
        let Some(user) = self.find_by_email(email)? else {
            verify_dummy_password(password);
            return Err(DirectoryError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            return Err(DirectoryError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User authenticated");
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Kamal Perera".to_string(),
            email: email.to_string(),
            password: "s3cret-pass".to_string(),
            phone: "0771234567".to_string(),
            address: "12 Temple Road, Kandy".to_string(),
            nic: "199012345678".to_string(),
        }
    }

    #[test]
    fn create_and_find_user() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = UserRepository::new(&store);

        let id = repo.create(new_user("  Kamal@Example.com ")).unwrap();

        let by_id = repo.find_by_id(&id).unwrap().unwrap();
        assert_eq!(by_id.email, "kamal@example.com");
        assert_eq!(by_id.role, Role::Citizen);
        assert_ne!(by_id.password_hash, "s3cret-pass");

        let by_email = repo.find_by_email("KAMAL@example.COM").unwrap().unwrap();
        assert_eq!(by_email.id, id);
    }

    #[test]
    fn duplicate_email_is_rejected_regardless_of_case() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = UserRepository::new(&store);

        repo.create(new_user("A@B.com")).unwrap();
        let second = repo.create(new_user("a@b.com"));
        assert!(matches!(second, Err(DirectoryError::EmailTaken)));
    }

    #[test]
    fn insert_enforces_uniqueness_in_store() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = UserRepository::new(&store);

        repo.create(new_user("dup@example.com")).unwrap();
        let existing = repo.find_by_email("dup@example.com").unwrap().unwrap();

        let mut clone = existing.clone();
        clone.id = Uuid::new_v4().to_string();
        assert!(matches!(repo.insert(&clone), Err(StoreError::AlreadyExists(_))));
        assert!(repo.find_by_id(&clone.id).unwrap().is_none());
    }

    #[test]
    fn concurrent_registrations_create_one_user() {
        let store = DocumentStore::in_memory().unwrap();

        let results: Vec<Result<String, DirectoryError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let store = &store;
                    scope.spawn(move || {
                        let email = if i % 2 == 0 { "race@example.com" } else { "RACE@example.com" };
                        UserRepository::new(store).create(new_user(email))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, DirectoryError::EmailTaken)));
    }

    #[test]
    fn malformed_or_unknown_id_is_not_found() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = UserRepository::new(&store);

        assert!(repo.find_by_id("not-an-id").unwrap().is_none());
        assert!(repo.find_by_id("").unwrap().is_none());
        assert!(repo.find_by_id(&Uuid::new_v4().to_string()).unwrap().is_none());
    }

    #[test]
    fn authenticate_returns_public_user() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = UserRepository::new(&store);
        let id = repo.create(new_user("login@example.com")).unwrap();

        let user = repo.authenticate("Login@Example.com", "s3cret-pass").unwrap();
        assert_eq!(user.id, id);

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn authenticate_failures_are_indistinguishable() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = UserRepository::new(&store);
        repo.create(new_user("login@example.com")).unwrap();

        let wrong_password = repo.authenticate("login@example.com", "nope");
        let unknown_email = repo.authenticate("ghost@example.com", "s3cret-pass");

        assert!(matches!(wrong_password, Err(DirectoryError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(DirectoryError::InvalidCredentials)));
    }

    #[test]
    fn unknown_email_costs_a_password_verification() {
        let store = DocumentStore::in_memory().unwrap();
        let repo = UserRepository::new(&store);
        repo.create(new_user("login@example.com")).unwrap();

        // Warm the dummy hash so its one-time setup is not measured
        assert!(repo.authenticate("ghost@example.com", "x").is_err());

        let timed = |email: &str| {
            let started = std::time::Instant::now();
            for _ in 0..3 {
                assert!(repo.authenticate(email, "wrong-pass").is_err());
            }
            started.elapsed()
        };
        let wrong_password = timed("login@example.com");
        let unknown_email = timed("ghost@example.com");

        assert!(
            unknown_email * 4 >= wrong_password,
            "unknown email {unknown_email:?} vs wrong password {wrong_password:?}"
        );
    }
}
