// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::DocumentStore;

/// Shared, read-only handles every request works with.
///
/// Built once at startup and handed to the router; nothing here is mutated
/// after initialization.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: DocumentStore, tokens: TokenService) -> Self {
        Self {
            store: Arc::new(store),
            tokens: Arc::new(tokens),
        }
    }

    /// In-memory store with a fixed test secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let store = DocumentStore::in_memory().expect("in-memory store");
        Self::new(
            store,
            TokenService::new(b"test-secret-key", chrono::Duration::days(7)),
        )
    }
}
