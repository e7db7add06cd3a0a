// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a session token.
///
/// Nothing here is persisted; the payload is rebuilt from the signed token
/// on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Store id of the user the token was issued to
    pub user_id: String,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

/// Authenticated identity extracted from a verified token.
///
/// This is all the Access Guard knows about the caller; resolving the full
/// user record is a separate, explicit step (`get_current_user`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Store id of the user
    pub user_id: String,

    /// Token issue time (Unix timestamp)
    #[serde(skip)]
    pub issued_at: i64,

    /// Token expiration (Unix timestamp)
    #[serde(skip)]
    pub expires_at: i64,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_extracts_user_id_and_window() {
        let user = AuthenticatedUser::from(TokenClaims {
            user_id: "user_123".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_604_800,
        });
        assert_eq!(user.user_id, "user_123");
        assert_eq!(user.issued_at, 1_700_000_000);
        assert_eq!(user.expires_at, 1_700_604_800);
    }

    #[test]
    fn claims_use_user_id_key() {
        let json = serde_json::to_value(TokenClaims {
            user_id: "u".into(),
            iat: 1,
            exp: 2,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"user_id": "u", "iat": 1, "exp": 2}));
    }
}
