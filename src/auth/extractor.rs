// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser, TokenService};
use crate::state::AppState;
use crate::storage::{DocumentStore, StoreResult, StoredUser, UserRepository};

/// Extractor for authenticated users.
///
/// Inside the protected router `require_auth` has already verified the
/// token, so this only reads the request extensions. Outside of it the
/// header is verified here.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = authenticate_headers(&parts.headers, &state.tokens)?;
        Ok(Auth(user))
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The value is split at the first space; the scheme must be `Bearer`
/// (any case) and the token must be non-empty.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case("Bearer") || token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Verify the bearer token carried by `headers`.
pub(crate) fn authenticate_headers(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = parse_bearer(auth_header)?;
    tokens.verify(token)
}

/// Resolve the full user record behind an authenticated identity.
///
/// `Ok(None)` means the token was valid but the user is gone (or the id is
/// malformed); handlers answer that with 401 "User not authenticated".
pub fn get_current_user(
    store: &DocumentStore,
    user: &AuthenticatedUser,
) -> StoreResult<Option<StoredUser>> {
    UserRepository::new(store).find_by_id(&user.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NewUser;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn parse_bearer_accepts_any_case_scheme() {
        assert_eq!(parse_bearer("Bearer abc").unwrap(), "abc");
        assert_eq!(parse_bearer("bearer abc").unwrap(), "abc");
        assert_eq!(parse_bearer("BEARER abc").unwrap(), "abc");
    }

    #[test]
    fn parse_bearer_rejects_malformed_values() {
        for value in ["Bearer", "Bearer ", "Basic abc", "Token abc", "abc", ""] {
            assert!(
                matches!(parse_bearer(value), Err(AuthError::InvalidAuthHeader)),
                "{value:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::for_tests();
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_issued_token() {
        let state = AppState::for_tests();
        let token = state.tokens.issue("user_123").unwrap();
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.user_id, "user_123");
    }

    #[tokio::test]
    async fn auth_extractor_rejects_bad_token() {
        let state = AppState::for_tests();
        let mut parts = parts_with_header(Some("Bearer not.a.token"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let state = AppState::for_tests();
        let mut parts = parts_with_header(None);
        parts.extensions.insert(AuthenticatedUser {
            user_id: "user_from_middleware".to_string(),
            issued_at: 0,
            expires_at: 0,
        });

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.user_id, "user_from_middleware");
    }

    #[test]
    fn get_current_user_resolves_or_returns_none() {
        let state = AppState::for_tests();
        let id = UserRepository::new(&state.store)
            .create(NewUser {
                name: "Sunil".into(),
                email: "sunil@example.com".into(),
                password: "pw123456".into(),
                ..Default::default()
            })
            .unwrap();

        let known = AuthenticatedUser {
            user_id: id.clone(),
            issued_at: 0,
            expires_at: 0,
        };
        let found = get_current_user(&state.store, &known).unwrap().unwrap();
        assert_eq!(found.id, id);

        let unknown = AuthenticatedUser {
            user_id: "deleted-user".to_string(),
            issued_at: 0,
            expires_at: 0,
        };
        assert!(get_current_user(&state.store, &unknown).unwrap().is_none());
    }
}
