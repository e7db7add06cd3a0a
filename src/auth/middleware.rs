// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to the protected router subtree:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/api/services/applications", get(list_applications))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::authenticate_headers;
use crate::state::AppState;

/// Reject the request unless it carries a valid bearer token.
///
/// On success the [`AuthenticatedUser`](super::AuthenticatedUser) is
/// inserted into the request extensions before the handler runs.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match authenticate_headers(request.headers(), &state.tokens) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Auth;
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, StatusCode},
        routing::get,
        Router,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    async fn whoami(Auth(user): Auth) -> String {
        user.user_id
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    async fn call(state: AppState, header: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(header) = header {
            builder = builder.header(AUTHORIZATION, header);
        }
        let response = app(state)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let state = AppState::for_tests();
        let token = state.tokens.issue("user_42").unwrap();

        let (status, body) = call(state, Some(format!("bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user_42");
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let (status, body) = call(AppState::for_tests(), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error_code"], "missing_auth_header");
    }

    #[tokio::test]
    async fn wrong_scheme_is_401() {
        let (status, body) = call(AppState::for_tests(), Some("Basic dXNlcjpwdw==".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error_code"], "invalid_auth_header");
    }

    #[tokio::test]
    async fn expired_token_is_401() {
        let state = AppState::for_tests();
        let token = state
            .tokens
            .issue_at("user_42", Utc::now() - Duration::days(8))
            .unwrap();

        let (status, body) = call(state, Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Invalid or expired token");
    }
}
