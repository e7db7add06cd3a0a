// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: registration, login and the current user.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{get_current_user, Auth, AuthError},
    error::ApiError,
    models::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest},
    state::AppState,
    storage::{User, UserRepository},
};

/// Run Argon2-bound directory work on the blocking pool so it never stalls
/// the async workers serving other requests.
async fn run_blocking<T, E>(work: impl FnOnce() -> Result<T, E> + Send + 'static) -> Result<T, ApiError>
where
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(ApiError::internal)?
        .map_err(Into::into)
}

/// Register a new citizen account.
///
/// The email is stored trimmed and lowercased and must be unique regardless
/// of case. The response carries a session token, so the client is logged in
/// right away.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Name, email or password missing"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    const REQUIRED: &str = "Name, email, and password are required";

    let Json(request) = payload.map_err(|_| ApiError::bad_request(REQUIRED))?;
    let new_user = request
        .into_new_user()
        .ok_or_else(|| ApiError::bad_request(REQUIRED))?;

    let store = state.store.clone();
    let user_id = run_blocking(move || UserRepository::new(&store).create(new_user)).await?;
    let user = UserRepository::new(&state.store)
        .find_by_id(&user_id)?
        .ok_or_else(|| ApiError::internal(format!("user {user_id} missing after insert")))?;

    let token = state.tokens.issue(&user_id)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: user.into(),
            token,
        }),
    ))
}

/// Log in with email and password.
///
/// Unknown email and wrong password get the same 401 answer.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    const REQUIRED: &str = "Email and password are required";

    let Json(request) = payload.map_err(|_| ApiError::bad_request(REQUIRED))?;
    let (email, password) = request
        .credentials()
        .ok_or_else(|| ApiError::bad_request(REQUIRED))?;

    let store = state.store.clone();
    let user = run_blocking(move || UserRepository::new(&store).authenticate(&email, &password)).await?;
    let token = state.tokens.issue(&user.id)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
        token,
    }))
}

/// Get the authenticated user's account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = get_current_user(&state.store, &identity)?.ok_or(AuthError::UserNotFound)?;

    Ok(Json(CurrentUserResponse {
        user: User::from(user),
    }))
}
