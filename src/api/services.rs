// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Government service applications.
//!
//! Every submission is owned by the authenticated caller, starts out
//! `pending` and gets a reference number of the form `<MC|CC|VR><UTC
//! YYYYMMDDHHMMSS>`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    auth::{get_current_user, Auth, AuthError, AuthenticatedUser},
    error::ApiError,
    models::{
        ApplicationListResponse, CharacterCertificateRequest, MarriageCertificateRequest,
        MissingFields, SubmissionResponse, VoterRegistrationRequest,
    },
    state::AppState,
    storage::{ApplicationData, ApplicationRepository, StoredUser},
};

const NO_DATA: &str = "No data provided";

/// Resolve the caller's account; a token for a vanished user is a 401.
fn current_user(state: &AppState, identity: &AuthenticatedUser) -> Result<StoredUser, ApiError> {
    get_current_user(&state.store, identity)?.ok_or_else(|| AuthError::UserNotFound.into())
}

/// Shared tail of the three submit handlers.
fn submit(
    state: &AppState,
    identity: &AuthenticatedUser,
    data: Result<ApplicationData, MissingFields>,
    message: &str,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let user = current_user(state, identity)?;
    let data = data.map_err(|missing| {
        tracing::debug!(user_id = %user.id, fields = ?missing.0, "Submission missing required fields");
        ApiError::from(missing)
    })?;

    let application = ApplicationRepository::new(&state.store).submit(&user.id, data, Utc::now())?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            status: "success".to_string(),
            message: message.to_string(),
            application,
        }),
    ))
}

/// Apply for a marriage certificate.
#[utoipa::path(
    post,
    path = "/api/services/marriage-certificate",
    tag = "Services",
    security(("bearer" = [])),
    request_body = MarriageCertificateRequest,
    responses(
        (status = 201, description = "Application submitted", body = SubmissionResponse),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn apply_marriage_certificate(
    State(state): State<AppState>,
    Auth(identity): Auth,
    payload: Result<Json<MarriageCertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request(NO_DATA))?;
    submit(
        &state,
        &identity,
        request.into_data(),
        "Marriage certificate application submitted successfully",
    )
}

/// Apply for a character certificate.
#[utoipa::path(
    post,
    path = "/api/services/character-certificate",
    tag = "Services",
    security(("bearer" = [])),
    request_body = CharacterCertificateRequest,
    responses(
        (status = 201, description = "Application submitted", body = SubmissionResponse),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn apply_character_certificate(
    State(state): State<AppState>,
    Auth(identity): Auth,
    payload: Result<Json<CharacterCertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request(NO_DATA))?;
    submit(
        &state,
        &identity,
        request.into_data(),
        "Character certificate application submitted successfully",
    )
}

/// Request a voter registration update.
#[utoipa::path(
    post,
    path = "/api/services/voter-registration",
    tag = "Services",
    security(("bearer" = [])),
    request_body = VoterRegistrationRequest,
    responses(
        (status = 201, description = "Update submitted", body = SubmissionResponse),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn apply_voter_registration(
    State(state): State<AppState>,
    Auth(identity): Auth,
    payload: Result<Json<VoterRegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request(NO_DATA))?;
    submit(
        &state,
        &identity,
        request.into_data(),
        "Voter registration update submitted successfully",
    )
}

/// List the caller's applications, newest first.
#[utoipa::path(
    get,
    path = "/api/services/applications",
    tag = "Services",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Applications of the caller", body = ApplicationListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_applications(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> Result<Json<ApplicationListResponse>, ApiError> {
    let user = current_user(&state, &identity)?;
    let applications = ApplicationRepository::new(&state.store).list_by_user(&user.id)?;

    Ok(Json(ApplicationListResponse {
        status: "success".to_string(),
        applications,
    }))
}
