// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::models::MissingFields;
use crate::storage::{DirectoryError, StoreError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Required fields absent from a submission, in schema order
    pub missing_fields: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing_fields: Vec<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            missing_fields: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Backing store unreachable. The detail is logged, never returned.
    pub fn not_connected(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Document store unavailable");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Database connection failed")
    }

    /// Unanticipated failure. The detail is logged, never returned.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            missing_fields: self.missing_fields,
        });
        (self.status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(what) => Self::conflict(format!("{what} already exists")),
            e if e.is_unavailable() => Self::not_connected(e),
            e => Self::internal(e),
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::EmailTaken => Self::conflict(err.to_string()),
            DirectoryError::InvalidCredentials => Self::unauthorized(err.to_string()),
            DirectoryError::Hashing(e) => e.into(),
            DirectoryError::Store(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InternalError(detail) => Self::internal(detail),
            other => Self::new(other.status_code(), other.to_string()),
        }
    }
}

impl From<MissingFields> for ApiError {
    fn from(missing: MissingFields) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: missing.to_string(),
            missing_fields: missing.0,
        }
    }
}
