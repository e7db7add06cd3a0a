// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Version reported by the status endpoints.
pub const API_VERSION: &str = "2.0.0";

/// Service status with document store connectivity.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
    /// `success` for the greeting, `healthy` for the health check
    pub status: String,
    /// `connected` or `disconnected`
    pub database: String,
    pub version: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn database_status(state: &AppState) -> String {
    if state.store.ping() {
        "connected".to_string()
    } else {
        "disconnected".to_string()
    }
}

/// Greeting with database status.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service greeting", body = StatusResponse)
    )
)]
pub async fn hello(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Hello World from GramaConnect Backend!".to_string(),
        status: "success".to_string(),
        database: database_status(&state),
        version: API_VERSION.to_string(),
    })
}

/// Health check endpoint handler.
///
/// Always answers 200; store trouble shows up as `"database":
/// "disconnected"`.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = StatusResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Backend is running!".to_string(),
        status: "healthy".to_string(),
        database: database_status(&state),
        version: API_VERSION.to_string(),
    })
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
/// Does not check dependencies.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
