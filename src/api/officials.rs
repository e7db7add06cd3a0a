// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local official (Grama Niladhari) directory.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{OfficialSearchQuery, OfficialsResponse},
    state::AppState,
    storage::{OfficialRepository, OfficialSearch},
};

/// Active officials of a district, ordered by division code.
#[utoipa::path(
    get,
    path = "/api/grama-niladhari/district/{district}",
    tag = "Officials",
    security(("bearer" = [])),
    params(("district" = String, Path, description = "District name (case-insensitive)")),
    responses(
        (status = 200, description = "Officials of the district", body = OfficialsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_by_district(
    State(state): State<AppState>,
    Auth(_user): Auth,
    Path(district): Path<String>,
) -> Result<Json<OfficialsResponse>, ApiError> {
    let officials = OfficialRepository::new(&state.store).list_by_district(&district)?;
    Ok(Json(officials.into()))
}

/// Search active officials by district, division and name.
#[utoipa::path(
    get,
    path = "/api/grama-niladhari/search",
    tag = "Officials",
    security(("bearer" = [])),
    params(OfficialSearchQuery),
    responses(
        (status = 200, description = "Matching officials", body = OfficialsResponse),
        (status = 400, description = "No search parameter given"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Auth(_user): Auth,
    Query(query): Query<OfficialSearchQuery>,
) -> Result<Json<OfficialsResponse>, ApiError> {
    if !query.has_filter() {
        return Err(ApiError::bad_request(
            "At least one search parameter (district, division, name) is required",
        ));
    }

    let blank_to_none = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let officials = OfficialRepository::new(&state.store).search(&OfficialSearch {
        district: blank_to_none(query.district),
        division: blank_to_none(query.division),
        name: blank_to_none(query.name),
    })?;

    Ok(Json(officials.into()))
}
