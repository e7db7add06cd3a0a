// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_auth, Role},
    models::{
        ApplicationListResponse, AuthResponse, CharacterCertificateRequest, CurrentUserResponse,
        LoginRequest, MarriageCertificateRequest, OfficialsResponse, RegisterRequest,
        SubmissionResponse, VoterRegistrationRequest,
    },
    state::AppState,
    storage::{
        ApplicationData, ApplicationStatus, CharacterCertificateData, MarriageCertificateData,
        Official, ServiceType, StoredApplication, User, VoterRegistrationData,
    },
};

pub mod auth;
pub mod health;
pub mod officials;
pub mod services;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(health::hello))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/services/marriage-certificate",
            post(services::apply_marriage_certificate),
        )
        .route(
            "/api/services/character-certificate",
            post(services::apply_character_certificate),
        )
        .route(
            "/api/services/voter-registration",
            post(services::apply_voter_registration),
        )
        .route("/api/services/applications", get(services::list_applications))
        .route(
            "/api/grama-niladhari/district/{district}",
            get(officials::list_by_district),
        )
        .route("/api/grama-niladhari/search", get(officials::search))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Registers the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "GramaConnect API", version = "2.0.0"),
    paths(
        health::hello,
        health::health,
        health::liveness,
        auth::register,
        auth::login,
        auth::me,
        services::apply_marriage_certificate,
        services::apply_character_certificate,
        services::apply_voter_registration,
        services::list_applications,
        officials::list_by_district,
        officials::search
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CurrentUserResponse,
            User,
            Role,
            MarriageCertificateRequest,
            CharacterCertificateRequest,
            VoterRegistrationRequest,
            SubmissionResponse,
            ApplicationListResponse,
            StoredApplication,
            ApplicationData,
            MarriageCertificateData,
            CharacterCertificateData,
            VoterRegistrationData,
            ServiceType,
            ApplicationStatus,
            Official,
            OfficialsResponse,
            health::StatusResponse,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service status"),
        (name = "Auth", description = "Registration, login and the current user"),
        (name = "Services", description = "Government service applications"),
        (name = "Officials", description = "Grama Niladhari directory")
    )
)]
struct ApiDoc;
