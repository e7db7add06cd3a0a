// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for the OpenAPI document.
//!
//! ## Request Validation
//!
//! Request fields are `Option`s so that an absent field and an empty one are
//! reported the same way. Each application request converts into its stored
//! [`ApplicationData`] through `into_data`, which trims required fields and
//! collects every missing one before failing.
//!
//! ## Model Categories
//!
//! - **Accounts**: registration, login and the authenticated user
//! - **Applications**: the three service submissions and the listing
//! - **Officials**: directory lookups

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::{
    ApplicationData, CharacterCertificateData, MarriageCertificateData, NewUser, Official,
    StoredApplication, User, VoterRegistrationData,
};

// =============================================================================
// Required Field Validation
// =============================================================================

/// Required fields that were absent or blank, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<String>);

/// Collects missing required fields while a request is being converted.
#[derive(Default)]
struct RequiredFields {
    missing: Vec<String>,
}

impl RequiredFields {
    /// Trimmed value of a required field, or a note that it is missing.
    fn take(&mut self, name: &str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => {
                self.missing.push(name.to_string());
                String::new()
            }
        }
    }

    fn finish(self) -> Result<(), MissingFields> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields(self.missing))
        }
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// =============================================================================
// Account Models
// =============================================================================

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// National identity card number
    pub nic: Option<String>,
}

impl RegisterRequest {
    /// Validate and convert into a directory entry. `None` when name, email
    /// or password is missing.
    pub fn into_new_user(self) -> Option<NewUser> {
        if !present(&self.name) || !present(&self.email) {
            return None;
        }
        let password = self.password.filter(|p| !p.is_empty())?;

        let trimmed = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();
        Some(NewUser {
            name: trimmed(self.name),
            email: trimmed(self.email),
            password,
            phone: trimmed(self.phone),
            address: trimmed(self.address),
            nic: trimmed(self.nic),
        })
    }
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// `(email, password)` when both are present.
    pub fn credentials(self) -> Option<(String, String)> {
        if !present(&self.email) {
            return None;
        }
        let password = self.password.filter(|p| !p.is_empty())?;
        Some((self.email.unwrap_or_default(), password))
    }
}

/// Response to a successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
    /// Bearer token for subsequent requests
    pub token: String,
}

/// Response for `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: User,
}

// =============================================================================
// Application Models
// =============================================================================

/// Request body for `POST /api/services/marriage-certificate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MarriageCertificateRequest {
    pub groom_name: Option<String>,
    pub bride_name: Option<String>,
    pub marriage_date: Option<String>,
    pub marriage_place: Option<String>,
    pub groom_nic: Option<String>,
    pub bride_nic: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub witnesses: Option<Vec<serde_json::Value>>,
}

impl MarriageCertificateRequest {
    pub fn into_data(self) -> Result<ApplicationData, MissingFields> {
        let mut required = RequiredFields::default();
        let data = MarriageCertificateData {
            groom_name: required.take("groom_name", self.groom_name),
            bride_name: required.take("bride_name", self.bride_name),
            marriage_date: required.take("marriage_date", self.marriage_date),
            marriage_place: required.take("marriage_place", self.marriage_place),
            groom_nic: required.take("groom_nic", self.groom_nic),
            bride_nic: self.bride_nic.unwrap_or_default(),
            witnesses: self.witnesses.unwrap_or_default(),
        };
        required.finish()?;
        Ok(ApplicationData::MarriageCertificate(data))
    }
}

/// Request body for `POST /api/services/character-certificate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CharacterCertificateRequest {
    /// What the certificate will be used for
    pub purpose: Option<String>,
    /// How long the applicant has lived in the division
    pub residence_period: Option<String>,
    pub employment_details: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub character_references: Option<Vec<serde_json::Value>>,
}

impl CharacterCertificateRequest {
    pub fn into_data(self) -> Result<ApplicationData, MissingFields> {
        let mut required = RequiredFields::default();
        let data = CharacterCertificateData {
            purpose: required.take("purpose", self.purpose),
            residence_period: required.take("residence_period", self.residence_period),
            employment_details: self.employment_details.unwrap_or_default(),
            character_references: self.character_references.unwrap_or_default(),
        };
        required.finish()?;
        Ok(ApplicationData::CharacterCertificate(data))
    }
}

/// Request body for `POST /api/services/voter-registration`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct VoterRegistrationRequest {
    /// `address_change`, `name_change` or `new_registration`
    pub update_type: Option<String>,
    pub current_address: Option<String>,
    pub new_address: Option<String>,
    pub reason_for_change: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub supporting_documents: Option<Vec<serde_json::Value>>,
}

impl VoterRegistrationRequest {
    pub fn into_data(self) -> Result<ApplicationData, MissingFields> {
        let mut required = RequiredFields::default();
        let update_type = required.take("update_type", self.update_type);
        let reason_for_change = required.take("reason_for_change", self.reason_for_change);
        required.finish()?;

        Ok(ApplicationData::VoterRegistration(VoterRegistrationData {
            update_type,
            current_address: self.current_address.unwrap_or_default(),
            new_address: self.new_address.unwrap_or_default(),
            reason_for_change,
            supporting_documents: self.supporting_documents.unwrap_or_default(),
        }))
    }
}

/// Response to a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    /// Always `success`
    pub status: String,
    pub message: String,
    pub application: StoredApplication,
}

/// Response for `GET /api/services/applications`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationListResponse {
    pub status: String,
    /// Newest submission first
    pub applications: Vec<StoredApplication>,
}

// =============================================================================
// Official Directory Models
// =============================================================================

/// Query string for `GET /api/grama-niladhari/search`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OfficialSearchQuery {
    /// District name (case-insensitive)
    pub district: Option<String>,
    /// Part of the division name or division code
    pub division: Option<String>,
    /// Part of the official's name
    pub name: Option<String>,
}

impl OfficialSearchQuery {
    /// Whether at least one non-blank filter was given.
    pub fn has_filter(&self) -> bool {
        present(&self.district) || present(&self.division) || present(&self.name)
    }
}

/// Officials matching a directory lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficialsResponse {
    pub status: String,
    pub count: usize,
    pub grama_niladhari_officials: Vec<Official>,
}

impl From<Vec<Official>> for OfficialsResponse {
    fn from(officials: Vec<Official>) -> Self {
        Self {
            status: "success".to_string(),
            count: officials.len(),
            grama_niladhari_officials: officials,
        }
    }
}
