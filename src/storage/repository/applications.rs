// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service application repository.
//!
//! Applications are owned by this repository; the submitting user is only
//! referenced by id. Each submission writes three rows in one transaction:
//! the application itself, its `applications_by_user` index entry, and the
//! claim on its reference number.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storage::database::{
    make_index_key, make_prefix_range, DocumentStore, StoreResult, APPLICATIONS,
    APPLICATIONS_BY_USER, REFERENCE_NUMBERS,
};

/// Government services that accept online applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    MarriageCertificate,
    CharacterCertificate,
    VoterRegistration,
}

impl ServiceType {
    /// Two-letter prefix of the reference numbers issued for this service.
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            ServiceType::MarriageCertificate => "MC",
            ServiceType::CharacterCertificate => "CC",
            ServiceType::VoterRegistration => "VR",
        }
    }
}

/// Processing state of an application.
///
/// Submissions always start out `Pending`. The decision states are written
/// by the officer-side workflow outside this service and only read back here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MarriageCertificateData {
    pub groom_name: String,
    pub bride_name: String,
    pub marriage_date: String,
    pub marriage_place: String,
    pub groom_nic: String,
    pub bride_nic: String,
    #[schema(value_type = Vec<Object>)]
    pub witnesses: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CharacterCertificateData {
    pub purpose: String,
    pub residence_period: String,
    pub employment_details: String,
    #[schema(value_type = Vec<Object>)]
    pub character_references: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct VoterRegistrationData {
    /// e.g. `address_change`, `name_change`, `new_registration`
    pub update_type: String,
    pub current_address: String,
    pub new_address: String,
    pub reason_for_change: String,
    #[schema(value_type = Vec<Object>)]
    pub supporting_documents: Vec<serde_json::Value>,
}

/// Service-specific payload of an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ApplicationData {
    MarriageCertificate(MarriageCertificateData),
    CharacterCertificate(CharacterCertificateData),
    VoterRegistration(VoterRegistrationData),
}

impl ApplicationData {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ApplicationData::MarriageCertificate(_) => ServiceType::MarriageCertificate,
            ApplicationData::CharacterCertificate(_) => ServiceType::CharacterCertificate,
            ApplicationData::VoterRegistration(_) => ServiceType::VoterRegistration,
        }
    }
}

/// Application as stored and as returned to its owner.
///
/// Key names (`_id`, `submitted_date`) follow the wire format the web
/// client already consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredApplication {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub service_type: ServiceType,
    pub status: ApplicationStatus,
    pub application_data: ApplicationData,
    #[serde(rename = "submitted_date")]
    pub submitted_at: DateTime<Utc>,
    pub reference_number: String,
    pub notes: String,
}

/// Base reference number: service prefix + UTC `YYYYMMDDHHMMSS`.
pub fn reference_number(service: ServiceType, at: DateTime<Utc>) -> String {
    format!("{}{}", service.reference_prefix(), at.format("%Y%m%d%H%M%S"))
}

/// Repository for service applications.
pub struct ApplicationRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> ApplicationRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Persist a new pending application for `user_id`.
    ///
    /// The reference number is claimed inside the same transaction. When the
    /// base number for this second is taken, `-2`, `-3`, ... is appended.
    pub fn submit(
        &self,
        user_id: &str,
        data: ApplicationData,
        submitted_at: DateTime<Utc>,
    ) -> StoreResult<StoredApplication> {
        let service_type = data.service_type();
        let base_reference = reference_number(service_type, submitted_at);

        let mut application = StoredApplication {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            service_type,
            status: ApplicationStatus::Pending,
            application_data: data,
            submitted_at,
            reference_number: base_reference.clone(),
            notes: String::new(),
        };

        let write_txn = self.store.db().begin_write()?;
        {
            let mut references = write_txn.open_table(REFERENCE_NUMBERS)?;
            let mut attempt = 1u32;
            while references.get(application.reference_number.as_str())?.is_some() {
                attempt += 1;
                application.reference_number = format!("{base_reference}-{attempt}");
            }
            references.insert(application.reference_number.as_str(), application.id.as_str())?;

            let json = serde_json::to_vec(&application)?;
            let mut apps = write_txn.open_table(APPLICATIONS)?;
            apps.insert(application.id.as_str(), json.as_slice())?;

            let key = make_index_key(user_id, submitted_at.timestamp_micros(), &application.id);
            let mut idx = write_txn.open_table(APPLICATIONS_BY_USER)?;
            idx.insert(key.as_slice(), application.id.as_str())?;
        }
        write_txn.commit()?;

        tracing::info!(
            application_id = %application.id,
            reference_number = %application.reference_number,
            service_type = ?service_type,
            "Application submitted"
        );

        Ok(application)
    }

    /// All applications of `user_id`, newest submission first.
    pub fn list_by_user(&self, user_id: &str) -> StoreResult<Vec<StoredApplication>> {
        let read_txn = self.store.db().begin_read()?;
        let idx = read_txn.open_table(APPLICATIONS_BY_USER)?;
        let apps = read_txn.open_table(APPLICATIONS)?;

        let (start, end) = make_prefix_range(user_id);
        let mut results = Vec::new();

        for entry in idx.range(start.as_slice()..end.as_slice())? {
            let (_, application_id) = entry?;
            match apps.get(application_id.value())? {
                Some(value) => results.push(serde_json::from_slice(value.value())?),
                None => tracing::warn!(
                    application_id = %application_id.value(),
                    "Index entry points at a missing application"
                ),
            }
        }

        Ok(results)
    }
}
