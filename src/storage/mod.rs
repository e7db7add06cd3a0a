// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Store
//!
//! Persistent storage on an embedded redb database (single file, ACID).
//!
//! ## Table Layout
//!
//! ```text
//! users                 user_id           -> JSON StoredUser
//! users_by_email        normalized email  -> user_id
//! applications          application_id    -> JSON StoredApplication
//! applications_by_user  user|rev-time|id  -> application_id
//! reference_numbers     reference number  -> application_id
//! officials             employee_id       -> JSON Official
//! ```
//!
//! Index tables are only written in the same transaction as the rows they
//! point at, which is what makes email addresses and reference numbers
//! unique.

pub mod database;
pub mod repository;

pub use database::{DocumentStore, StoreError, StoreResult};
pub use repository::{
    ApplicationData, ApplicationRepository, ApplicationStatus, CharacterCertificateData,
    DirectoryError, MarriageCertificateData, NewUser, Official, OfficialRepository, OfficialSearch,
    ServiceType, StoredApplication, StoredUser, User, UserRepository, VoterRegistrationData,
};
