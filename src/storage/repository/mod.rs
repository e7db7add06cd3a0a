// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository borrows the [`DocumentStore`](super::DocumentStore) and
//! owns the tables of one entity type.

pub mod applications;
pub mod officials;
pub mod users;

pub use applications::{
    ApplicationData, ApplicationRepository, ApplicationStatus, CharacterCertificateData,
    MarriageCertificateData, ServiceType, StoredApplication, VoterRegistrationData,
};
pub use officials::{Official, OfficialRepository, OfficialSearch};
pub use users::{normalize_email, DirectoryError, NewUser, StoredUser, User, UserRepository};
