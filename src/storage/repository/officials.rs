// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Directory of local officials (Grama Niladhari).
//!
//! The table is small and read-mostly, so lookups scan it and filter in
//! memory. It is populated from a seed file at startup.

use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::database::{DocumentStore, StoreResult, OFFICIALS};

/// A local official and their office details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Official {
    pub employee_id: String,
    pub name: String,
    pub designation: String,
    pub district: String,
    pub divisional_secretariat: String,
    pub grama_niladhari_division: String,
    pub division_code: String,
    #[serde(default)]
    pub office_phone: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub office_address: String,
    #[serde(default)]
    pub office_hours: String,
    #[serde(default)]
    pub lunch_break: String,
    #[serde(default)]
    pub languages_spoken: Vec<String>,
    #[serde(default)]
    pub services_provided: Vec<String>,
    /// `active` officials are the only ones listed
    pub status: String,
    #[serde(default)]
    pub appointed_date: String,
}

impl Official {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Filters for [`OfficialRepository::search`]. All comparisons are
/// case-insensitive; unset filters match everything.
#[derive(Debug, Clone, Default)]
pub struct OfficialSearch {
    /// Exact district name
    pub district: Option<String>,
    /// Substring of the division name or division code
    pub division: Option<String>,
    /// Substring of the official's name
    pub name: Option<String>,
}

impl OfficialSearch {
    fn matches(&self, official: &Official) -> bool {
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.trim().to_lowercase())
        };

        let district_ok = self
            .district
            .as_deref()
            .map_or(true, |d| official.district.eq_ignore_ascii_case(d.trim()));
        let division_ok = self.division.as_deref().map_or(true, |d| {
            contains(&official.grama_niladhari_division, d) || contains(&official.division_code, d)
        });
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |n| contains(&official.name, n));

        district_ok && division_ok && name_ok
    }
}

/// Repository for the officials directory.
pub struct OfficialRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> OfficialRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Replace the whole directory with `officials`.
    pub fn replace_all(&self, officials: &[Official]) -> StoreResult<usize> {
        let write_txn = self.store.db().begin_write()?;
        {
            let mut table = write_txn.open_table(OFFICIALS)?;
            table.retain(|_, _| false)?;
            for official in officials {
                let json = serde_json::to_vec(official)?;
                table.insert(official.employee_id.as_str(), json.as_slice())?;
            }
        }
        write_txn.commit()?;

        tracing::info!(count = officials.len(), "Officials directory replaced");
        Ok(officials.len())
    }

    /// Active officials matching `search`, ordered by division code.
    pub fn search(&self, search: &OfficialSearch) -> StoreResult<Vec<Official>> {
        let read_txn = self.store.db().begin_read()?;
        let table = read_txn.open_table(OFFICIALS)?;

        let mut officials = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let official: Official = serde_json::from_slice(value.value())?;
            if official.is_active() && search.matches(&official) {
                officials.push(official);
            }
        }

        officials.sort_by(|a, b| a.division_code.cmp(&b.division_code));
        Ok(officials)
    }

    /// Active officials of one district.
    pub fn list_by_district(&self, district: &str) -> StoreResult<Vec<Official>> {
        self.search(&OfficialSearch {
            district: Some(district.to_string()),
            ..Default::default()
        })
    }
}
