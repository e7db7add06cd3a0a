// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles stored on each account.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles. Registration only ever creates citizens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Citizen,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Citizen => write!(f, "citizen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_citizen() {
        assert_eq!(Role::default(), Role::Citizen);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Citizen).unwrap(), r#""citizen""#);
        let parsed: Role = serde_json::from_str(r#""citizen""#).unwrap();
        assert_eq!(parsed, Role::Citizen);
        assert_eq!(Role::Citizen.to_string(), "citizen");
    }
}
