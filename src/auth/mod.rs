// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credentials, session tokens and the guard that protects the API.
//!
//! ## Auth Flow
//!
//! 1. A citizen registers or logs in with email and password
//! 2. The server answers with an HS256 session token (`user_id`, `iat`, `exp`)
//! 3. Protected requests carry `Authorization: Bearer <token>`
//! 4. `require_auth` verifies the token and attaches [`AuthenticatedUser`]
//!    to the request; handlers read it through the [`Auth`] extractor
//!
//! ## Security
//!
//! - Passwords are stored as Argon2id PHC strings, never in plain text
//! - Token failures (bad signature, malformed, expired) are one error
//! - A token is accepted until exactly its `exp` instant, with no leeway

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::{get_current_user, Auth};
pub use middleware::require_auth;
pub use password::{hash_password, verify_dummy_password, verify_password};
pub use roles::Role;
pub use token::TokenService;
