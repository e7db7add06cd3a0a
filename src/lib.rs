// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GramaConnect - Citizen Services Backend
//!
//! REST service through which citizens register, log in, apply for
//! government services and look up their local officials.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, session tokens and the request guard
//! - `storage` - Embedded document store (redb) and repositories
//! - `startup` - Logging, store opening and seed data

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod startup;
pub mod state;
pub mod storage;
