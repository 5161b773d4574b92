// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the TiffinHub service.
//!
//! A single [`Database`] handle (WAL mode, writes serialized through
//! tokio-rusqlite's background thread) backs typed query modules, one per
//! collection, plus the read-side report aggregations. Refinery migrations
//! embedded from `migrations/` run automatically on open.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
