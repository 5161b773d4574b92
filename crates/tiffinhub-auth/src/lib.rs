// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity primitives for TiffinHub: argon2id password hashing and
//! HS256 session tokens.
//!
//! Session invalidation ("logout everywhere") is a storage concern: the
//! user's token_version is incremented there, and the gateway middleware
//! rejects credentials whose embedded token_version no longer matches.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, SessionSigner};
