// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the TiffinHub service.

use thiserror::Error;

/// The primary error type used across all TiffinHub crates.
///
/// The gateway maps each variant to an HTTP status in exactly one place;
/// everything below the gateway propagates `HubError` with `?`.
#[derive(Debug, Error)]
pub enum HubError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed or missing request input. Maps to 400.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, invalid, or expired credential. Maps to 401.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Valid identity but insufficient role or non-ownership. Maps to 403.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A referenced record does not resolve. Maps to 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Payment gateway rejection (signature mismatch, order creation failure).
    /// A signature mismatch is a hard 400 rejection of the order.
    #[error("payment error: {0}")]
    Payment(String),

    /// Notification channel errors (SMTP, SMS provider). Producers treat
    /// these as best-effort: logged and swallowed, never propagated to the
    /// primary response.
    #[error("notification error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors. Maps to a generic 500.
    #[error("internal error: {0}")]
    Internal(String),
}
