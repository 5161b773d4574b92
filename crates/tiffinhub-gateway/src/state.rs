// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared state for axum request handlers.

use std::sync::Arc;

use tiffinhub_auth::SessionSigner;
use tiffinhub_notify::Notifier;
use tiffinhub_payments::PaymentClient;
use tiffinhub_storage::Database;

/// Shared state cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Storage handle; clones share one background connection.
    pub db: Database,
    /// Session token signer/verifier.
    pub signer: SessionSigner,
    /// Payment gateway client; `None` when gateway payments are not
    /// configured (gateway-method orders are then rejected).
    pub payments: Option<PaymentClient>,
    /// Email/SMS side channels.
    pub notifier: Arc<Notifier>,
    /// Order creation policy: `true` persists new orders as confirmed,
    /// `false` leaves them pending for explicit provider confirmation.
    pub auto_confirm: bool,
    /// Set the `Secure` attribute on session cookies.
    pub cookie_secure: bool,
}
