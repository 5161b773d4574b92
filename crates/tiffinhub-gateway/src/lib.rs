// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the TiffinHub service.
//!
//! Assembles the axum router over the storage, auth, payments, and notify
//! crates. The identity middleware verifies the session credential once per
//! request and hands every handler a request-scoped [`tiffinhub_core::Identity`];
//! handlers perform ownership and role checks before mutating anything.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use server::{build_router, start_server};
pub use state::AppState;
