// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment gateway integration for TiffinHub.
//!
//! Two concerns: creating gateway-side orders ahead of checkout
//! ([`client`]) and verifying the signature the gateway returns after a
//! completed payment ([`signature`]). Verification is pure and requires no
//! network access.

pub mod client;
pub mod signature;

pub use client::{GatewayOrder, PaymentClient};
pub use signature::{PaymentReference, verify_payment_signature};
