// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the TiffinHub service.
//!
//! This crate provides the error taxonomy, domain entities, and pure
//! lifecycle rules used throughout the TiffinHub workspace. It performs
//! no I/O; persistence and transport live in the sibling crates.

pub mod error;
pub mod lifecycle;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HubError;
pub use types::{
    HelpCategory, HelpKind, HelpPriority, HelpRequest, HelpResponse, HelpStatus, Identity, Menu,
    MenuCategory, MenuItem, Notification, NotificationKind, Order, OrderItem, OrderStatus, Page,
    PaymentStatus, Review, Role, ServiceProvider, User,
};
