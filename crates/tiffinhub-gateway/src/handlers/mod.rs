// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers, one module per resource.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod favorites;
pub mod help_requests;
pub mod menus;
pub mod notifications;
pub mod orders;
pub mod providers;
pub mod reviews;
pub mod settings;
pub mod users;

use axum::Json;
use serde::Serialize;

use tiffinhub_core::types::Page;
use tiffinhub_core::{HubError, Identity, Role, ServiceProvider};

use crate::state::AppState;

/// Resolve the acting provider's business profile, rejecting other roles.
///
/// Ownership ids on menus and orders reference `ServiceProvider.id`, so
/// provider-scoped handlers resolve the record from the identity first.
pub(crate) async fn require_own_provider(
    state: &AppState,
    identity: &Identity,
) -> Result<ServiceProvider, HubError> {
    if identity.role != Role::Provider {
        return Err(HubError::Forbidden("provider role required".to_string()));
    }
    tiffinhub_storage::queries::providers::get_provider_by_user(&state.db, &identity.user_id)
        .await?
        .ok_or_else(|| HubError::NotFound("provider profile not found".to_string()))
}

/// Pagination envelope mirrored into every paginated response.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub item_count: usize,
    pub total_records: u64,
}

impl PageInfo {
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            current_page: page.current_page,
            total_pages: page.total_pages,
            item_count: page.item_count,
            total_records: page.total_records,
        }
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
