// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider browse handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use tiffinhub_core::HubError;
use tiffinhub_core::types::page_window;
use tiffinhub_storage::models::ProviderWithOwner;
use tiffinhub_storage::queries::providers;

use crate::error::ApiResult;
use crate::handlers::PageInfo;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProviderListResponse {
    pub providers: Vec<ProviderWithOwner>,
    pub pagination: PageInfo,
}

/// GET /api/providers
///
/// Active providers, best-rated first, filterable by cuisine tag and
/// delivery area.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> ApiResult<Json<ProviderListResponse>> {
    let (page, limit, offset) = page_window(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let result = providers::list_active(&state.db, query.cuisine, query.area, page, limit, offset)
        .await?;
    Ok(Json(ProviderListResponse {
        pagination: PageInfo::of(&result),
        providers: result.items,
    }))
}

#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub provider: ProviderWithOwner,
}

/// GET /api/providers/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProviderResponse>> {
    let provider = providers::get_provider_with_owner(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("provider not found".to_string()))?;
    Ok(Json(ProviderResponse { provider }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browse_query_defaults_are_empty() {
        let q: BrowseQuery = serde_json::from_str("{}").unwrap();
        assert!(q.page.is_none());
        assert!(q.cuisine.is_none());
        assert!(q.area.is_none());
    }
}
