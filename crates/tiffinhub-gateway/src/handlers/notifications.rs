// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification center handlers: owner-scoped listing with unread count,
//! single and bulk mark-read.

use axum::Json;
use axum::extract::{Extension, Query, State};
use serde::{Deserialize, Serialize};

use tiffinhub_core::types::page_window;
use tiffinhub_core::{Identity, Notification};
use tiffinhub_storage::queries::notifications;

use crate::error::ApiResult;
use crate::handlers::PageInfo;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub pagination: PageInfo,
    pub unread_count: u64,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<NotificationListQuery>,
) -> ApiResult<Json<NotificationListResponse>> {
    let (page, limit, offset) = page_window(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let (result, unread_count) = notifications::list_for_user(
        &state.db,
        &identity.user_id,
        query.unread_only,
        page,
        limit,
        offset,
    )
    .await?;
    Ok(Json(NotificationListResponse {
        pagination: PageInfo::of(&result),
        notifications: result.items,
        unread_count,
    }))
}

/// Request body for PATCH /api/notifications. Omitting the id set applies
/// the flag to every notification the caller owns.
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default)]
    pub notification_ids: Option<Vec<String>>,
    #[serde(default = "default_mark_as_read")]
    pub mark_as_read: bool,
}

fn default_mark_as_read() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub message: String,
    pub updated: usize,
}

/// PATCH /api/notifications
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<MarkReadRequest>,
) -> ApiResult<Json<MarkReadResponse>> {
    let updated = notifications::mark_read(
        &state.db,
        &identity.user_id,
        body.notification_ids,
        body.mark_as_read,
    )
    .await?;
    Ok(Json(MarkReadResponse {
        message: "notifications updated".to_string(),
        updated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_read_defaults_to_reading_everything() {
        let req: MarkReadRequest = serde_json::from_str("{}").unwrap();
        assert!(req.notification_ids.is_none());
        assert!(req.mark_as_read);
    }

    #[test]
    fn mark_read_accepts_explicit_subset_and_direction() {
        let req: MarkReadRequest = serde_json::from_str(
            r#"{"notification_ids": ["n1", "n2"], "mark_as_read": false}"#,
        )
        .unwrap();
        assert_eq!(req.notification_ids.unwrap().len(), 2);
        assert!(!req.mark_as_read);
    }
}
