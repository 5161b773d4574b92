// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Help-desk handlers: ticket creation with recipient fan-out, role-scoped
//! listing, thread reads, and participant updates.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use tiffinhub_core::types::{new_id, now_rfc3339, page_window};
use tiffinhub_core::{
    HelpCategory, HelpKind, HelpPriority, HelpRequest, HelpResponse, HelpStatus, HubError,
    Identity, Notification, NotificationKind, Role,
};
use tiffinhub_storage::models::HelpRequestWithParties;
use tiffinhub_storage::queries::help_requests::{self, HelpFilter, HelpUpdate};
use tiffinhub_storage::queries::{notifications, users};

use crate::error::ApiResult;
use crate::handlers::PageInfo;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct HelpListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default, rename = "type")]
    pub kind: Option<HelpKind>,
    #[serde(default)]
    pub status: Option<HelpStatus>,
    #[serde(default)]
    pub priority: Option<HelpPriority>,
}

#[derive(Debug, Serialize)]
pub struct HelpListResponse {
    pub help_requests: Vec<HelpRequestWithParties>,
    pub pagination: PageInfo,
}

/// GET /api/help-requests
///
/// Admins see the admin-routed types (consumer-to-provider only when
/// filtered for); everyone else sees threads they participate in.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<HelpListQuery>,
) -> ApiResult<Json<HelpListResponse>> {
    let (page, limit, offset) = page_window(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let filter = HelpFilter {
        kind: query.kind,
        status: query.status,
        priority: query.priority,
    };
    let result = if identity.role == Role::Admin {
        help_requests::list_for_admin(&state.db, filter, page, limit, offset).await?
    } else {
        help_requests::list_for_participant(
            &state.db,
            &identity.user_id,
            filter,
            page,
            limit,
            offset,
        )
        .await?
    };
    Ok(Json(HelpListResponse {
        pagination: PageInfo::of(&result),
        help_requests: result.items,
    }))
}

/// Request body for POST /api/help-requests.
#[derive(Debug, Deserialize)]
pub struct CreateHelpRequest {
    #[serde(default)]
    pub to_user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: HelpKind,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub priority: Option<HelpPriority>,
    #[serde(default)]
    pub category: Option<HelpCategory>,
}

#[derive(Debug, Serialize)]
pub struct HelpResponseBody {
    pub message: String,
    pub help_request: HelpRequest,
}

/// POST /api/help-requests
///
/// Admin-routed types notify every admin; consumer-to-provider notifies
/// the explicit recipient.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateHelpRequest>,
) -> ApiResult<(StatusCode, Json<HelpResponseBody>)> {
    if body.subject.trim().is_empty() || body.message.trim().is_empty() {
        return Err(HubError::Validation("subject and message are required".to_string()).into());
    }
    if body.kind == HelpKind::ConsumerToProvider {
        let Some(to_user_id) = &body.to_user_id else {
            return Err(HubError::Validation(
                "consumer_to_provider requests need a recipient".to_string(),
            )
            .into());
        };
        if users::get_user(&state.db, to_user_id).await?.is_none() {
            return Err(HubError::NotFound("recipient not found".to_string()).into());
        }
    }

    let now = now_rfc3339();
    let request = HelpRequest {
        id: new_id(),
        from_user_id: identity.user_id.clone(),
        // Admin-routed types have no single recipient; all admins are
        // implicit.
        to_user_id: if body.kind == HelpKind::ConsumerToProvider {
            body.to_user_id
        } else {
            None
        },
        kind: body.kind,
        subject: body.subject,
        message: body.message,
        status: HelpStatus::Open,
        priority: body.priority.unwrap_or(HelpPriority::Medium),
        category: body.category.unwrap_or(HelpCategory::General),
        responses: Vec::new(),
        resolved_at: None,
        resolved_by: None,
        created_at: now.clone(),
        updated_at: now,
    };
    help_requests::create_help_request(&state.db, &request).await?;

    let recipients: Vec<String> = match request.kind {
        HelpKind::AdminSupport | HelpKind::ProviderSupport => users::list_admins(&state.db)
            .await?
            .into_iter()
            .map(|admin| admin.id)
            .collect(),
        HelpKind::ConsumerToProvider => request.to_user_id.iter().cloned().collect(),
    };
    let records: Vec<Notification> = recipients
        .into_iter()
        .map(|user_id| {
            Notification::new(
                user_id,
                "New Help Request".to_string(),
                format!("You have received a new help request: {}", request.subject),
                NotificationKind::System,
                Some(serde_json::json!({
                    "help_request_id": request.id,
                    "type": request.kind,
                })),
            )
        })
        .collect();
    notifications::create_notifications(&state.db, records).await?;

    Ok((
        StatusCode::CREATED,
        Json(HelpResponseBody {
            message: "help request created successfully".to_string(),
            help_request: request,
        }),
    ))
}

fn can_access(identity: &Identity, request: &HelpRequest) -> bool {
    identity.role == Role::Admin
        || request.from_user_id == identity.user_id
        || request.to_user_id.as_deref() == Some(identity.user_id.as_str())
}

#[derive(Debug, Serialize)]
pub struct HelpDetailResponse {
    pub help_request: HelpRequestWithParties,
}

/// GET /api/help-requests/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<HelpDetailResponse>> {
    let request = help_requests::get_help_request(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("help request not found".to_string()))?;
    if !can_access(&identity, &request.request) {
        return Err(HubError::Forbidden("not a participant of this request".to_string()).into());
    }
    Ok(Json(HelpDetailResponse {
        help_request: request,
    }))
}

/// Request body for PATCH /api/help-requests/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateHelpRequest {
    #[serde(default)]
    pub status: Option<HelpStatus>,
    #[serde(default)]
    pub priority: Option<HelpPriority>,
    #[serde(default)]
    pub response: Option<String>,
}

/// PATCH /api/help-requests/{id}
///
/// Only the sender, the designated recipient, or an admin may mutate a
/// request. An appended response notifies the other party.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<UpdateHelpRequest>,
) -> ApiResult<Json<HelpResponseBody>> {
    let existing = help_requests::get_help_request(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("help request not found".to_string()))?;
    if !can_access(&identity, &existing.request) {
        return Err(HubError::Forbidden("not a participant of this request".to_string()).into());
    }

    let response = body.response.map(|message| HelpResponse {
        user_id: identity.user_id.clone(),
        message,
        timestamp: now_rfc3339(),
        is_admin: identity.role == Role::Admin,
    });
    let appended = response.is_some();

    let updated = help_requests::update_help_request(
        &state.db,
        &id,
        &identity.user_id,
        HelpUpdate {
            status: body.status,
            priority: body.priority,
            response,
        },
    )
    .await?
    .ok_or_else(|| HubError::NotFound("help request not found".to_string()))?;

    if appended {
        // The other party: the recipient when the sender responds, the
        // sender otherwise.
        let notify_user_id = if updated.from_user_id == identity.user_id {
            updated.to_user_id.clone()
        } else {
            Some(updated.from_user_id.clone())
        };
        if let Some(user_id) = notify_user_id {
            notifications::create_notifications(
                &state.db,
                vec![Notification::new(
                    user_id,
                    "Help Request Response".to_string(),
                    format!(
                        "You have received a response to your help request: {}",
                        updated.subject
                    ),
                    NotificationKind::System,
                    Some(serde_json::json!({"help_request_id": updated.id})),
                )],
            )
            .await?;
        }
    }

    Ok(Json(HelpResponseBody {
        message: "help request updated successfully".to_string(),
        help_request: updated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user_id: &str, role: Role) -> Identity {
        Identity {
            user_id: user_id.into(),
            email: "u@x.com".into(),
            role,
            token_version: 0,
        }
    }

    fn request(from: &str, to: Option<&str>) -> HelpRequest {
        let now = now_rfc3339();
        HelpRequest {
            id: new_id(),
            from_user_id: from.into(),
            to_user_id: to.map(String::from),
            kind: HelpKind::ConsumerToProvider,
            subject: "s".into(),
            message: "m".into(),
            status: HelpStatus::Open,
            priority: HelpPriority::Medium,
            category: HelpCategory::General,
            responses: Vec::new(),
            resolved_at: None,
            resolved_by: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[test]
    fn participants_and_admins_can_access() {
        let r = request("sender", Some("recipient"));
        assert!(can_access(&identity("sender", Role::Consumer), &r));
        assert!(can_access(&identity("recipient", Role::Provider), &r));
        assert!(can_access(&identity("anyone", Role::Admin), &r));
        assert!(!can_access(&identity("stranger", Role::Consumer), &r));
    }

    #[test]
    fn list_query_maps_type_to_kind() {
        let q: HelpListQuery =
            serde_json::from_str(r#"{"type": "admin_support", "priority": "urgent"}"#).unwrap();
        assert_eq!(q.kind, Some(HelpKind::AdminSupport));
        assert_eq!(q.priority, Some(HelpPriority::Urgent));
    }

    #[test]
    fn create_body_maps_type_to_kind() {
        let req: CreateHelpRequest = serde_json::from_str(
            r#"{"type": "admin_support", "subject": "s", "message": "m"}"#,
        )
        .unwrap();
        assert_eq!(req.kind, HelpKind::AdminSupport);
        assert!(req.priority.is_none());
    }
}
