// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Back-office handlers. The `/api/admin` prefix is role-gated by the
//! identity middleware; handlers here assume an admin caller.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use tiffinhub_core::types::{OperatingHours, page_window};
use tiffinhub_core::{
    HubError, Notification, NotificationKind, OrderStatus, PaymentStatus, Role, User,
};
use tiffinhub_storage::models::{
    AdminReports, OrderWithParties, ProviderWithOwner, ReviewStats, ReviewWithParties,
};
use tiffinhub_storage::queries::orders::OrderFilter;
use tiffinhub_storage::queries::providers::UpdateProvider;
use tiffinhub_storage::queries::reviews::ReviewFilter;
use tiffinhub_storage::queries::{notifications, orders, providers, reports, reviews, users};

use crate::error::ApiResult;
use crate::handlers::PageInfo;
use crate::handlers::analytics::admin_report_since;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct AdminUserQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub role: Option<Role>,
    /// "active" or "inactive".
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminUserListResponse {
    pub users: Vec<User>,
    pub pagination: PageInfo,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<AdminUserQuery>,
) -> ApiResult<Json<AdminUserListResponse>> {
    let (page, limit, offset) = page_window(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let is_active = query.status.as_deref().map(|s| s == "active");
    let result = users::list_users(&state.db, query.role, is_active, page, limit, offset).await?;
    Ok(Json(AdminUserListResponse {
        pagination: PageInfo::of(&result),
        users: result.items,
    }))
}

/// Request body for PATCH /api/admin/users/{id}.
#[derive(Debug, Deserialize)]
pub struct AdminUserUpdate {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub message: String,
    pub user: User,
}

/// PATCH /api/admin/users/{id}
///
/// Soft-disable or re-enable an account. Disabled accounts cannot log in.
pub async fn set_user_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AdminUserUpdate>,
) -> ApiResult<Json<AdminUserResponse>> {
    if users::get_user(&state.db, &id).await?.is_none() {
        return Err(HubError::NotFound("user not found".to_string()).into());
    }
    users::set_active(&state.db, &id, body.is_active).await?;
    let user = users::get_user(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("user not found".to_string()))?;
    Ok(Json(AdminUserResponse {
        message: if body.is_active {
            "user activated".to_string()
        } else {
            "user deactivated".to_string()
        },
        user,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AdminOrderQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize)]
pub struct AdminOrderListResponse {
    pub orders: Vec<OrderWithParties>,
    pub pagination: PageInfo,
}

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<AdminOrderQuery>,
) -> ApiResult<Json<AdminOrderListResponse>> {
    let (page, limit, offset) = page_window(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let result = orders::list_orders(
        &state.db,
        OrderFilter {
            status: query.status,
            payment_status: query.payment_status,
            ..Default::default()
        },
        page,
        limit,
        offset,
    )
    .await?;
    Ok(Json(AdminOrderListResponse {
        pagination: PageInfo::of(&result),
        orders: result.items,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AdminProviderQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub verified: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AdminProviderListResponse {
    pub providers: Vec<ProviderWithOwner>,
    pub pagination: PageInfo,
}

/// GET /api/admin/providers
pub async fn list_providers(
    State(state): State<AppState>,
    Query(query): Query<AdminProviderQuery>,
) -> ApiResult<Json<AdminProviderListResponse>> {
    let (page, limit, offset) = page_window(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let result = providers::list_all(&state.db, query.verified, page, limit, offset).await?;
    Ok(Json(AdminProviderListResponse {
        pagination: PageInfo::of(&result),
        providers: result.items,
    }))
}

/// Request body for PATCH /api/admin/providers/{id}.
#[derive(Debug, Deserialize)]
pub struct AdminProviderUpdate {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cuisine: Option<Vec<String>>,
    #[serde(default)]
    pub delivery_areas: Option<Vec<String>>,
    #[serde(default)]
    pub operating_hours: Option<OperatingHours>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AdminProviderResponse {
    pub message: String,
    pub provider: ProviderWithOwner,
}

/// PATCH /api/admin/providers/{id}
pub async fn update_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AdminProviderUpdate>,
) -> ApiResult<Json<AdminProviderResponse>> {
    if providers::get_provider(&state.db, &id).await?.is_none() {
        return Err(HubError::NotFound("provider not found".to_string()).into());
    }
    providers::update_provider(
        &state.db,
        &id,
        UpdateProvider {
            business_name: body.business_name,
            description: body.description,
            cuisine: body.cuisine,
            delivery_areas: body.delivery_areas,
            operating_hours: body.operating_hours,
            is_active: body.is_active,
        },
    )
    .await?;
    let provider = providers::get_provider_with_owner(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("provider not found".to_string()))?;
    Ok(Json(AdminProviderResponse {
        message: "provider updated".to_string(),
        provider,
    }))
}

/// Request body for PATCH /api/admin/providers/{id}/verify.
#[derive(Debug, Deserialize)]
pub struct VerifyProviderRequest {
    pub is_verified: bool,
}

/// PATCH /api/admin/providers/{id}/verify
///
/// Flips the verification flag and notifies the owning user.
pub async fn verify_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<VerifyProviderRequest>,
) -> ApiResult<Json<AdminProviderResponse>> {
    let provider = providers::set_verified(&state.db, &id, body.is_verified)
        .await?
        .ok_or_else(|| HubError::NotFound("provider not found".to_string()))?;

    let (title, message) = if body.is_verified {
        (
            "Account Verified!",
            "Congratulations! Your provider account has been verified by our admin team."
                .to_string(),
        )
    } else {
        (
            "Verification Removed",
            "Your provider verification has been removed. Please contact support for more \
             information."
                .to_string(),
        )
    };
    notifications::create_notifications(
        &state.db,
        vec![Notification::new(
            provider.provider.user_id.clone(),
            title.to_string(),
            message,
            NotificationKind::System,
            None,
        )],
    )
    .await?;

    Ok(Json(AdminProviderResponse {
        message: if body.is_verified {
            "provider verified successfully".to_string()
        } else {
            "provider unverified successfully".to_string()
        },
        provider,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AdminReviewQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub consumer_id: Option<String>,
    #[serde(default)]
    pub rating: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AdminReviewListResponse {
    pub reviews: Vec<ReviewWithParties>,
    pub pagination: PageInfo,
    pub stats: ReviewStats,
}

/// GET /api/admin/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<AdminReviewQuery>,
) -> ApiResult<Json<AdminReviewListResponse>> {
    let (page, limit, offset) = page_window(query.page, query.limit, 20);
    let result = reviews::list_reviews(
        &state.db,
        ReviewFilter {
            provider_id: query.provider_id,
            consumer_id: query.consumer_id,
            rating: query.rating,
        },
        page,
        limit,
        offset,
    )
    .await?;
    let stats = reviews::stats(&state.db).await?;
    Ok(Json(AdminReviewListResponse {
        pagination: PageInfo::of(&result),
        reviews: result.items,
        stats,
    }))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// DELETE /api/admin/reviews/{id}
///
/// The only deletion path for reviews; recomputes the provider rating.
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let provider_id = reviews::delete_review(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("review not found".to_string()))?;
    reviews::recompute_provider_rating(&state.db, &provider_id).await?;
    Ok(Json(MessageResponse {
        message: "review deleted".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    pub reports: AdminReports,
}

/// GET /api/admin/reports
pub async fn get_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<ReportsResponse>> {
    let since = admin_report_since(query.range.as_deref().unwrap_or("6months"));
    let reports = reports::admin_reports(&state.db, &since).await?;
    Ok(Json(ReportsResponse { reports }))
}
