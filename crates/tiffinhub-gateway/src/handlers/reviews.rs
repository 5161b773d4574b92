// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Review handlers. Creation triggers the provider rating recompute.

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use tiffinhub_core::types::{new_id, now_rfc3339, page_window};
use tiffinhub_core::{HubError, Identity, Review, Role};
use tiffinhub_storage::models::ReviewWithParties;
use tiffinhub_storage::queries::reviews::{self, ReviewFilter};
use tiffinhub_storage::queries::orders;

use crate::error::ApiResult;
use crate::handlers::PageInfo;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub consumer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewWithParties>,
    pub pagination: PageInfo,
}

/// GET /api/reviews
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> ApiResult<Json<ReviewListResponse>> {
    let (page, limit, offset) = page_window(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let result = reviews::list_reviews(
        &state.db,
        ReviewFilter {
            provider_id: query.provider_id,
            consumer_id: query.consumer_id,
            rating: None,
        },
        page,
        limit,
        offset,
    )
    .await?;
    Ok(Json(ReviewListResponse {
        pagination: PageInfo::of(&result),
        reviews: result.items,
    }))
}

/// Request body for POST /api/reviews.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub provider_id: String,
    pub order_id: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub message: String,
    pub review: Review,
    /// The provider's freshly derived rating.
    pub provider_rating: f64,
}

/// POST /api/reviews (consumer only)
///
/// One review per order per consumer. The review must reference the
/// caller's own order with the matching provider.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<ReviewResponse>)> {
    if identity.role != Role::Consumer {
        return Err(HubError::Forbidden("only consumers can leave reviews".to_string()).into());
    }
    if !(1..=5).contains(&body.rating) {
        return Err(HubError::Validation("rating must be between 1 and 5".to_string()).into());
    }

    let order = orders::get_order(&state.db, &body.order_id)
        .await?
        .ok_or_else(|| HubError::NotFound("order not found".to_string()))?;
    if order.consumer_id != identity.user_id {
        return Err(HubError::Forbidden("order belongs to another consumer".to_string()).into());
    }
    if order.provider_id != body.provider_id {
        return Err(
            HubError::Validation("order was not placed with this provider".to_string()).into(),
        );
    }

    let now = now_rfc3339();
    let review = Review {
        id: new_id(),
        consumer_id: identity.user_id.clone(),
        provider_id: body.provider_id.clone(),
        order_id: body.order_id,
        rating: body.rating,
        comment: body.comment,
        // From a real order of this consumer, so it counts as verified.
        is_verified: true,
        created_at: now.clone(),
        updated_at: now,
    };
    reviews::create_review(&state.db, &review).await?;
    let provider_rating = reviews::recompute_provider_rating(&state.db, &body.provider_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            message: "review added successfully".to_string(),
            review,
            provider_rating,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_rating() {
        let result: Result<CreateReviewRequest, _> =
            serde_json::from_str(r#"{"provider_id": "p", "order_id": "o"}"#);
        assert!(result.is_err());

        let req: CreateReviewRequest = serde_json::from_str(
            r#"{"provider_id": "p", "order_id": "o", "rating": 4}"#,
        )
        .unwrap();
        assert_eq!(req.rating, 4);
        assert!(req.comment.is_none());
    }
}
