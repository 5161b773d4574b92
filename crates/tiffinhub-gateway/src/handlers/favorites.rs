// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consumer favorites handlers.

use axum::Json;
use axum::extract::{Extension, Query, State};
use serde::{Deserialize, Serialize};

use tiffinhub_core::{HubError, Identity, Role};
use tiffinhub_storage::models::ProviderWithOwner;
use tiffinhub_storage::queries::{providers, users};

use crate::error::ApiResult;
use crate::state::AppState;

fn require_consumer(identity: &Identity) -> Result<(), HubError> {
    if identity.role != Role::Consumer {
        return Err(HubError::Forbidden(
            "favorites are available to consumers only".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<ProviderWithOwner>,
}

/// GET /api/favorites
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<FavoritesResponse>> {
    require_consumer(&identity)?;
    let user = users::get_user(&state.db, &identity.user_id)
        .await?
        .ok_or_else(|| HubError::NotFound("user not found".to_string()))?;
    let favorites = providers::by_ids(&state.db, user.favorites).await?;
    Ok(Json(FavoritesResponse { favorites }))
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub provider_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/favorites
pub async fn add(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<AddFavoriteRequest>,
) -> ApiResult<Json<MessageResponse>> {
    require_consumer(&identity)?;
    if providers::get_provider(&state.db, &body.provider_id).await?.is_none() {
        return Err(HubError::NotFound("provider not found".to_string()).into());
    }
    users::add_favorite(&state.db, &identity.user_id, &body.provider_id).await?;
    Ok(Json(MessageResponse {
        message: "added to favorites".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RemoveFavoriteQuery {
    pub provider_id: String,
}

/// DELETE /api/favorites?provider_id=...
pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<RemoveFavoriteQuery>,
) -> ApiResult<Json<MessageResponse>> {
    require_consumer(&identity)?;
    users::remove_favorite(&state.db, &identity.user_id, &query.provider_id).await?;
    Ok(Json(MessageResponse {
        message: "removed from favorites".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: "u1".into(),
            email: "u@x.com".into(),
            role,
            token_version: 0,
        }
    }

    #[test]
    fn only_consumers_pass_the_role_gate() {
        assert!(require_consumer(&identity(Role::Consumer)).is_ok());
        assert!(matches!(
            require_consumer(&identity(Role::Provider)),
            Err(HubError::Forbidden(_))
        ));
        assert!(matches!(
            require_consumer(&identity(Role::Admin)),
            Err(HubError::Forbidden(_))
        ));
    }
}
