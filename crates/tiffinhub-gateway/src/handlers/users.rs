// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile handlers: own-account reads and allow-listed updates.

use axum::Json;
use axum::extract::{Extension, State};
use serde::{Deserialize, Serialize};

use tiffinhub_auth::hash_password;
use tiffinhub_core::types::OperatingHours;
use tiffinhub_core::{HubError, Identity, Role, ServiceProvider, User};
use tiffinhub_storage::queries::providers::{self, UpdateProvider};
use tiffinhub_storage::queries::users::{self, UpdateUser};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<ServiceProvider>,
}

/// GET /api/users/profile
///
/// Providers get their business profile joined in.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = users::get_user(&state.db, &identity.user_id)
        .await?
        .ok_or_else(|| HubError::NotFound("user not found".to_string()))?;

    let service_provider = if user.role == Role::Provider {
        providers::get_provider_by_user(&state.db, &user.id).await?
    } else {
        None
    };

    Ok(Json(ProfileResponse {
        user,
        service_provider,
    }))
}

/// Provider business fields accepted on profile update.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderProfileUpdate {
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

/// Request body for PUT /api/users/profile. Only allow-listed fields.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub service_provider: Option<ProviderProfileUpdate>,
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<ProfileUpdateRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    if let Some(password) = &body.password {
        if password.len() < 6 {
            return Err(
                HubError::Validation("password must be at least 6 characters".to_string()).into(),
            );
        }
    }

    let password_hash = match body.password {
        Some(password) => Some(hash_password(&password)?),
        None => None,
    };
    users::update_user(
        &state.db,
        &identity.user_id,
        UpdateUser {
            name: body.name,
            phone: body.phone,
            address: body.address,
            password_hash,
        },
    )
    .await?;

    if identity.role == Role::Provider {
        if let Some(update) = body.service_provider {
            let provider = providers::get_provider_by_user(&state.db, &identity.user_id)
                .await?
                .ok_or_else(|| HubError::NotFound("provider profile not found".to_string()))?;
            providers::update_provider(
                &state.db,
                &provider.id,
                UpdateProvider {
                    business_name: update.business_name,
                    description: update.description,
                    cuisine: update.cuisine,
                    delivery_areas: update.delivery_areas,
                    operating_hours: update.operating_hours,
                    is_active: update.is_active,
                },
            )
            .await?;
        }
    }

    let user = users::get_user(&state.db, &identity.user_id)
        .await?
        .ok_or_else(|| HubError::NotFound("user not found".to_string()))?;
    let service_provider = if user.role == Role::Provider {
        providers::get_provider_by_user(&state.db, &user.id).await?
    } else {
        None
    };
    Ok(Json(ProfileResponse {
        user,
        service_provider,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_accepts_partial_bodies() {
        let req: ProfileUpdateRequest = serde_json::from_str(r#"{"phone": "+91"}"#).unwrap();
        assert_eq!(req.phone.as_deref(), Some("+91"));
        assert!(req.name.is_none());
        assert!(req.service_provider.is_none());
    }

    #[test]
    fn provider_block_deserializes_nested_hours() {
        let req: ProfileUpdateRequest = serde_json::from_str(
            r#"{"service_provider": {"operating_hours": {"start": "08:00", "end": "20:00"}}}"#,
        )
        .unwrap();
        let hours = req.service_provider.unwrap().operating_hours.unwrap();
        assert_eq!(hours.start, "08:00");
        assert_eq!(hours.end, "20:00");
    }

    #[test]
    fn profile_response_omits_absent_provider() {
        let user = User::new("A".into(), "a@x.com".into(), "$h".into(), Role::Consumer);
        let json = serde_json::to_value(&ProfileResponse {
            user,
            service_provider: None,
        })
        .unwrap();
        assert!(json.get("service_provider").is_none());
    }
}
