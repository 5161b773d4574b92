// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user settings blob handlers.

use axum::Json;
use axum::extract::{Extension, State};
use serde::Serialize;
use serde_json::{Value, json};

use tiffinhub_core::{HubError, Identity, Role};
use tiffinhub_storage::queries::users;

use crate::error::ApiResult;
use crate::state::AppState;

/// Defaults served to accounts that never saved settings.
fn default_settings() -> Value {
    json!({
        "notifications": {
            "email": true,
            "sms": false,
            "push": true,
            "order_updates": true,
            "promotions": false,
            "weekly_digest": true,
        },
        "privacy": {
            "profile_visibility": "public",
            "show_order_history": false,
            "data_collection": true,
            "marketing": false,
        },
        "preferences": {
            "language": "en",
            "timezone": "Asia/Kolkata",
            "currency": "INR",
        },
        "provider": {
            "auto_accept_orders": false,
            "max_orders_per_day": 0,
            "preparation_time": 0,
            "delivery_radius": 0,
        },
    })
}

/// Keep only the recognized top-level sections; the provider section is
/// persisted for provider accounts only.
fn sanitize_settings(settings: &Value, role: Role) -> Value {
    let mut kept = serde_json::Map::new();
    for key in ["notifications", "privacy", "preferences"] {
        if let Some(section) = settings.get(key) {
            kept.insert(key.to_string(), section.clone());
        }
    }
    if role == Role::Provider {
        if let Some(section) = settings.get("provider") {
            kept.insert("provider".to_string(), section.clone());
        }
    }
    Value::Object(kept)
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub data: Value,
    pub message: String,
}

/// GET /api/settings
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<SettingsResponse>> {
    let user = users::get_user(&state.db, &identity.user_id)
        .await?
        .ok_or_else(|| HubError::NotFound("user not found".to_string()))?;
    Ok(Json(SettingsResponse {
        data: user.settings.unwrap_or_else(default_settings),
        message: "settings fetched successfully".to_string(),
    }))
}

/// PUT /api/settings
pub async fn put(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<Value>,
) -> ApiResult<Json<SettingsResponse>> {
    if !body.is_object() {
        return Err(HubError::Validation("settings must be an object".to_string()).into());
    }
    let sanitized = sanitize_settings(&body, identity.role);
    users::set_settings(&state.db, &identity.user_id, sanitized.clone()).await?;
    Ok(Json(SettingsResponse {
        data: sanitized,
        message: "settings updated successfully".to_string(),
    }))
}
