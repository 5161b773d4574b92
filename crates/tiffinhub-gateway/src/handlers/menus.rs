// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu handlers: public browse plus provider-owned CRUD and single-item
//! edits.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use tiffinhub_core::types::{new_id, now_rfc3339};
use tiffinhub_core::{HubError, Identity, Menu, MenuCategory, MenuItem};
use tiffinhub_storage::queries::menus::{self, UpdateMenu, UpdateMenuItem};

use crate::error::ApiResult;
use crate::handlers::require_own_provider;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MenuListQuery {
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub category: Option<MenuCategory>,
}

#[derive(Debug, Serialize)]
pub struct MenuListResponse {
    pub menus: Vec<Menu>,
}

/// GET /api/menus
///
/// Active menus, optionally scoped to a provider. A category filter keeps
/// only matching items and drops menus left empty by it.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MenuListQuery>,
) -> ApiResult<Json<MenuListResponse>> {
    let mut listed = menus::list_menus(&state.db, query.provider_id, true).await?;
    if let Some(category) = query.category {
        listed = listed
            .into_iter()
            .map(|mut menu| {
                menu.items.retain(|item| item.category == category);
                menu
            })
            .filter(|menu| !menu.items.is_empty())
            .collect();
    }
    Ok(Json(MenuListResponse { menus: listed }))
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub menu: Menu,
}

/// GET /api/menus/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MenuResponse>> {
    let menu = menus::get_menu(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("menu not found".to_string()))?;
    Ok(Json(MenuResponse { menu }))
}

/// Item fields supplied by the provider; ids are generated server-side.
#[derive(Debug, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub category: MenuCategory,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl NewMenuItem {
    fn into_item(self) -> Result<MenuItem, HubError> {
        if self.price < 0.0 {
            return Err(HubError::Validation("item price must not be negative".to_string()));
        }
        Ok(MenuItem {
            item_id: new_id(),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            is_vegetarian: self.is_vegetarian,
            is_available: self.is_available,
            image_url: self.image_url,
        })
    }
}

fn build_items(raw: Vec<NewMenuItem>) -> Result<Vec<MenuItem>, HubError> {
    raw.into_iter().map(NewMenuItem::into_item).collect()
}

/// Request body for POST /api/menus.
#[derive(Debug, Deserialize)]
pub struct CreateMenuRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<NewMenuItem>,
    pub valid_from: String,
    pub valid_to: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// POST /api/menus (provider only)
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateMenuRequest>,
) -> ApiResult<(StatusCode, Json<MenuResponse>)> {
    let provider = require_own_provider(&state, &identity).await?;
    if body.name.trim().is_empty() {
        return Err(HubError::Validation("menu name is required".to_string()).into());
    }

    let now = now_rfc3339();
    let menu = Menu {
        id: new_id(),
        provider_id: provider.id,
        name: body.name,
        description: body.description,
        items: build_items(body.items)?,
        valid_from: body.valid_from,
        valid_to: body.valid_to,
        is_active: body.is_active,
        created_at: now.clone(),
        updated_at: now,
    };
    menus::create_menu(&state.db, &menu).await?;
    Ok((StatusCode::CREATED, Json(MenuResponse { menu })))
}

/// Request body for PATCH /api/menus/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateMenuRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<NewMenuItem>>,
    #[serde(default)]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub valid_to: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Load a menu and confirm the acting provider owns it.
async fn owned_menu(state: &AppState, identity: &Identity, id: &str) -> Result<Menu, HubError> {
    let provider = require_own_provider(state, identity).await?;
    let menu = menus::get_menu(&state.db, id)
        .await?
        .ok_or_else(|| HubError::NotFound("menu not found".to_string()))?;
    if menu.provider_id != provider.id {
        return Err(HubError::Forbidden("menu belongs to another provider".to_string()));
    }
    Ok(menu)
}

/// PATCH /api/menus/{id} (owning provider only)
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<UpdateMenuRequest>,
) -> ApiResult<Json<MenuResponse>> {
    owned_menu(&state, &identity, &id).await?;

    let items = body.items.map(build_items).transpose()?;
    menus::update_menu(
        &state.db,
        &id,
        UpdateMenu {
            name: body.name,
            description: body.description,
            items,
            valid_from: body.valid_from,
            valid_to: body.valid_to,
            is_active: body.is_active,
        },
    )
    .await?;

    let menu = menus::get_menu(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("menu not found".to_string()))?;
    Ok(Json(MenuResponse { menu }))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// DELETE /api/menus/{id} (owning provider only)
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    owned_menu(&state, &identity, &id).await?;
    menus::delete_menu(&state.db, &id).await?;
    Ok(Json(MessageResponse {
        message: "menu deleted".to_string(),
    }))
}

/// Request body for PATCH /api/menus/{id}/items/{item_id}.
#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<MenuCategory>,
    #[serde(default)]
    pub is_vegetarian: Option<bool>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    pub item: MenuItem,
}

/// PATCH /api/menus/{id}/items/{item_id} (owning provider only)
pub async fn update_item(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((id, item_id)): Path<(String, String)>,
    Json(body): Json<UpdateMenuItemRequest>,
) -> ApiResult<Json<MenuItemResponse>> {
    owned_menu(&state, &identity, &id).await?;
    if let Some(price) = body.price {
        if price < 0.0 {
            return Err(HubError::Validation("item price must not be negative".to_string()).into());
        }
    }

    let item = menus::update_menu_item(
        &state.db,
        &id,
        &item_id,
        UpdateMenuItem {
            name: body.name,
            description: body.description,
            price: body.price,
            category: body.category,
            is_vegetarian: body.is_vegetarian,
            is_available: body.is_available,
            image_url: body.image_url,
        },
    )
    .await?
    .ok_or_else(|| HubError::NotFound("menu item not found".to_string()))?;
    Ok(Json(MenuItemResponse { item }))
}
