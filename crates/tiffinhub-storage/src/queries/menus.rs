// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu CRUD operations. Items are embedded JSON sub-documents mutated
//! individually through a read-modify-write on the owning row.

use rusqlite::{Row, params, params_from_iter, types::Value};

use tiffinhub_core::{HubError, Menu, MenuItem};

use crate::database::Database;
use crate::queries::{col_json, to_json};

const MENU_COLUMNS: &str =
    "id, provider_id, name, description, items, valid_from, valid_to, is_active, \
     created_at, updated_at";

fn map_menu(row: &Row<'_>) -> Result<Menu, rusqlite::Error> {
    Ok(Menu {
        id: row.get(0)?,
        provider_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        items: col_json(4, row.get::<_, String>(4)?)?,
        valid_from: row.get(5)?,
        valid_to: row.get(6)?,
        is_active: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Insert a new menu.
pub async fn create_menu(db: &Database, menu: &Menu) -> Result<(), HubError> {
    let menu = menu.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO menus (id, provider_id, name, description, items, valid_from, \
                 valid_to, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    menu.id,
                    menu.provider_id,
                    menu.name,
                    menu.description,
                    to_json(&menu.items),
                    menu.valid_from,
                    menu.valid_to,
                    menu.is_active,
                    menu.created_at,
                    menu.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a menu by id.
pub async fn get_menu(db: &Database, id: &str) -> Result<Option<Menu>, HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {MENU_COLUMNS} FROM menus WHERE id = ?1"))?;
            match stmt.query_row(params![id], map_menu) {
                Ok(menu) => Ok(Some(menu)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List menus, newest first. `active_only` drops deactivated menus
/// (the public browse path); `provider_id` scopes to one provider.
pub async fn list_menus(
    db: &Database,
    provider_id: Option<String>,
    active_only: bool,
) -> Result<Vec<Menu>, HubError> {
    db.connection()
        .call(move |conn| {
            let mut filter = String::from(" WHERE 1=1");
            let mut filter_params: Vec<Value> = Vec::new();
            if active_only {
                filter.push_str(" AND is_active = 1");
            }
            if let Some(provider_id) = provider_id {
                filter.push_str(" AND provider_id = ?");
                filter_params.push(provider_id.into());
            }
            let mut stmt = conn.prepare(&format!(
                "SELECT {MENU_COLUMNS} FROM menus{filter} ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params_from_iter(filter_params.iter()), map_menu)?;
            let mut menus = Vec::new();
            for row in rows {
                menus.push(row?);
            }
            Ok(menus)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Allow-listed menu fields for partial update. `items` replaces the whole
/// embedded list; single-item edits go through [`update_menu_item`].
#[derive(Debug, Clone, Default)]
pub struct UpdateMenu {
    pub name: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<MenuItem>>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub is_active: Option<bool>,
}

/// Apply a partial menu update. Absent fields are left untouched.
pub async fn update_menu(db: &Database, id: &str, update: UpdateMenu) -> Result<(), HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut sets = Vec::new();
            let mut values: Vec<Value> = Vec::new();
            if let Some(name) = update.name {
                sets.push("name = ?");
                values.push(name.into());
            }
            if let Some(description) = update.description {
                sets.push("description = ?");
                values.push(description.into());
            }
            if let Some(items) = update.items {
                sets.push("items = ?");
                values.push(to_json(&items).into());
            }
            if let Some(valid_from) = update.valid_from {
                sets.push("valid_from = ?");
                values.push(valid_from.into());
            }
            if let Some(valid_to) = update.valid_to {
                sets.push("valid_to = ?");
                values.push(valid_to.into());
            }
            if let Some(active) = update.is_active {
                sets.push("is_active = ?");
                values.push(i64::from(active).into());
            }
            if sets.is_empty() {
                return Ok(());
            }
            values.push(id.into());
            conn.execute(
                &format!(
                    "UPDATE menus SET {}, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
                     WHERE id = ?",
                    sets.join(", ")
                ),
                params_from_iter(values.iter()),
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a menu.
pub async fn delete_menu(db: &Database, id: &str) -> Result<(), HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM menus WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Allow-listed per-item fields for partial update.
#[derive(Debug, Clone, Default)]
pub struct UpdateMenuItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<tiffinhub_core::MenuCategory>,
    pub is_vegetarian: Option<bool>,
    pub is_available: Option<bool>,
    pub image_url: Option<String>,
}

/// Update one embedded item in place. Returns the updated item, or `None`
/// if the menu or item does not exist.
pub async fn update_menu_item(
    db: &Database,
    menu_id: &str,
    item_id: &str,
    update: UpdateMenuItem,
) -> Result<Option<MenuItem>, HubError> {
    let menu_id = menu_id.to_string();
    let item_id = item_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let raw: Option<String> = match tx.query_row(
                "SELECT items FROM menus WHERE id = ?1",
                params![menu_id],
                |row| row.get(0),
            ) {
                Ok(items) => Some(items),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };
            let Some(raw) = raw else {
                tx.commit()?;
                return Ok(None);
            };

            let mut items: Vec<MenuItem> = col_json(0, raw)?;
            let Some(item) = items.iter_mut().find(|i| i.item_id == item_id) else {
                tx.commit()?;
                return Ok(None);
            };

            if let Some(name) = update.name {
                item.name = name;
            }
            if let Some(description) = update.description {
                item.description = Some(description);
            }
            if let Some(price) = update.price {
                item.price = price;
            }
            if let Some(category) = update.category {
                item.category = category;
            }
            if let Some(veg) = update.is_vegetarian {
                item.is_vegetarian = veg;
            }
            if let Some(available) = update.is_available {
                item.is_available = available;
            }
            if let Some(url) = update.image_url {
                item.image_url = Some(url);
            }
            let updated = item.clone();

            tx.execute(
                "UPDATE menus SET items = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?2",
                params![to_json(&items), menu_id],
            )?;
            tx.commit()?;
            Ok(Some(updated))
        })
        .await
        .map_err(crate::database::map_tr_err)
}
