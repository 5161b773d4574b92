// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service provider CRUD operations.
//!
//! Listing projections join the owning user's display fields. The derived
//! `rating` and `total_orders` columns are written only by
//! [`crate::queries::reviews::recompute_provider_rating`] and the order
//! creation path.

use rusqlite::{Row, params, params_from_iter, types::Value};

use tiffinhub_core::types::{OperatingHours, Page};
use tiffinhub_core::{HubError, ServiceProvider};

use crate::database::Database;
use crate::models::ProviderWithOwner;
use crate::queries::{col_json, to_json};

const PROVIDER_COLUMNS: &str = "p.id, p.user_id, p.business_name, p.description, p.cuisine, \
                                p.delivery_areas, p.rating, p.total_orders, p.is_verified, \
                                p.is_active, p.operating_hours, p.created_at, p.updated_at";

fn map_provider(row: &Row<'_>) -> Result<ServiceProvider, rusqlite::Error> {
    Ok(ServiceProvider {
        id: row.get(0)?,
        user_id: row.get(1)?,
        business_name: row.get(2)?,
        description: row.get(3)?,
        cuisine: col_json(4, row.get::<_, String>(4)?)?,
        delivery_areas: col_json(5, row.get::<_, String>(5)?)?,
        rating: row.get(6)?,
        total_orders: row.get(7)?,
        is_verified: row.get(8)?,
        is_active: row.get(9)?,
        operating_hours: col_json::<OperatingHours>(10, row.get::<_, String>(10)?)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

fn map_provider_with_owner(row: &Row<'_>) -> Result<ProviderWithOwner, rusqlite::Error> {
    Ok(ProviderWithOwner {
        provider: map_provider(row)?,
        owner_name: row.get(13)?,
        owner_email: row.get(14)?,
        owner_phone: row.get(15)?,
    })
}

/// Insert a new provider profile. Fails if the user already owns one.
pub async fn create_provider(db: &Database, provider: &ServiceProvider) -> Result<(), HubError> {
    let provider = provider.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO service_providers (id, user_id, business_name, description, \
                 cuisine, delivery_areas, rating, total_orders, is_verified, is_active, \
                 operating_hours, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    provider.id,
                    provider.user_id,
                    provider.business_name,
                    provider.description,
                    to_json(&provider.cuisine),
                    to_json(&provider.delivery_areas),
                    provider.rating,
                    provider.total_orders,
                    provider.is_verified,
                    provider.is_active,
                    to_json(&provider.operating_hours),
                    provider.created_at,
                    provider.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a provider by id.
pub async fn get_provider(db: &Database, id: &str) -> Result<Option<ServiceProvider>, HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROVIDER_COLUMNS} FROM service_providers p WHERE p.id = ?1"
            ))?;
            match stmt.query_row(params![id], map_provider) {
                Ok(provider) => Ok(Some(provider)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the provider profile owned by a user.
pub async fn get_provider_by_user(
    db: &Database,
    user_id: &str,
) -> Result<Option<ServiceProvider>, HubError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROVIDER_COLUMNS} FROM service_providers p WHERE p.user_id = ?1"
            ))?;
            match stmt.query_row(params![user_id], map_provider) {
                Ok(provider) => Ok(Some(provider)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a provider joined with its owner's display fields.
pub async fn get_provider_with_owner(
    db: &Database,
    id: &str,
) -> Result<Option<ProviderWithOwner>, HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROVIDER_COLUMNS}, u.name, u.email, u.phone \
                 FROM service_providers p JOIN users u ON u.id = p.user_id \
                 WHERE p.id = ?1"
            ))?;
            match stmt.query_row(params![id], map_provider_with_owner) {
                Ok(provider) => Ok(Some(provider)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Browse listing: active providers filtered by cuisine tag and delivery
/// area, best-rated first.
pub async fn list_active(
    db: &Database,
    cuisine: Option<String>,
    area: Option<String>,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<Page<ProviderWithOwner>, HubError> {
    db.connection()
        .call(move |conn| {
            let mut filter = String::from(" WHERE p.is_active = 1");
            let mut filter_params: Vec<Value> = Vec::new();
            if let Some(cuisine) = cuisine {
                filter.push_str(
                    " AND EXISTS (SELECT 1 FROM json_each(p.cuisine) WHERE value = ?)",
                );
                filter_params.push(cuisine.into());
            }
            if let Some(area) = area {
                filter.push_str(
                    " AND EXISTS (SELECT 1 FROM json_each(p.delivery_areas) WHERE value = ?)",
                );
                filter_params.push(area.into());
            }

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM service_providers p{filter}"),
                params_from_iter(filter_params.iter()),
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {PROVIDER_COLUMNS}, u.name, u.email, u.phone \
                 FROM service_providers p JOIN users u ON u.id = p.user_id{filter} \
                 ORDER BY p.rating DESC, p.total_orders DESC LIMIT ? OFFSET ?"
            ))?;
            let mut all_params = filter_params;
            all_params.push(i64::from(limit).into());
            all_params.push((offset as i64).into());
            let rows =
                stmt.query_map(params_from_iter(all_params.iter()), map_provider_with_owner)?;
            let mut providers = Vec::new();
            for row in rows {
                providers.push(row?);
            }
            Ok(Page::new(providers, page, limit, total as u64))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Back-office listing: all providers, newest first, optional verified filter.
pub async fn list_all(
    db: &Database,
    is_verified: Option<bool>,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<Page<ProviderWithOwner>, HubError> {
    db.connection()
        .call(move |conn| {
            let mut filter = String::from(" WHERE 1=1");
            let mut filter_params: Vec<Value> = Vec::new();
            if let Some(verified) = is_verified {
                filter.push_str(" AND p.is_verified = ?");
                filter_params.push(i64::from(verified).into());
            }

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM service_providers p{filter}"),
                params_from_iter(filter_params.iter()),
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {PROVIDER_COLUMNS}, u.name, u.email, u.phone \
                 FROM service_providers p JOIN users u ON u.id = p.user_id{filter} \
                 ORDER BY p.created_at DESC LIMIT ? OFFSET ?"
            ))?;
            let mut all_params = filter_params;
            all_params.push(i64::from(limit).into());
            all_params.push((offset as i64).into());
            let rows =
                stmt.query_map(params_from_iter(all_params.iter()), map_provider_with_owner)?;
            let mut providers = Vec::new();
            for row in rows {
                providers.push(row?);
            }
            Ok(Page::new(providers, page, limit, total as u64))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch providers by id set (favorites listing), joined with owners.
pub async fn by_ids(db: &Database, ids: Vec<String>) -> Result<Vec<ProviderWithOwner>, HubError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    db.connection()
        .call(move |conn| {
            let placeholders = vec!["?"; ids.len()].join(", ");
            let mut stmt = conn.prepare(&format!(
                "SELECT {PROVIDER_COLUMNS}, u.name, u.email, u.phone \
                 FROM service_providers p JOIN users u ON u.id = p.user_id \
                 WHERE p.id IN ({placeholders})"
            ))?;
            let rows = stmt.query_map(params_from_iter(ids.iter()), map_provider_with_owner)?;
            let mut providers = Vec::new();
            for row in rows {
                providers.push(row?);
            }
            Ok(providers)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Allow-listed provider fields for partial update.
#[derive(Debug, Clone, Default)]
pub struct UpdateProvider {
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<Vec<String>>,
    pub delivery_areas: Option<Vec<String>>,
    pub operating_hours: Option<OperatingHours>,
    pub is_active: Option<bool>,
}

/// Apply a partial profile update. Absent fields are left untouched.
pub async fn update_provider(
    db: &Database,
    id: &str,
    update: UpdateProvider,
) -> Result<(), HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut sets = Vec::new();
            let mut values: Vec<Value> = Vec::new();
            if let Some(name) = update.business_name {
                sets.push("business_name = ?");
                values.push(name.into());
            }
            if let Some(description) = update.description {
                sets.push("description = ?");
                values.push(description.into());
            }
            if let Some(cuisine) = update.cuisine {
                sets.push("cuisine = ?");
                values.push(to_json(&cuisine).into());
            }
            if let Some(areas) = update.delivery_areas {
                sets.push("delivery_areas = ?");
                values.push(to_json(&areas).into());
            }
            if let Some(hours) = update.operating_hours {
                sets.push("operating_hours = ?");
                values.push(to_json(&hours).into());
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
                    "UPDATE service_providers SET {}, \
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
                    sets.join(", ")
                ),
                params_from_iter(values.iter()),
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip the admin verification flag. Returns the updated provider with its
/// owner for the verification notification.
pub async fn set_verified(
    db: &Database,
    id: &str,
    verified: bool,
) -> Result<Option<ProviderWithOwner>, HubError> {
    let changed = {
        let id = id.to_string();
        db.connection()
            .call(move |conn| {
                let n = conn.execute(
                    "UPDATE service_providers SET is_verified = ?1, \
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?2",
                    params![verified, id],
                )?;
                Ok(n)
            })
            .await
            .map_err(crate::database::map_tr_err)?
    };
    if changed == 0 {
        return Ok(None);
    }
    get_provider_with_owner(db, id).await
}
