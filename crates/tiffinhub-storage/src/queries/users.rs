// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User account CRUD operations.

use rusqlite::{Row, params, params_from_iter, types::Value};

use tiffinhub_core::types::Page;
use tiffinhub_core::{HubError, Role, User};

use crate::database::Database;
use crate::queries::{col_enum, col_json, col_json_opt, to_json};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, phone, address, is_active, \
                            favorites, settings, token_version, created_at, updated_at";

fn map_user(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: col_enum(4, row.get::<_, String>(4)?)?,
        phone: row.get(5)?,
        address: row.get(6)?,
        is_active: row.get(7)?,
        favorites: col_json(8, row.get::<_, String>(8)?)?,
        settings: col_json_opt(9, row.get::<_, Option<String>>(9)?)?,
        token_version: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

/// Insert a new user. Fails on duplicate email.
pub async fn create_user(db: &Database, user: &User) -> Result<(), HubError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, password_hash, role, phone, address, \
                 is_active, favorites, settings, token_version, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    user.id,
                    user.name,
                    user.email,
                    user.password_hash,
                    user.role.to_string(),
                    user.phone,
                    user.address,
                    user.is_active,
                    to_json(&user.favorites),
                    user.settings.as_ref().map(to_json),
                    user.token_version,
                    user.created_at,
                    user.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by id.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<User>, HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
            match stmt.query_row(params![id], map_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by email (compared lowercased).
pub async fn get_user_by_email(db: &Database, email: &str) -> Result<Option<User>, HubError> {
    let email = email.to_lowercase();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))?;
            match stmt.query_row(params![email], map_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List users, newest first, optionally filtered by role and active flag.
pub async fn list_users(
    db: &Database,
    role: Option<Role>,
    is_active: Option<bool>,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<Page<User>, HubError> {
    db.connection()
        .call(move |conn| {
            let mut filter = String::from(" WHERE 1=1");
            let mut filter_params: Vec<Value> = Vec::new();
            if let Some(role) = role {
                filter.push_str(" AND role = ?");
                filter_params.push(role.to_string().into());
            }
            if let Some(active) = is_active {
                filter.push_str(" AND is_active = ?");
                filter_params.push(i64::from(active).into());
            }

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM users{filter}"),
                params_from_iter(filter_params.iter()),
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users{filter} \
                 ORDER BY created_at DESC LIMIT ? OFFSET ?"
            ))?;
            let mut all_params = filter_params;
            all_params.push(i64::from(limit).into());
            all_params.push((offset as i64).into());
            let rows = stmt.query_map(params_from_iter(all_params.iter()), map_user)?;
            let mut users = Vec::new();
            for row in rows {
                users.push(row?);
            }
            Ok(Page::new(users, page, limit, total as u64))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All admin users (help-desk fan-out recipients).
pub async fn list_admins(db: &Database) -> Result<Vec<User>, HubError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE role = 'admin'"))?;
            let rows = stmt.query_map([], map_user)?;
            let mut users = Vec::new();
            for row in rows {
                users.push(row?);
            }
            Ok(users)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Allow-listed profile fields for partial update.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password_hash: Option<String>,
}

/// Apply a partial profile update. Absent fields are left untouched.
pub async fn update_user(db: &Database, id: &str, update: UpdateUser) -> Result<(), HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut sets = Vec::new();
            let mut values: Vec<Value> = Vec::new();
            if let Some(name) = update.name {
                sets.push("name = ?");
                values.push(name.into());
            }
            if let Some(phone) = update.phone {
                sets.push("phone = ?");
                values.push(phone.into());
            }
            if let Some(address) = update.address {
                sets.push("address = ?");
                values.push(address.into());
            }
            if let Some(hash) = update.password_hash {
                sets.push("password_hash = ?");
                values.push(hash.into());
            }
            if sets.is_empty() {
                return Ok(());
            }
            values.push(id.into());
            conn.execute(
                &format!(
                    "UPDATE users SET {}, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
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

/// Flip the active flag (admin soft-disable).
pub async fn set_active(db: &Database, id: &str, active: bool) -> Result<(), HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET is_active = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?2",
                params![active, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the settings blob.
pub async fn set_settings(
    db: &Database,
    id: &str,
    settings: serde_json::Value,
) -> Result<(), HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET settings = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?2",
                params![settings.to_string(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Add a provider to a consumer's favorites (idempotent).
pub async fn add_favorite(db: &Database, id: &str, provider_id: &str) -> Result<(), HubError> {
    let id = id.to_string();
    let provider_id = provider_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let raw: String =
                tx.query_row("SELECT favorites FROM users WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })?;
            let mut favorites: Vec<String> = col_json(0, raw)?;
            if !favorites.contains(&provider_id) {
                favorites.push(provider_id);
                tx.execute(
                    "UPDATE users SET favorites = ?1, \
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?2",
                    params![to_json(&favorites), id],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove a provider from a consumer's favorites.
pub async fn remove_favorite(db: &Database, id: &str, provider_id: &str) -> Result<(), HubError> {
    let id = id.to_string();
    let provider_id = provider_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let raw: String =
                tx.query_row("SELECT favorites FROM users WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })?;
            let mut favorites: Vec<String> = col_json(0, raw)?;
            favorites.retain(|p| p != &provider_id);
            tx.execute(
                "UPDATE users SET favorites = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?2",
                params![to_json(&favorites), id],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Increment the token_version, logically invalidating all issued sessions.
pub async fn bump_token_version(db: &Database, id: &str) -> Result<(), HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET token_version = token_version + 1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Hard-delete an account. Cascades to its provider profile.
pub async fn delete_user(db: &Database, id: &str) -> Result<(), HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tiffinhub_core::types::page_window;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_user(email: &str, role: Role) -> User {
        User::new("Asha".into(), email.into(), "$argon2id$hash".into(), role)
    }

    #[tokio::test]
    async fn create_and_get_round_trips() {
        let (db, _dir) = setup_db().await;
        let mut user = make_user("asha@example.com", Role::Consumer);
        user.favorites = vec!["prov-1".into()];
        user.settings = Some(serde_json::json!({"preferences": {"language": "en"}}));
        create_user(&db, &user).await.unwrap();

        let got = get_user(&db, &user.id).await.unwrap().unwrap();
        assert_eq!(got.email, "asha@example.com");
        assert_eq!(got.role, Role::Consumer);
        assert_eq!(got.favorites, vec!["prov-1".to_string()]);
        assert!(got.settings.is_some());
        assert_eq!(got.token_version, 0);
    }

    #[tokio::test]
    async fn email_lookup_ignores_case_and_duplicates_fail() {
        let (db, _dir) = setup_db().await;
        let user = make_user("asha@example.com", Role::Consumer);
        create_user(&db, &user).await.unwrap();

        let found = get_user_by_email(&db, "ASHA@example.com").await.unwrap();
        assert!(found.is_some());

        let dup = make_user("asha@example.com", Role::Provider);
        assert!(create_user(&db, &dup).await.is_err());
    }

    #[tokio::test]
    async fn list_users_filters_by_role_and_status() {
        let (db, _dir) = setup_db().await;
        create_user(&db, &make_user("a@x.com", Role::Consumer)).await.unwrap();
        create_user(&db, &make_user("b@x.com", Role::Provider)).await.unwrap();
        let mut inactive = make_user("c@x.com", Role::Consumer);
        inactive.is_active = false;
        create_user(&db, &inactive).await.unwrap();

        let (page, limit, offset) = page_window(None, None, 50);
        let all = list_users(&db, None, None, page, limit, offset).await.unwrap();
        assert_eq!(all.total_records, 3);

        let consumers = list_users(&db, Some(Role::Consumer), None, page, limit, offset)
            .await
            .unwrap();
        assert_eq!(consumers.total_records, 2);

        let active_consumers =
            list_users(&db, Some(Role::Consumer), Some(true), page, limit, offset)
                .await
                .unwrap();
        assert_eq!(active_consumers.total_records, 1);
        assert_eq!(active_consumers.items[0].email, "a@x.com");
    }

    #[tokio::test]
    async fn pagination_returns_remainder_then_nothing() {
        let (db, _dir) = setup_db().await;
        for i in 0..7 {
            create_user(&db, &make_user(&format!("u{i}@x.com"), Role::Consumer))
                .await
                .unwrap();
        }
        let last = list_users(&db, None, None, 3, 3, 6).await.unwrap();
        assert_eq!(last.item_count, 1);
        assert_eq!(last.total_pages, 3);

        let beyond = list_users(&db, None, None, 4, 3, 9).await.unwrap();
        assert_eq!(beyond.item_count, 0);
    }

    #[tokio::test]
    async fn update_user_touches_only_present_fields() {
        let (db, _dir) = setup_db().await;
        let user = make_user("asha@example.com", Role::Consumer);
        create_user(&db, &user).await.unwrap();

        update_user(
            &db,
            &user.id,
            UpdateUser {
                phone: Some("+911234567890".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let got = get_user(&db, &user.id).await.unwrap().unwrap();
        assert_eq!(got.phone.as_deref(), Some("+911234567890"));
        assert_eq!(got.name, "Asha");
        assert_eq!(got.password_hash, "$argon2id$hash");
    }

    #[tokio::test]
    async fn favorites_add_is_idempotent_and_remove_drops() {
        let (db, _dir) = setup_db().await;
        let user = make_user("asha@example.com", Role::Consumer);
        create_user(&db, &user).await.unwrap();

        add_favorite(&db, &user.id, "prov-1").await.unwrap();
        add_favorite(&db, &user.id, "prov-1").await.unwrap();
        add_favorite(&db, &user.id, "prov-2").await.unwrap();
        let got = get_user(&db, &user.id).await.unwrap().unwrap();
        assert_eq!(got.favorites, vec!["prov-1".to_string(), "prov-2".to_string()]);

        remove_favorite(&db, &user.id, "prov-1").await.unwrap();
        let got = get_user(&db, &user.id).await.unwrap().unwrap();
        assert_eq!(got.favorites, vec!["prov-2".to_string()]);
    }

    #[tokio::test]
    async fn bump_token_version_increments() {
        let (db, _dir) = setup_db().await;
        let user = make_user("asha@example.com", Role::Consumer);
        create_user(&db, &user).await.unwrap();

        bump_token_version(&db, &user.id).await.unwrap();
        bump_token_version(&db, &user.id).await.unwrap();
        let got = get_user(&db, &user.id).await.unwrap().unwrap();
        assert_eq!(got.token_version, 2);
    }

    #[tokio::test]
    async fn delete_user_removes_the_row() {
        let (db, _dir) = setup_db().await;
        let user = make_user("gone@example.com", Role::Consumer);
        create_user(&db, &user).await.unwrap();
        delete_user(&db, &user.id).await.unwrap();
        assert!(get_user(&db, &user.id).await.unwrap().is_none());
    }
}
