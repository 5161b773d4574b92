// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification persistence: a per-user append-only log with a read flag.

use rusqlite::{Row, params, params_from_iter, types::Value};

use tiffinhub_core::types::Page;
use tiffinhub_core::{HubError, Notification};

use crate::database::Database;
use crate::queries::{col_enum, col_json_opt};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, message, kind, is_read, data, created_at, updated_at";

fn map_notification(row: &Row<'_>) -> Result<Notification, rusqlite::Error> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        message: row.get(3)?,
        kind: col_enum(4, row.get::<_, String>(4)?)?,
        is_read: row.get(5)?,
        data: col_json_opt(6, row.get::<_, Option<String>>(6)?)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Append notifications in a single transaction. Domain-event producers
/// pass one record per recipient.
pub async fn create_notifications(
    db: &Database,
    notifications: Vec<Notification>,
) -> Result<(), HubError> {
    if notifications.is_empty() {
        return Ok(());
    }
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for n in &notifications {
                tx.execute(
                    "INSERT INTO notifications (id, user_id, title, message, kind, is_read, \
                     data, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        n.id,
                        n.user_id,
                        n.title,
                        n.message,
                        n.kind.to_string(),
                        n.is_read,
                        n.data.as_ref().map(|d| d.to_string()),
                        n.created_at,
                        n.updated_at,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a user's notifications newest first, optionally unread only, with
/// the running unread count alongside the page.
pub async fn list_for_user(
    db: &Database,
    user_id: &str,
    unread_only: bool,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<(Page<Notification>, u64), HubError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let filter = if unread_only {
                " AND is_read = 0"
            } else {
                ""
            };

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM notifications WHERE user_id = ?1{filter}"),
                params![user_id],
                |row| row.get(0),
            )?;
            let unread: i64 = conn.query_row(
                "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
                params![user_id],
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = ?1{filter} \
                 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3"
            ))?;
            let rows = stmt.query_map(
                params![user_id, i64::from(limit), offset as i64],
                map_notification,
            )?;
            let mut notifications = Vec::new();
            for row in rows {
                notifications.push(row?);
            }
            Ok((
                Page::new(notifications, page, limit, total as u64),
                unread as u64,
            ))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip the read flag on a user's notifications.
///
/// With `ids`, only those of the user's notifications are touched; without,
/// every notification owned by the user. Returns the number of rows
/// changed. Ids belonging to other users are ignored by the ownership
/// predicate, never flipped.
pub async fn mark_read(
    db: &Database,
    user_id: &str,
    ids: Option<Vec<String>>,
    read: bool,
) -> Result<usize, HubError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = match ids {
                Some(ids) if !ids.is_empty() => {
                    let placeholders = vec!["?"; ids.len()].join(", ");
                    let mut values: Vec<Value> =
                        vec![i64::from(read).into(), user_id.into()];
                    values.extend(ids.into_iter().map(Value::from));
                    conn.execute(
                        &format!(
                            "UPDATE notifications SET is_read = ?1, \
                             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
                             WHERE user_id = ?2 AND id IN ({placeholders})"
                        ),
                        params_from_iter(values.iter()),
                    )?
                }
                _ => conn.execute(
                    "UPDATE notifications SET is_read = ?1, \
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE user_id = ?2",
                    params![read, user_id],
                )?,
            };
            Ok(changed)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
