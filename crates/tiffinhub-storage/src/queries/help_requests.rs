// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Help-request persistence: ticket rows with an append-only response log.
//!
//! Visibility is role-scoped: admins see the admin-routed types (and
//! consumer-to-provider threads only when explicitly filtering for them);
//! everyone else sees only threads where they are sender or recipient.

use rusqlite::{Row, params, params_from_iter, types::Value};

use tiffinhub_core::types::Page;
use tiffinhub_core::{HelpKind, HelpPriority, HelpRequest, HelpResponse, HelpStatus, HubError};

use crate::database::Database;
use crate::models::HelpRequestWithParties;
use crate::queries::{col_enum, col_json, to_json};

const HELP_COLUMNS: &str = "h.id, h.from_user_id, h.to_user_id, h.kind, h.subject, h.message, \
                            h.status, h.priority, h.category, h.responses, h.resolved_at, \
                            h.resolved_by, h.created_at, h.updated_at";

const HELP_JOINS: &str = " FROM help_requests h \
                          JOIN users f ON f.id = h.from_user_id \
                          LEFT JOIN users t ON t.id = h.to_user_id";

fn map_help_request(row: &Row<'_>) -> Result<HelpRequest, rusqlite::Error> {
    Ok(HelpRequest {
        id: row.get(0)?,
        from_user_id: row.get(1)?,
        to_user_id: row.get(2)?,
        kind: col_enum(3, row.get::<_, String>(3)?)?,
        subject: row.get(4)?,
        message: row.get(5)?,
        status: col_enum(6, row.get::<_, String>(6)?)?,
        priority: col_enum(7, row.get::<_, String>(7)?)?,
        category: col_enum(8, row.get::<_, String>(8)?)?,
        responses: col_json(9, row.get::<_, String>(9)?)?,
        resolved_at: row.get(10)?,
        resolved_by: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn map_with_parties(row: &Row<'_>) -> Result<HelpRequestWithParties, rusqlite::Error> {
    Ok(HelpRequestWithParties {
        request: map_help_request(row)?,
        from_name: row.get(14)?,
        from_email: row.get(15)?,
        from_role: row.get(16)?,
        to_name: row.get(17)?,
        to_email: row.get(18)?,
        to_role: row.get(19)?,
    })
}

/// Insert a new help request.
pub async fn create_help_request(db: &Database, request: &HelpRequest) -> Result<(), HubError> {
    let request = request.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO help_requests (id, from_user_id, to_user_id, kind, subject, \
                 message, status, priority, category, responses, resolved_at, resolved_by, \
                 created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    request.id,
                    request.from_user_id,
                    request.to_user_id,
                    request.kind.to_string(),
                    request.subject,
                    request.message,
                    request.status.to_string(),
                    request.priority.to_string(),
                    request.category.to_string(),
                    to_json(&request.responses),
                    request.resolved_at,
                    request.resolved_by,
                    request.created_at,
                    request.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a help request with both participants' display fields.
pub async fn get_help_request(
    db: &Database,
    id: &str,
) -> Result<Option<HelpRequestWithParties>, HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {HELP_COLUMNS}, f.name, f.email, f.role, t.name, t.email, t.role\
                 {HELP_JOINS} WHERE h.id = ?1"
            ))?;
            match stmt.query_row(params![id], map_with_parties) {
                Ok(request) => Ok(Some(request)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Optional listing filters shared by both visibility scopes.
#[derive(Debug, Clone, Default)]
pub struct HelpFilter {
    pub kind: Option<HelpKind>,
    pub status: Option<HelpStatus>,
    pub priority: Option<HelpPriority>,
}

fn push_common_filters(filter: &HelpFilter, clause: &mut String, values: &mut Vec<Value>) {
    if let Some(status) = filter.status {
        clause.push_str(" AND h.status = ?");
        values.push(status.to_string().into());
    }
    if let Some(priority) = filter.priority {
        clause.push_str(" AND h.priority = ?");
        values.push(priority.to_string().into());
    }
}

async fn list_with_clause(
    db: &Database,
    clause: String,
    filter_params: Vec<Value>,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<Page<HelpRequestWithParties>, HubError> {
    db.connection()
        .call(move |conn| {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM help_requests h{clause}"),
                params_from_iter(filter_params.iter()),
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {HELP_COLUMNS}, f.name, f.email, f.role, t.name, t.email, t.role\
                 {HELP_JOINS}{clause} ORDER BY h.created_at DESC LIMIT ? OFFSET ?"
            ))?;
            let mut all_params = filter_params;
            all_params.push(i64::from(limit).into());
            all_params.push((offset as i64).into());
            let rows = stmt.query_map(params_from_iter(all_params.iter()), map_with_parties)?;
            let mut requests = Vec::new();
            for row in rows {
                requests.push(row?);
            }
            Ok(Page::new(requests, page, limit, total as u64))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Admin-scoped listing. Without a kind filter admins see the admin-routed
/// types; filtering for consumer_to_provider opts into those threads.
pub async fn list_for_admin(
    db: &Database,
    filter: HelpFilter,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<Page<HelpRequestWithParties>, HubError> {
    let mut clause = String::from(" WHERE 1=1");
    let mut values: Vec<Value> = Vec::new();
    match filter.kind {
        Some(kind) => {
            clause.push_str(" AND h.kind = ?");
            values.push(kind.to_string().into());
        }
        None => {
            clause.push_str(" AND h.kind IN ('admin_support', 'provider_support')");
        }
    }
    push_common_filters(&filter, &mut clause, &mut values);
    list_with_clause(db, clause, values, page, limit, offset).await
}

/// Participant-scoped listing: threads where the user is sender or
/// recipient, nothing else.
pub async fn list_for_participant(
    db: &Database,
    user_id: &str,
    filter: HelpFilter,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<Page<HelpRequestWithParties>, HubError> {
    let mut clause = String::from(" WHERE (h.from_user_id = ? OR h.to_user_id = ?)");
    let mut values: Vec<Value> = vec![user_id.to_string().into(), user_id.to_string().into()];
    if let Some(kind) = filter.kind {
        clause.push_str(" AND h.kind = ?");
        values.push(kind.to_string().into());
    }
    push_common_filters(&filter, &mut clause, &mut values);
    list_with_clause(db, clause, values, page, limit, offset).await
}

/// A mutation batch for one ticket: status and priority changes plus an
/// optional appended response. `actor_id` stamps resolution metadata when
/// the status moves to resolved.
#[derive(Debug, Clone, Default)]
pub struct HelpUpdate {
    pub status: Option<HelpStatus>,
    pub priority: Option<HelpPriority>,
    pub response: Option<HelpResponse>,
}

/// Apply a ticket update in one read-modify-write transaction. Returns the
/// updated request, or `None` if the id does not resolve.
pub async fn update_help_request(
    db: &Database,
    id: &str,
    actor_id: &str,
    update: HelpUpdate,
) -> Result<Option<HelpRequest>, HubError> {
    let id = id.to_string();
    let actor_id = actor_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let current = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {HELP_COLUMNS} FROM help_requests h WHERE h.id = ?1"
                ))?;
                match stmt.query_row(params![id], map_help_request) {
                    Ok(request) => Some(request),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e.into()),
                }
            };
            let Some(mut request) = current else {
                tx.commit()?;
                return Ok(None);
            };

            if let Some(status) = update.status {
                request.status = status;
                if status == HelpStatus::Resolved {
                    request.resolved_at = Some(tiffinhub_core::types::now_rfc3339());
                    request.resolved_by = Some(actor_id.clone());
                }
            }
            if let Some(priority) = update.priority {
                request.priority = priority;
            }
            if let Some(response) = update.response {
                request.responses.push(response);
            }

            tx.execute(
                "UPDATE help_requests SET status = ?1, priority = ?2, responses = ?3, \
                 resolved_at = ?4, resolved_by = ?5, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?6",
                params![
                    request.status.to_string(),
                    request.priority.to_string(),
                    to_json(&request.responses),
                    request.resolved_at,
                    request.resolved_by,
                    id,
                ],
            )?;
            tx.commit()?;
            Ok(Some(request))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tiffinhub_core::types::{new_id, now_rfc3339, page_window};
    use tiffinhub_core::{HelpCategory, Role, User};

    use crate::queries::users;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    async fn seed_user(db: &Database, name: &str, email: &str, role: Role) -> User {
        let user = User::new(name.into(), email.into(), "$h".into(), role);
        users::create_user(db, &user).await.unwrap();
        user
    }

    fn make_request(from: &str, to: Option<&str>, kind: HelpKind) -> HelpRequest {
        let now = now_rfc3339();
        HelpRequest {
            id: new_id(),
            from_user_id: from.to_string(),
            to_user_id: to.map(String::from),
            kind,
            subject: "Order arrived late".into(),
            message: "My lunch was an hour late".into(),
            status: HelpStatus::Open,
            priority: HelpPriority::Medium,
            category: HelpCategory::Order,
            responses: Vec::new(),
            resolved_at: None,
            resolved_by: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_and_get_joins_participants() {
        let (db, _dir) = setup_db().await;
        let consumer = seed_user(&db, "Asha", "asha@x.com", Role::Consumer).await;
        let owner = seed_user(&db, "Ravi", "ravi@x.com", Role::Provider).await;

        let request = make_request(&consumer.id, Some(&owner.id), HelpKind::ConsumerToProvider);
        create_help_request(&db, &request).await.unwrap();

        let got = get_help_request(&db, &request.id).await.unwrap().unwrap();
        assert_eq!(got.from_name, "Asha");
        assert_eq!(got.from_role, "consumer");
        assert_eq!(got.to_name.as_deref(), Some("Ravi"));
        assert_eq!(got.request.status, HelpStatus::Open);
    }

    #[tokio::test]
    async fn admin_scope_hides_consumer_threads_unless_filtered() {
        let (db, _dir) = setup_db().await;
        let consumer = seed_user(&db, "Asha", "asha@x.com", Role::Consumer).await;
        let owner = seed_user(&db, "Ravi", "ravi@x.com", Role::Provider).await;

        create_help_request(&db, &make_request(&consumer.id, None, HelpKind::AdminSupport))
            .await
            .unwrap();
        create_help_request(&db, &make_request(&owner.id, None, HelpKind::ProviderSupport))
            .await
            .unwrap();
        create_help_request(
            &db,
            &make_request(&consumer.id, Some(&owner.id), HelpKind::ConsumerToProvider),
        )
        .await
        .unwrap();

        let (page, limit, offset) = page_window(None, None, 10);
        let default_view = list_for_admin(&db, HelpFilter::default(), page, limit, offset)
            .await
            .unwrap();
        assert_eq!(default_view.total_records, 2);
        assert!(default_view
            .items
            .iter()
            .all(|r| r.request.kind != HelpKind::ConsumerToProvider));

        let explicit = list_for_admin(
            &db,
            HelpFilter {
                kind: Some(HelpKind::ConsumerToProvider),
                ..Default::default()
            },
            page,
            limit,
            offset,
        )
        .await
        .unwrap();
        assert_eq!(explicit.total_records, 1);
    }

    #[tokio::test]
    async fn participant_scope_never_leaks_other_threads() {
        let (db, _dir) = setup_db().await;
        let consumer = seed_user(&db, "Asha", "asha@x.com", Role::Consumer).await;
        let owner = seed_user(&db, "Ravi", "ravi@x.com", Role::Provider).await;
        let stranger = seed_user(&db, "Meera", "meera@x.com", Role::Consumer).await;

        create_help_request(
            &db,
            &make_request(&consumer.id, Some(&owner.id), HelpKind::ConsumerToProvider),
        )
        .await
        .unwrap();
        create_help_request(&db, &make_request(&stranger.id, None, HelpKind::AdminSupport))
            .await
            .unwrap();

        let (page, limit, offset) = page_window(None, None, 10);
        for id in [&consumer.id, &owner.id] {
            let visible = list_for_participant(&db, id, HelpFilter::default(), page, limit, offset)
                .await
                .unwrap();
            assert_eq!(visible.total_records, 1);
            let r = &visible.items[0].request;
            assert!(r.from_user_id == *id || r.to_user_id.as_deref() == Some(id));
        }

        let strangers = list_for_participant(
            &db,
            &stranger.id,
            HelpFilter::default(),
            page,
            limit,
            offset,
        )
        .await
        .unwrap();
        assert_eq!(strangers.total_records, 1);
        assert_eq!(strangers.items[0].request.from_user_id, stranger.id);
    }

    #[tokio::test]
    async fn filters_narrow_by_status_and_priority() {
        let (db, _dir) = setup_db().await;
        let consumer = seed_user(&db, "Asha", "asha@x.com", Role::Consumer).await;
        let mut urgent = make_request(&consumer.id, None, HelpKind::AdminSupport);
        urgent.priority = HelpPriority::Urgent;
        create_help_request(&db, &urgent).await.unwrap();
        create_help_request(&db, &make_request(&consumer.id, None, HelpKind::AdminSupport))
            .await
            .unwrap();

        let (page, limit, offset) = page_window(None, None, 10);
        let urgent_only = list_for_admin(
            &db,
            HelpFilter {
                priority: Some(HelpPriority::Urgent),
                ..Default::default()
            },
            page,
            limit,
            offset,
        )
        .await
        .unwrap();
        assert_eq!(urgent_only.total_records, 1);
        assert_eq!(urgent_only.items[0].request.id, urgent.id);
    }

    #[tokio::test]
    async fn response_appends_and_resolved_stamps_metadata() {
        let (db, _dir) = setup_db().await;
        let consumer = seed_user(&db, "Asha", "asha@x.com", Role::Consumer).await;
        let admin = seed_user(&db, "Root", "admin@x.com", Role::Admin).await;
        let request = make_request(&consumer.id, None, HelpKind::AdminSupport);
        create_help_request(&db, &request).await.unwrap();

        let updated = update_help_request(
            &db,
            &request.id,
            &admin.id,
            HelpUpdate {
                response: Some(HelpResponse {
                    user_id: admin.id.clone(),
                    message: "Looking into it".into(),
                    timestamp: now_rfc3339(),
                    is_admin: true,
                }),
                status: Some(HelpStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.responses.len(), 1);
        assert_eq!(updated.status, HelpStatus::InProgress);
        assert!(updated.resolved_at.is_none());

        let resolved = update_help_request(
            &db,
            &request.id,
            &admin.id,
            HelpUpdate {
                status: Some(HelpStatus::Resolved),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(resolved.resolved_at.is_some());
        assert_eq!(resolved.resolved_by.as_deref(), Some(admin.id.as_str()));
        assert_eq!(resolved.responses.len(), 1, "append-only log kept");

        assert!(
            update_help_request(&db, "missing", &admin.id, HelpUpdate::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
