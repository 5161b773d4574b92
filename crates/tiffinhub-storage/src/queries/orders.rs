// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order persistence. Orders are append-only apart from the status and
//! payment-status fields; rows are never deleted.

use rusqlite::{Row, params, params_from_iter, types::Value};

use tiffinhub_core::types::Page;
use tiffinhub_core::{HubError, Order, OrderStatus, PaymentStatus};

use crate::database::Database;
use crate::models::OrderWithParties;
use crate::queries::{col_enum, col_json, to_json};

pub(crate) const ORDER_COLUMNS: &str = "o.id, o.consumer_id, o.provider_id, o.items, o.total_amount, \
                             o.status, o.delivery_address, o.delivery_date, o.payment_status, \
                             o.payment_method, o.notes, o.created_at, o.updated_at";

// Joins both parties' display fields: the consumer directly, the provider's
// owning user through its profile.
pub(crate) const ORDER_JOINS: &str = " FROM orders o \
                           JOIN users c ON c.id = o.consumer_id \
                           JOIN service_providers p ON p.id = o.provider_id \
                           JOIN users pu ON pu.id = p.user_id";

pub(crate) fn map_order(row: &Row<'_>) -> Result<Order, rusqlite::Error> {
    Ok(Order {
        id: row.get(0)?,
        consumer_id: row.get(1)?,
        provider_id: row.get(2)?,
        items: col_json(3, row.get::<_, String>(3)?)?,
        total_amount: row.get(4)?,
        status: col_enum(5, row.get::<_, String>(5)?)?,
        delivery_address: row.get(6)?,
        delivery_date: row.get(7)?,
        payment_status: col_enum(8, row.get::<_, String>(8)?)?,
        payment_method: row.get(9)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

pub(crate) fn map_order_with_parties(row: &Row<'_>) -> Result<OrderWithParties, rusqlite::Error> {
    Ok(OrderWithParties {
        order: map_order(row)?,
        consumer_name: row.get(13)?,
        consumer_email: row.get(14)?,
        provider_business_name: row.get(15)?,
        provider_owner_name: row.get(16)?,
    })
}

/// Persist a new order and recompute the provider's derived order count in
/// the same transaction.
pub async fn create_order(db: &Database, order: &Order) -> Result<(), HubError> {
    let order = order.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO orders (id, consumer_id, provider_id, items, total_amount, status, \
                 delivery_address, delivery_date, payment_status, payment_method, notes, \
                 created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    order.id,
                    order.consumer_id,
                    order.provider_id,
                    to_json(&order.items),
                    order.total_amount,
                    order.status.to_string(),
                    order.delivery_address,
                    order.delivery_date,
                    order.payment_status.to_string(),
                    order.payment_method,
                    order.notes,
                    order.created_at,
                    order.updated_at,
                ],
            )?;
            tx.execute(
                "UPDATE service_providers SET \
                 total_orders = (SELECT COUNT(*) FROM orders WHERE provider_id = ?1), \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?1",
                params![order.provider_id],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an order by id.
pub async fn get_order(db: &Database, id: &str) -> Result<Option<Order>, HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ?1"))?;
            match stmt.query_row(params![id], map_order) {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an order with both parties' display fields.
pub async fn get_order_with_parties(
    db: &Database,
    id: &str,
) -> Result<Option<OrderWithParties>, HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS}, c.name, c.email, p.business_name, pu.name\
                 {ORDER_JOINS} WHERE o.id = ?1"
            ))?;
            match stmt.query_row(params![id], map_order_with_parties) {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Role-scoped listing filters. `consumer_id`/`provider_id` scope the list
/// for non-admin callers; admins pass neither.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub consumer_id: Option<String>,
    pub provider_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// List orders newest first with both parties' display fields.
pub async fn list_orders(
    db: &Database,
    filter: OrderFilter,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<Page<OrderWithParties>, HubError> {
    db.connection()
        .call(move |conn| {
            let mut clause = String::from(" WHERE 1=1");
            let mut filter_params: Vec<Value> = Vec::new();
            if let Some(consumer_id) = filter.consumer_id {
                clause.push_str(" AND o.consumer_id = ?");
                filter_params.push(consumer_id.into());
            }
            if let Some(provider_id) = filter.provider_id {
                clause.push_str(" AND o.provider_id = ?");
                filter_params.push(provider_id.into());
            }
            if let Some(status) = filter.status {
                clause.push_str(" AND o.status = ?");
                filter_params.push(status.to_string().into());
            }
            if let Some(payment_status) = filter.payment_status {
                clause.push_str(" AND o.payment_status = ?");
                filter_params.push(payment_status.to_string().into());
            }

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM orders o{clause}"),
                params_from_iter(filter_params.iter()),
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS}, c.name, c.email, p.business_name, pu.name\
                 {ORDER_JOINS}{clause} ORDER BY o.created_at DESC LIMIT ? OFFSET ?"
            ))?;
            let mut all_params = filter_params;
            all_params.push(i64::from(limit).into());
            all_params.push((offset as i64).into());
            let rows =
                stmt.query_map(params_from_iter(all_params.iter()), map_order_with_parties)?;
            let mut orders = Vec::new();
            for row in rows {
                orders.push(row?);
            }
            Ok(Page::new(orders, page, limit, total as u64))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Persist a status transition. Returns the updated order, or `None` if the
/// id does not resolve. Last-writer-wins: no version check on the row.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: OrderStatus,
) -> Result<Option<Order>, HubError> {
    let changed = {
        let id = id.to_string();
        db.connection()
            .call(move |conn| {
                let n = conn.execute(
                    "UPDATE orders SET status = ?1, \
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?2",
                    params![status.to_string(), id],
                )?;
                Ok(n)
            })
            .await
            .map_err(crate::database::map_tr_err)?
    };
    if changed == 0 {
        return Ok(None);
    }
    get_order(db, id).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;
    use tiffinhub_core::types::{OrderItem, new_id, now_rfc3339, page_window};
    use tiffinhub_core::{Role, ServiceProvider, User};

    use crate::queries::{providers, users};

    pub(crate) async fn seed_parties(db: &Database) -> (User, ServiceProvider) {
        let consumer = User::new("Asha".into(), "asha@x.com".into(), "$h".into(), Role::Consumer);
        users::create_user(db, &consumer).await.unwrap();
        let owner = User::new("Ravi".into(), "ravi@x.com".into(), "$h".into(), Role::Provider);
        users::create_user(db, &owner).await.unwrap();
        let provider = ServiceProvider::new(owner.id.clone(), "Ravi's Kitchen".into());
        providers::create_provider(db, &provider).await.unwrap();
        (consumer, provider)
    }

    pub(crate) fn make_order(consumer_id: &str, provider_id: &str) -> Order {
        let now = now_rfc3339();
        let items = vec![OrderItem {
            item_id: new_id(),
            name: "Thali".into(),
            price: 100.0,
            quantity: 2,
        }];
        Order {
            id: new_id(),
            consumer_id: consumer_id.to_string(),
            provider_id: provider_id.to_string(),
            total_amount: tiffinhub_core::types::snapshot_total(&items),
            items,
            status: OrderStatus::Confirmed,
            delivery_address: "12 MG Road".into(),
            delivery_date: now.clone(),
            payment_status: PaymentStatus::Pending,
            payment_method: "cod".into(),
            notes: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_round_trips_and_bumps_provider_count() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;

        let order = make_order(&consumer.id, &provider.id);
        create_order(&db, &order).await.unwrap();

        let got = get_order(&db, &order.id).await.unwrap().unwrap();
        assert_eq!(got.total_amount, 200.0);
        assert_eq!(got.status, OrderStatus::Confirmed);
        assert_eq!(got.items.len(), 1);

        let p = providers::get_provider(&db, &provider.id).await.unwrap().unwrap();
        assert_eq!(p.total_orders, 1);

        create_order(&db, &make_order(&consumer.id, &provider.id)).await.unwrap();
        let p = providers::get_provider(&db, &provider.id).await.unwrap().unwrap();
        assert_eq!(p.total_orders, 2);
    }

    #[tokio::test]
    async fn listing_joins_both_parties() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;
        create_order(&db, &make_order(&consumer.id, &provider.id)).await.unwrap();

        let (page, limit, offset) = page_window(None, None, 50);
        let listed = list_orders(&db, OrderFilter::default(), page, limit, offset)
            .await
            .unwrap();
        assert_eq!(listed.total_records, 1);
        let row = &listed.items[0];
        assert_eq!(row.consumer_name, "Asha");
        assert_eq!(row.consumer_email, "asha@x.com");
        assert_eq!(row.provider_business_name, "Ravi's Kitchen");
        assert_eq!(row.provider_owner_name, "Ravi");
    }

    #[tokio::test]
    async fn listing_scopes_by_party_and_status() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;
        let other = User::new("Meera".into(), "meera@x.com".into(), "$h".into(), Role::Consumer);
        users::create_user(&db, &other).await.unwrap();

        create_order(&db, &make_order(&consumer.id, &provider.id)).await.unwrap();
        let mut delivered = make_order(&other.id, &provider.id);
        delivered.status = OrderStatus::Delivered;
        create_order(&db, &delivered).await.unwrap();

        let (page, limit, offset) = page_window(None, None, 50);
        let mine = list_orders(
            &db,
            OrderFilter {
                consumer_id: Some(consumer.id.clone()),
                ..Default::default()
            },
            page,
            limit,
            offset,
        )
        .await
        .unwrap();
        assert_eq!(mine.total_records, 1);
        assert_eq!(mine.items[0].order.consumer_id, consumer.id);

        let done = list_orders(
            &db,
            OrderFilter {
                provider_id: Some(provider.id.clone()),
                status: Some(OrderStatus::Delivered),
                ..Default::default()
            },
            page,
            limit,
            offset,
        )
        .await
        .unwrap();
        assert_eq!(done.total_records, 1);
        assert_eq!(done.items[0].order.id, delivered.id);
    }

    #[tokio::test]
    async fn get_with_parties_resolves_display_fields() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;
        let order = make_order(&consumer.id, &provider.id);
        create_order(&db, &order).await.unwrap();

        let got = get_order_with_parties(&db, &order.id).await.unwrap().unwrap();
        assert_eq!(got.order.id, order.id);
        assert_eq!(got.consumer_name, "Asha");
        assert_eq!(got.provider_business_name, "Ravi's Kitchen");

        assert!(get_order_with_parties(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_status_persists_and_missing_id_is_none() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;
        let order = make_order(&consumer.id, &provider.id);
        create_order(&db, &order).await.unwrap();

        let updated = update_status(&db, &order.id, OrderStatus::Preparing)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);

        assert!(update_status(&db, "missing", OrderStatus::Ready).await.unwrap().is_none());
    }
}
