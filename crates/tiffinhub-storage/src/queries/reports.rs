// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side reporting aggregations: dashboards, admin reports, and
//! per-provider analytics.
//!
//! Pure projections with no write effects. Revenue figures count paid
//! orders only; item rollups unnest the JSON snapshots with `json_each`.

use rusqlite::{Connection, params};

use tiffinhub_core::HubError;

use crate::database::Database;
use crate::models::{
    AdminDashboard, AdminReports, DailyOrders, MonthlyOrders, OrderWithParties, ProviderAnalytics,
    ProviderDashboard, RatingBucket, RevenueMetrics, ReviewStats, ReviewWithParties, StatusCount,
    StatusShare, TopCustomer, TopItem, TopProvider, UserGrowthRow,
};
use crate::queries::orders::{ORDER_COLUMNS, ORDER_JOINS, map_order_with_parties};

const RECENT_ORDERS_LIMIT: i64 = 10;
const TOP_N: i64 = 10;

fn status_counts(conn: &Connection, clause: &str, id: Option<&str>) -> Result<Vec<StatusCount>, rusqlite::Error> {
    let sql =
        format!("SELECT status, COUNT(*) FROM orders{clause} GROUP BY status ORDER BY status");
    let mut stmt = conn.prepare(&sql)?;
    let map = |row: &rusqlite::Row<'_>| {
        Ok(StatusCount {
            status: row.get(0)?,
            count: row.get(1)?,
        })
    };
    let rows = match id {
        Some(id) => stmt.query_map(params![id], map)?,
        None => stmt.query_map([], map)?,
    };
    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}

fn recent_orders(
    conn: &Connection,
    provider_id: Option<&str>,
) -> Result<Vec<OrderWithParties>, rusqlite::Error> {
    let clause = if provider_id.is_some() {
        " WHERE o.provider_id = ?1"
    } else {
        ""
    };
    let sql = format!(
        "SELECT {ORDER_COLUMNS}, c.name, c.email, p.business_name, pu.name\
         {ORDER_JOINS}{clause} ORDER BY o.created_at DESC LIMIT {RECENT_ORDERS_LIMIT}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = match provider_id {
        Some(id) => stmt.query_map(params![id], map_order_with_parties)?,
        None => stmt.query_map([], map_order_with_parties)?,
    };
    let mut orders = Vec::new();
    for row in rows {
        orders.push(row?);
    }
    Ok(orders)
}

/// Platform-wide dashboard rollup (admin view).
pub async fn admin_dashboard(db: &Database) -> Result<AdminDashboard, HubError> {
    db.connection()
        .call(move |conn| {
            let total_users: i64 =
                conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            let total_providers: i64 =
                conn.query_row("SELECT COUNT(*) FROM service_providers", [], |row| row.get(0))?;
            let total_orders: i64 =
                conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
            let total_revenue: f64 = conn.query_row(
                "SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE payment_status = 'paid'",
                [],
                |row| row.get(0),
            )?;

            Ok(AdminDashboard {
                total_users,
                total_providers,
                total_orders,
                total_revenue,
                orders_by_status: status_counts(conn, "", None)?,
                recent_orders: recent_orders(conn, None)?,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Per-provider dashboard rollup.
pub async fn provider_dashboard(
    db: &Database,
    provider_id: &str,
) -> Result<ProviderDashboard, HubError> {
    let provider_id = provider_id.to_string();
    db.connection()
        .call(move |conn| {
            let total_orders: i64 = conn.query_row(
                "SELECT COUNT(*) FROM orders WHERE provider_id = ?1",
                params![provider_id],
                |row| row.get(0),
            )?;
            let total_revenue: f64 = conn.query_row(
                "SELECT COALESCE(SUM(total_amount), 0) FROM orders \
                 WHERE provider_id = ?1 AND payment_status = 'paid'",
                params![provider_id],
                |row| row.get(0),
            )?;

            Ok(ProviderDashboard {
                total_orders,
                total_revenue,
                orders_by_status: status_counts(
                    conn,
                    " WHERE provider_id = ?1",
                    Some(&provider_id),
                )?,
                recent_orders: recent_orders(conn, Some(&provider_id))?,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Admin report bundle for orders created at or after `since` (RFC 3339).
pub async fn admin_reports(db: &Database, since: &str) -> Result<AdminReports, HubError> {
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            // Orders and paid revenue by calendar month.
            let mut stmt = conn.prepare(
                "SELECT strftime('%Y-%m', created_at) AS month, COUNT(*), \
                        COALESCE(SUM(CASE WHEN payment_status = 'paid' \
                                          THEN total_amount ELSE 0 END), 0) \
                 FROM orders WHERE created_at >= ?1 GROUP BY month ORDER BY month",
            )?;
            let rows = stmt.query_map(params![since], |row| {
                Ok(MonthlyOrders {
                    month: row.get(0)?,
                    orders: row.get(1)?,
                    revenue: row.get(2)?,
                })
            })?;
            let mut orders_by_month = Vec::new();
            for row in rows {
                orders_by_month.push(row?);
            }

            // Status breakdown with shares, across all time.
            let raw = status_counts(conn, "", None)?;
            let grand_total: i64 = raw.iter().map(|s| s.count).sum();
            let orders_by_status = raw
                .into_iter()
                .map(|s| StatusShare {
                    percentage: if grand_total == 0 {
                        0.0
                    } else {
                        s.count as f64 * 100.0 / grand_total as f64
                    },
                    status: s.status,
                    count: s.count,
                })
                .collect();

            // Top providers by paid revenue.
            let mut stmt = conn.prepare(&format!(
                "SELECT o.provider_id, p.business_name, COUNT(*), \
                        COALESCE(SUM(CASE WHEN o.payment_status = 'paid' \
                                          THEN o.total_amount ELSE 0 END), 0) AS revenue \
                 FROM orders o JOIN service_providers p ON p.id = o.provider_id \
                 GROUP BY o.provider_id ORDER BY revenue DESC LIMIT {TOP_N}"
            ))?;
            let rows = stmt.query_map([], |row| {
                Ok(TopProvider {
                    provider_id: row.get(0)?,
                    name: row.get(1)?,
                    orders: row.get(2)?,
                    revenue: row.get(3)?,
                })
            })?;
            let mut top_providers = Vec::new();
            for row in rows {
                top_providers.push(row?);
            }

            // Registrations by month, split by role.
            let mut stmt = conn.prepare(
                "SELECT strftime('%Y-%m', created_at) AS month, COUNT(*), \
                        SUM(CASE WHEN role = 'provider' THEN 1 ELSE 0 END), \
                        SUM(CASE WHEN role = 'consumer' THEN 1 ELSE 0 END) \
                 FROM users WHERE created_at >= ?1 GROUP BY month ORDER BY month",
            )?;
            let rows = stmt.query_map(params![since], |row| {
                Ok(UserGrowthRow {
                    month: row.get(0)?,
                    users: row.get(1)?,
                    providers: row.get(2)?,
                    consumers: row.get(3)?,
                })
            })?;
            let mut user_growth = Vec::new();
            for row in rows {
                user_growth.push(row?);
            }

            // Range revenue rollup over paid orders.
            let (total_revenue, average_order_value): (f64, Option<f64>) = conn.query_row(
                "SELECT COALESCE(SUM(total_amount), 0), AVG(total_amount) \
                 FROM orders WHERE payment_status = 'paid' AND created_at >= ?1",
                params![since],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            let total_orders: i64 = conn.query_row(
                "SELECT COUNT(*) FROM orders WHERE created_at >= ?1",
                params![since],
                |row| row.get(0),
            )?;

            Ok(AdminReports {
                orders_by_month,
                orders_by_status,
                top_providers,
                user_growth,
                revenue_metrics: RevenueMetrics {
                    total_revenue,
                    total_orders,
                    average_order_value: average_order_value.unwrap_or(0.0),
                },
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Per-provider analytics bundle for activity at or after `since`.
pub async fn provider_analytics(
    db: &Database,
    provider_id: &str,
    since: &str,
) -> Result<ProviderAnalytics, HubError> {
    let provider_id = provider_id.to_string();
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            // Orders and paid revenue by calendar day.
            let mut stmt = conn.prepare(
                "SELECT strftime('%Y-%m-%d', created_at) AS day, COUNT(*), \
                        COALESCE(SUM(CASE WHEN payment_status = 'paid' \
                                          THEN total_amount ELSE 0 END), 0) \
                 FROM orders WHERE provider_id = ?1 AND created_at >= ?2 \
                 GROUP BY day ORDER BY day",
            )?;
            let rows = stmt.query_map(params![provider_id, since], |row| {
                Ok(DailyOrders {
                    date: row.get(0)?,
                    orders: row.get(1)?,
                    revenue: row.get(2)?,
                })
            })?;
            let mut orders_by_day = Vec::new();
            for row in rows {
                orders_by_day.push(row?);
            }

            // Top items by quantity, unnesting the snapshot JSON.
            let mut stmt = conn.prepare(&format!(
                "SELECT je.value ->> 'name' AS item, \
                        SUM(je.value ->> 'quantity') AS quantity, \
                        SUM((je.value ->> 'price') * (je.value ->> 'quantity')) AS revenue \
                 FROM orders o, json_each(o.items) je \
                 WHERE o.provider_id = ?1 AND o.created_at >= ?2 \
                 GROUP BY item ORDER BY quantity DESC LIMIT {TOP_N}"
            ))?;
            let rows = stmt.query_map(params![provider_id, since], |row| {
                Ok(TopItem {
                    name: row.get(0)?,
                    quantity: row.get(1)?,
                    revenue: row.get(2)?,
                })
            })?;
            let mut top_items = Vec::new();
            for row in rows {
                top_items.push(row?);
            }

            // Review statistics in the range.
            let (average, review_count): (Option<f64>, i64) = conn.query_row(
                "SELECT AVG(rating), COUNT(*) FROM reviews \
                 WHERE provider_id = ?1 AND created_at >= ?2",
                params![provider_id, since],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            let mut stmt = conn.prepare(
                "SELECT rating, COUNT(*) FROM reviews \
                 WHERE provider_id = ?1 AND created_at >= ?2 GROUP BY rating",
            )?;
            let rows = stmt.query_map(params![provider_id, since], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })?;
            let mut counts = std::collections::HashMap::new();
            for row in rows {
                let (rating, count) = row?;
                counts.insert(rating, count);
            }
            let rating_distribution = (1..=5)
                .map(|rating| RatingBucket {
                    rating,
                    count: counts.get(&rating).copied().unwrap_or(0),
                })
                .collect();

            let mut stmt = conn.prepare(
                "SELECT r.id, r.consumer_id, r.provider_id, r.order_id, r.rating, r.comment, \
                        r.is_verified, r.created_at, r.updated_at, c.name, p.business_name, \
                        o.total_amount, o.created_at \
                 FROM reviews r \
                 JOIN users c ON c.id = r.consumer_id \
                 JOIN service_providers p ON p.id = r.provider_id \
                 JOIN orders o ON o.id = r.order_id \
                 WHERE r.provider_id = ?1 ORDER BY r.created_at DESC LIMIT 5",
            )?;
            let rows = stmt.query_map(params![provider_id], |row| {
                Ok(ReviewWithParties {
                    review: tiffinhub_core::Review {
                        id: row.get(0)?,
                        consumer_id: row.get(1)?,
                        provider_id: row.get(2)?,
                        order_id: row.get(3)?,
                        rating: row.get(4)?,
                        comment: row.get(5)?,
                        is_verified: row.get(6)?,
                        created_at: row.get(7)?,
                        updated_at: row.get(8)?,
                    },
                    consumer_name: row.get(9)?,
                    provider_business_name: row.get(10)?,
                    order_total_amount: row.get(11)?,
                    order_created_at: row.get(12)?,
                })
            })?;
            let mut recent_reviews = Vec::new();
            for row in rows {
                recent_reviews.push(row?);
            }

            // Top customers by paid spend.
            let mut stmt = conn.prepare(&format!(
                "SELECT o.consumer_id, u.name, COUNT(*), \
                        COALESCE(SUM(CASE WHEN o.payment_status = 'paid' \
                                          THEN o.total_amount ELSE 0 END), 0) AS spent, \
                        MAX(o.created_at) \
                 FROM orders o JOIN users u ON u.id = o.consumer_id \
                 WHERE o.provider_id = ?1 AND o.created_at >= ?2 \
                 GROUP BY o.consumer_id ORDER BY spent DESC LIMIT {TOP_N}"
            ))?;
            let rows = stmt.query_map(params![provider_id, since], |row| {
                Ok(TopCustomer {
                    consumer_id: row.get(0)?,
                    name: row.get(1)?,
                    order_count: row.get(2)?,
                    total_spent: row.get(3)?,
                    last_order: row.get(4)?,
                })
            })?;
            let mut top_customers = Vec::new();
            for row in rows {
                top_customers.push(row?);
            }

            Ok(ProviderAnalytics {
                orders_by_day,
                top_items,
                review_stats: ReviewStats {
                    average_rating: average.unwrap_or(0.0),
                    total_reviews: review_count,
                    rating_distribution,
                },
                recent_reviews,
                top_customers,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tiffinhub_core::types::{new_id, now_rfc3339};
    use tiffinhub_core::{PaymentStatus, Review};

    use crate::queries::orders::tests::{make_order, seed_parties};
    use crate::queries::{orders, reviews};

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn admin_dashboard_counts_paid_revenue_only() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;

        let mut paid = make_order(&consumer.id, &provider.id);
        paid.payment_status = PaymentStatus::Paid;
        orders::create_order(&db, &paid).await.unwrap();
        orders::create_order(&db, &make_order(&consumer.id, &provider.id))
            .await
            .unwrap();

        let dashboard = admin_dashboard(&db).await.unwrap();
        assert_eq!(dashboard.total_users, 2);
        assert_eq!(dashboard.total_providers, 1);
        assert_eq!(dashboard.total_orders, 2);
        assert_eq!(dashboard.total_revenue, 200.0);
        assert_eq!(dashboard.recent_orders.len(), 2);
        let confirmed = dashboard
            .orders_by_status
            .iter()
            .find(|s| s.status == "confirmed")
            .unwrap();
        assert_eq!(confirmed.count, 2);
    }

    #[tokio::test]
    async fn provider_dashboard_scopes_to_one_provider() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;
        let mut paid = make_order(&consumer.id, &provider.id);
        paid.payment_status = PaymentStatus::Paid;
        orders::create_order(&db, &paid).await.unwrap();

        let dashboard = provider_dashboard(&db, &provider.id).await.unwrap();
        assert_eq!(dashboard.total_orders, 1);
        assert_eq!(dashboard.total_revenue, 200.0);

        let empty = provider_dashboard(&db, "no-such-provider").await.unwrap();
        assert_eq!(empty.total_orders, 0);
        assert_eq!(empty.total_revenue, 0.0);
    }

    #[tokio::test]
    async fn admin_reports_group_by_month_and_rank_providers() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;
        for _ in 0..3 {
            let mut order = make_order(&consumer.id, &provider.id);
            order.payment_status = PaymentStatus::Paid;
            orders::create_order(&db, &order).await.unwrap();
        }

        let reports = admin_reports(&db, "1970-01-01T00:00:00.000Z").await.unwrap();
        assert_eq!(reports.orders_by_month.len(), 1);
        assert_eq!(reports.orders_by_month[0].orders, 3);
        assert_eq!(reports.orders_by_month[0].revenue, 600.0);

        assert_eq!(reports.top_providers.len(), 1);
        assert_eq!(reports.top_providers[0].revenue, 600.0);

        assert_eq!(reports.revenue_metrics.total_orders, 3);
        assert_eq!(reports.revenue_metrics.total_revenue, 600.0);
        assert_eq!(reports.revenue_metrics.average_order_value, 200.0);

        let share: f64 = reports.orders_by_status.iter().map(|s| s.percentage).sum();
        assert!((share - 100.0).abs() < 1e-9);

        // A future cutoff excludes everything.
        let empty = admin_reports(&db, "2999-01-01T00:00:00.000Z").await.unwrap();
        assert!(empty.orders_by_month.is_empty());
        assert_eq!(empty.revenue_metrics.total_orders, 0);
        assert_eq!(empty.revenue_metrics.average_order_value, 0.0);
    }

    #[tokio::test]
    async fn provider_analytics_unnests_item_snapshots() {
        let (db, _dir) = setup_db().await;
        let (consumer, provider) = seed_parties(&db).await;
        for _ in 0..2 {
            let mut order = make_order(&consumer.id, &provider.id);
            order.payment_status = PaymentStatus::Paid;
            orders::create_order(&db, &order).await.unwrap();
        }

        let order = orders::list_orders(
            &db,
            orders::OrderFilter::default(),
            1,
            1,
            0,
        )
        .await
        .unwrap();
        let order_id = order.items[0].order.id.clone();
        let review = Review {
            id: new_id(),
            consumer_id: consumer.id.clone(),
            provider_id: provider.id.clone(),
            order_id,
            rating: 4,
            comment: None,
            is_verified: true,
            created_at: now_rfc3339(),
            updated_at: now_rfc3339(),
        };
        reviews::create_review(&db, &review).await.unwrap();

        let analytics = provider_analytics(&db, &provider.id, "1970-01-01T00:00:00.000Z")
            .await
            .unwrap();

        assert_eq!(analytics.orders_by_day.len(), 1);
        assert_eq!(analytics.orders_by_day[0].orders, 2);

        // Each seeded order holds 2x Thali at 100.
        assert_eq!(analytics.top_items.len(), 1);
        assert_eq!(analytics.top_items[0].name, "Thali");
        assert_eq!(analytics.top_items[0].quantity, 4);
        assert_eq!(analytics.top_items[0].revenue, 400.0);

        assert_eq!(analytics.review_stats.total_reviews, 1);
        assert_eq!(analytics.review_stats.average_rating, 4.0);
        assert_eq!(analytics.recent_reviews.len(), 1);

        assert_eq!(analytics.top_customers.len(), 1);
        assert_eq!(analytics.top_customers[0].name, "Asha");
        assert_eq!(analytics.top_customers[0].order_count, 2);
        assert_eq!(analytics.top_customers[0].total_spent, 400.0);
    }
}
