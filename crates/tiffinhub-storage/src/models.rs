// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical entities are defined in `tiffinhub_core::types`; this
//! module re-exports them and adds the joined read-model projections the
//! listing queries return. Projections are shallow: display fields of the
//! referenced records, never the full records.

use serde::Serialize;

pub use tiffinhub_core::types::{
    HelpRequest, HelpResponse, Menu, MenuItem, Notification, Order, OrderItem, Review,
    ServiceProvider, User,
};

/// A provider with its owning user's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderWithOwner {
    #[serde(flatten)]
    pub provider: ServiceProvider,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_phone: Option<String>,
}

/// An order with both parties' display fields.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithParties {
    #[serde(flatten)]
    pub order: Order,
    pub consumer_name: String,
    pub consumer_email: String,
    pub provider_business_name: String,
    pub provider_owner_name: String,
}

/// A review with reviewer, provider, and order display fields.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithParties {
    #[serde(flatten)]
    pub review: Review,
    pub consumer_name: String,
    pub provider_business_name: String,
    pub order_total_amount: f64,
    pub order_created_at: String,
}

/// A help request with both participants' display fields.
#[derive(Debug, Clone, Serialize)]
pub struct HelpRequestWithParties {
    #[serde(flatten)]
    pub request: HelpRequest,
    pub from_name: String,
    pub from_email: String,
    pub from_role: String,
    pub to_name: Option<String>,
    pub to_email: Option<String>,
    pub to_role: Option<String>,
}

/// Count of orders in one status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Count of orders in one status with its share of the total.
#[derive(Debug, Clone, Serialize)]
pub struct StatusShare {
    pub status: String,
    pub count: i64,
    pub percentage: f64,
}

/// Orders and paid revenue in one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyOrders {
    pub month: String,
    pub orders: i64,
    pub revenue: f64,
}

/// Orders and paid revenue on one calendar day (`YYYY-MM-DD`).
#[derive(Debug, Clone, Serialize)]
pub struct DailyOrders {
    pub date: String,
    pub orders: i64,
    pub revenue: f64,
}

/// One provider ranked by paid revenue.
#[derive(Debug, Clone, Serialize)]
pub struct TopProvider {
    pub provider_id: String,
    pub name: String,
    pub orders: i64,
    pub revenue: f64,
}

/// One menu item ranked by quantity sold.
#[derive(Debug, Clone, Serialize)]
pub struct TopItem {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// One customer ranked by paid spend.
#[derive(Debug, Clone, Serialize)]
pub struct TopCustomer {
    pub consumer_id: String,
    pub name: String,
    pub order_count: i64,
    pub total_spent: f64,
    pub last_order: String,
}

/// Registrations in one calendar month, split by role.
#[derive(Debug, Clone, Serialize)]
pub struct UserGrowthRow {
    pub month: String,
    pub users: i64,
    pub providers: i64,
    pub consumers: i64,
}

/// Revenue rollup over a report range.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueMetrics {
    pub total_revenue: f64,
    pub total_orders: i64,
    pub average_order_value: f64,
}

/// Review count in one rating bucket (1 through 5).
#[derive(Debug, Clone, Serialize)]
pub struct RatingBucket {
    pub rating: i64,
    pub count: i64,
}

/// Aggregate review statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewStats {
    pub average_rating: f64,
    pub total_reviews: i64,
    pub rating_distribution: Vec<RatingBucket>,
}

/// Admin dashboard rollup.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub total_users: i64,
    pub total_providers: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub orders_by_status: Vec<StatusCount>,
    pub recent_orders: Vec<OrderWithParties>,
}

/// Provider dashboard rollup.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDashboard {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub orders_by_status: Vec<StatusCount>,
    pub recent_orders: Vec<OrderWithParties>,
}

/// Admin report bundle over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct AdminReports {
    pub orders_by_month: Vec<MonthlyOrders>,
    pub orders_by_status: Vec<StatusShare>,
    pub top_providers: Vec<TopProvider>,
    pub user_growth: Vec<UserGrowthRow>,
    pub revenue_metrics: RevenueMetrics,
}

/// Provider analytics bundle over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderAnalytics {
    pub orders_by_day: Vec<DailyOrders>,
    pub top_items: Vec<TopItem>,
    pub review_stats: ReviewStats,
    pub recent_reviews: Vec<ReviewWithParties>,
    pub top_customers: Vec<TopCustomer>,
}
