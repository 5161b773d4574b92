// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain entities and shared types.
//!
//! Entities mirror the persisted collections one-to-one. Timestamps are
//! RFC 3339 UTC strings (`%Y-%m-%dT%H:%M:%fZ`), identifiers are UUIDv4
//! strings. List-valued and blob-valued fields are serialized to JSON TEXT
//! columns by the storage layer.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Current UTC time as an RFC 3339 string with millisecond precision.
///
/// Matches the `strftime('%Y-%m-%dT%H:%M:%fZ', 'now')` stamps the storage
/// layer writes on update, so timestamps sort lexicographically.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Generate a fresh UUIDv4 record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// User role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    Provider,
    Consumer,
}

/// Order status state machine:
/// `pending -> confirmed -> preparing -> ready -> delivered`, with
/// `cancelled` reachable from any non-terminal state. `delivered` and
/// `cancelled` are terminal. See [`crate::lifecycle`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

/// Payment status on an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Menu item category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MenuCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
    Beverages,
}

/// Notification type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    Order,
    Payment,
    System,
    Promotion,
}

/// Help request type, determining routing and visibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HelpKind {
    AdminSupport,
    ProviderSupport,
    ConsumerToProvider,
}

/// Help request status. Any value can be set by an authorized party;
/// `resolved` additionally stamps resolution metadata.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HelpStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// Help request priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HelpPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Help request category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HelpCategory {
    Technical,
    Billing,
    Order,
    Account,
    General,
}

/// Request-scoped identity, populated once by the gateway middleware after
/// credential verification and passed to every handler as an extension.
/// Replaces the trusted-header convention of the upstream gateway design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub token_version: i64,
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique, stored lowercased.
    pub email: String,
    /// Argon2id PHC string. Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    /// ServiceProvider ids favorited by a consumer.
    pub favorites: Vec<String>,
    /// Free-form per-user settings blob.
    pub settings: Option<serde_json::Value>,
    /// Monotonic counter; incrementing it invalidates all issued sessions.
    pub token_version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            name,
            email: email.to_lowercase(),
            password_hash,
            role,
            phone: None,
            address: None,
            is_active: true,
            favorites: Vec::new(),
            settings: None,
            token_version: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Daily operating window as `HH:MM` time-of-day strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub start: String,
    pub end: String,
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            start: "09:00".to_string(),
            end: "21:00".to_string(),
        }
    }
}

/// A provider's business profile, 1:1 with its owning [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: String,
    pub user_id: String,
    pub business_name: String,
    pub description: Option<String>,
    pub cuisine: Vec<String>,
    pub delivery_areas: Vec<String>,
    /// Mean of all review ratings, rounded to one decimal. Derived.
    pub rating: f64,
    /// Count of orders placed against this provider. Derived.
    pub total_orders: i64,
    pub is_verified: bool,
    pub is_active: bool,
    pub operating_hours: OperatingHours,
    pub created_at: String,
    pub updated_at: String,
}

impl ServiceProvider {
    pub fn new(user_id: String, business_name: String) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            user_id,
            business_name,
            description: None,
            cuisine: Vec::new(),
            delivery_areas: Vec::new(),
            rating: 0.0,
            total_orders: 0,
            is_verified: false,
            is_active: true,
            operating_hours: OperatingHours::default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A dish on a menu. Embedded in [`Menu::items`], mutated individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub item_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: MenuCategory,
    pub is_vegetarian: bool,
    pub is_available: bool,
    pub image_url: Option<String>,
}

/// A provider-owned menu with an ordered item list and validity window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    /// References [`ServiceProvider::id`].
    pub provider_id: String,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<MenuItem>,
    pub valid_from: String,
    pub valid_to: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Order line snapshot. Name and price are frozen at order time and
/// decoupled from the live menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Sum of `price * quantity` over a snapshot item list.
pub fn snapshot_total(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|i| i.price * f64::from(i.quantity))
        .sum()
}

/// A placed order. Never deleted (audit trail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub consumer_id: String,
    /// References [`ServiceProvider::id`].
    pub provider_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub delivery_address: String,
    pub delivery_date: String,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A consumer's rating of a provider, tied to one completed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub consumer_id: String,
    pub provider_id: String,
    pub order_id: String,
    /// 1 through 5.
    pub rating: i64,
    pub comment: Option<String>,
    pub is_verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// An in-app notification record. Mutated only by flipping `is_read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    /// Opaque payload for the presentation layer (order ids and the like).
    pub data: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl Notification {
    pub fn new(
        user_id: String,
        title: String,
        message: String,
        kind: NotificationKind,
        data: Option<serde_json::Value>,
    ) -> Self {
        let now = now_rfc3339();
        Self {
            id: new_id(),
            user_id,
            title,
            message,
            kind,
            is_read: false,
            data,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// One message appended to a help-request thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpResponse {
    pub user_id: String,
    pub message: String,
    pub timestamp: String,
    pub is_admin: bool,
}

/// A help-desk ticket with an append-only response log. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: String,
    pub from_user_id: String,
    /// Explicit recipient for consumer-to-provider threads; `None` for
    /// admin-routed types (all admins are implicit recipients).
    pub to_user_id: Option<String>,
    pub kind: HelpKind,
    pub subject: String,
    pub message: String,
    pub status: HelpStatus,
    pub priority: HelpPriority,
    pub category: HelpCategory,
    pub responses: Vec<HelpResponse>,
    pub resolved_at: Option<String>,
    pub resolved_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One page of a listing.
///
/// Contract: 1-based `page` and `limit` inputs produce the remainder on the
/// final page and zero items past it.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub item_count: usize,
    pub total_records: u64,
}

impl<T> Page<T> {
    /// Assemble a page from a fetched slice and the total record count.
    pub fn new(items: Vec<T>, page: u32, limit: u32, total_records: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_records.div_ceil(u64::from(limit)) as u32;
        Self {
            item_count: items.len(),
            items,
            current_page: page.max(1),
            total_pages,
            total_records,
        }
    }
}

/// Normalize raw pagination inputs and compute the row offset.
///
/// Pages are 1-based; a zero or missing value falls back to the defaults.
pub fn page_window(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> (u32, u32, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).max(1);
    let offset = u64::from(page - 1) * u64::from(limit);
    (page, limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Admin, Role::Provider, Role::Consumer] {
            let s = role.to_string();
            assert_eq!(s.parse::<Role>().unwrap(), role);
        }
        assert_eq!("consumer".parse::<Role>().unwrap(), Role::Consumer);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn statuses_serialize_snake_case() {
        assert_eq!(OrderStatus::Preparing.to_string(), "preparing");
        assert_eq!(HelpKind::AdminSupport.to_string(), "admin_support");
        assert_eq!(HelpKind::ConsumerToProvider.to_string(), "consumer_to_provider");
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn snapshot_total_sums_lines() {
        let items = vec![
            OrderItem {
                item_id: "a".into(),
                name: "Dal".into(),
                price: 100.0,
                quantity: 2,
            },
            OrderItem {
                item_id: "b".into(),
                name: "Rice".into(),
                price: 50.0,
                quantity: 1,
            },
        ];
        assert!((snapshot_total(&items) - 250.0).abs() < f64::EPSILON);
        assert_eq!(snapshot_total(&[]), 0.0);
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User::new(
            "Asha".into(),
            "Asha@Example.com".into(),
            "$argon2id$fake".into(),
            Role::Consumer,
        );
        assert_eq!(user.email, "asha@example.com");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn page_window_defaults_and_offsets() {
        assert_eq!(page_window(None, None, 10), (1, 10, 0));
        assert_eq!(page_window(Some(3), Some(20), 10), (3, 20, 40));
        assert_eq!(page_window(Some(0), Some(0), 10), (1, 1, 0));
    }

    #[test]
    fn page_total_pages_rounds_up() {
        let p = Page::new(vec![1, 2, 3], 1, 3, 7);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.item_count, 3);
        let empty: Page<i32> = Page::new(vec![], 1, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }

    proptest! {
        // For limit L and total T, page ceil(T/L) holds the remainder
        // (T mod L, or L when it divides evenly) and later pages are empty.
        #[test]
        fn last_page_holds_remainder(total in 0u64..5_000, limit in 1u32..50) {
            let rows_on = |page: u32| -> u64 {
                let offset = u64::from(page - 1) * u64::from(limit);
                total.saturating_sub(offset).min(u64::from(limit))
            };
            let total_pages = total.div_ceil(u64::from(limit)) as u32;
            if total > 0 {
                let expected = if total % u64::from(limit) == 0 {
                    u64::from(limit)
                } else {
                    total % u64::from(limit)
                };
                prop_assert_eq!(rows_on(total_pages), expected);
            }
            prop_assert_eq!(rows_on(total_pages + 1), 0);
            let p = Page::new(Vec::<u8>::new(), 1, limit, total);
            prop_assert_eq!(p.total_pages, total_pages);
        }
    }
}
