// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order lifecycle handlers: creation with payment verification and
//! notification fan-out, role-scoped listing, and status transitions.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use tiffinhub_core::lifecycle::authorize_transition;
use tiffinhub_core::types::{new_id, now_rfc3339, page_window, snapshot_total};
use tiffinhub_core::{
    HubError, Identity, Notification, NotificationKind, Order, OrderItem, OrderStatus,
    PaymentStatus, Role,
};
use tiffinhub_notify::OrderMessageData;
use tiffinhub_payments::{PaymentReference, verify_payment_signature};
use tiffinhub_storage::models::{OrderWithParties, ProviderWithOwner};
use tiffinhub_storage::queries::orders::{self, OrderFilter};
use tiffinhub_storage::queries::{notifications, providers, users};

use crate::error::ApiResult;
use crate::handlers::{PageInfo, require_own_provider};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Payment method routed through the external gateway; every other method
/// (cash on delivery and the like) starts with payment pending.
const GATEWAY_METHOD: &str = "razorpay";

/// Acceptable drift between the client total and the snapshot sum.
const TOTAL_EPSILON: f64 = 0.01;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderWithParties>,
    pub pagination: PageInfo,
}

/// GET /api/orders
///
/// Consumers see their own orders, providers their kitchen's, admins all.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Json<OrderListResponse>> {
    let mut filter = OrderFilter {
        status: query.status,
        ..Default::default()
    };
    match identity.role {
        Role::Consumer => filter.consumer_id = Some(identity.user_id.clone()),
        Role::Provider => {
            let provider = require_own_provider(&state, &identity).await?;
            filter.provider_id = Some(provider.id);
        }
        Role::Admin => {}
    }

    let (page, limit, offset) = page_window(query.page, query.limit, DEFAULT_PAGE_SIZE);
    let result = orders::list_orders(&state.db, filter, page, limit, offset).await?;
    Ok(Json(OrderListResponse {
        pagination: PageInfo::of(&result),
        orders: result.items,
    }))
}

/// Request body for POST /api/orders. Items carry the client's cart
/// snapshot; the total must match it.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub provider_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub delivery_address: String,
    pub delivery_date: String,
    pub payment_method: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Reference triple from the gateway checkout; required when
    /// payment_method is the gateway.
    #[serde(default)]
    pub payment: Option<PaymentReference>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: String,
    pub order: Order,
}

fn validate_items(items: &[OrderItem], total_amount: f64) -> Result<(), HubError> {
    if items.is_empty() {
        return Err(HubError::Validation("order must contain at least one item".to_string()));
    }
    for item in items {
        if item.quantity == 0 {
            return Err(HubError::Validation(format!(
                "item {} has zero quantity",
                item.name
            )));
        }
        if item.price < 0.0 {
            return Err(HubError::Validation(format!(
                "item {} has a negative price",
                item.name
            )));
        }
    }
    let computed = snapshot_total(items);
    if (computed - total_amount).abs() > TOTAL_EPSILON {
        return Err(HubError::Validation(format!(
            "total amount {total_amount} does not match item total {computed}"
        )));
    }
    Ok(())
}

/// POST /api/orders (consumer only)
///
/// Gateway payments are verified before anything persists; a signature
/// mismatch rejects the request with no order row. In-app notifications
/// and the email/SMS side channels are best-effort: their failure never
/// rolls back or fails the order.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    if identity.role != Role::Consumer {
        return Err(HubError::Forbidden("only consumers can place orders".to_string()).into());
    }
    if body.delivery_address.trim().is_empty() {
        return Err(HubError::Validation("delivery address is required".to_string()).into());
    }
    validate_items(&body.items, body.total_amount)?;

    let provider = providers::get_provider_with_owner(&state.db, &body.provider_id)
        .await?
        .ok_or_else(|| HubError::NotFound("provider not found".to_string()))?;

    let payment_status = if body.payment_method == GATEWAY_METHOD {
        let client = state
            .payments
            .as_ref()
            .ok_or_else(|| HubError::Payment("payment gateway is not configured".to_string()))?;
        let reference = body
            .payment
            .as_ref()
            .ok_or_else(|| HubError::Validation("payment reference is required".to_string()))?;
        if !verify_payment_signature(
            client.key_secret(),
            &reference.order_id,
            &reference.payment_id,
            &reference.signature,
        ) {
            return Err(HubError::Payment("invalid payment signature".to_string()).into());
        }
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    };

    let status = if state.auto_confirm {
        OrderStatus::Confirmed
    } else {
        OrderStatus::Pending
    };

    let now = now_rfc3339();
    let order = Order {
        id: new_id(),
        consumer_id: identity.user_id.clone(),
        provider_id: provider.provider.id.clone(),
        items: body.items,
        total_amount: body.total_amount,
        status,
        delivery_address: body.delivery_address,
        delivery_date: body.delivery_date,
        payment_status,
        payment_method: body.payment_method,
        notes: body.notes,
        created_at: now.clone(),
        updated_at: now,
    };
    orders::create_order(&state.db, &order).await?;

    // Fan-out past this point is best-effort: the order row is committed
    // and stays committed.
    fan_out_order_created(&state, &identity, &provider, &order).await;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "order placed successfully".to_string(),
            order,
        }),
    ))
}

async fn fan_out_order_created(
    state: &AppState,
    identity: &Identity,
    provider: &ProviderWithOwner,
    order: &Order,
) {
    let consumer = match users::get_user(&state.db, &identity.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, order_id = %order.id, "order fan-out skipped");
            return;
        }
    };

    let records = vec![
        Notification::new(
            consumer.id.clone(),
            "Order Confirmed".to_string(),
            format!(
                "Your order from {} has been confirmed.",
                provider.provider.business_name
            ),
            NotificationKind::Order,
            Some(serde_json::json!({
                "order_id": order.id,
                "provider_id": order.provider_id,
            })),
        ),
        Notification::new(
            provider.provider.user_id.clone(),
            "New Order Received".to_string(),
            format!("You have received a new order from {}.", consumer.name),
            NotificationKind::Order,
            Some(serde_json::json!({
                "order_id": order.id,
                "consumer_id": consumer.id,
            })),
        ),
    ];
    if let Err(e) = notifications::create_notifications(&state.db, records).await {
        warn!(error = %e, order_id = %order.id, "order notifications not recorded");
    }

    let data = OrderMessageData {
        order_ref: OrderMessageData::order_ref_from_id(&order.id),
        customer_name: consumer.name.clone(),
        provider_name: provider.provider.business_name.clone(),
        total_amount: order.total_amount,
        delivery_date: order.delivery_date.clone(),
    };
    state
        .notifier
        .order_confirmation(&consumer.email, consumer.phone.as_deref(), &data)
        .await;
}

/// Request body for POST /api/payments/order.
#[derive(Debug, Deserialize)]
pub struct GatewayOrderRequest {
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Serialize)]
pub struct GatewayOrderResponse {
    pub gateway_order_id: String,
    pub amount: u64,
    pub currency: String,
}

/// POST /api/payments/order (consumer only)
///
/// Creates the gateway-side order the client pays against; checkout then
/// posts the resulting reference triple to POST /api/orders.
pub async fn create_gateway_order(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<GatewayOrderRequest>,
) -> ApiResult<Json<GatewayOrderResponse>> {
    if identity.role != Role::Consumer {
        return Err(HubError::Forbidden("only consumers can place orders".to_string()).into());
    }
    if body.amount <= 0.0 {
        return Err(HubError::Validation("amount must be positive".to_string()).into());
    }
    let client = state
        .payments
        .as_ref()
        .ok_or_else(|| HubError::Payment("payment gateway is not configured".to_string()))?;
    let order = client.create_order(body.amount, &body.currency).await?;
    Ok(Json(GatewayOrderResponse {
        gateway_order_id: order.id,
        amount: order.amount,
        currency: order.currency,
    }))
}

/// Request body for PATCH /api/orders/{id}/status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PATCH /api/orders/{id}/status
///
/// Caller must be the order's consumer, its provider, or an admin; the
/// transition must be allowed for the role. Admin transitions notify both
/// parties; self-service transitions only persist.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let order = orders::get_order(&state.db, &id)
        .await?
        .ok_or_else(|| HubError::NotFound("order not found".to_string()))?;

    match identity.role {
        Role::Admin => {}
        Role::Consumer => {
            if order.consumer_id != identity.user_id {
                return Err(
                    HubError::Forbidden("order belongs to another consumer".to_string()).into(),
                );
            }
        }
        Role::Provider => {
            let provider = require_own_provider(&state, &identity).await?;
            if order.provider_id != provider.id {
                return Err(
                    HubError::Forbidden("order belongs to another provider".to_string()).into(),
                );
            }
        }
    }

    authorize_transition(identity.role, order.status, body.status)?;

    let updated = orders::update_status(&state.db, &id, body.status)
        .await?
        .ok_or_else(|| HubError::NotFound("order not found".to_string()))?;

    if identity.role == Role::Admin {
        fan_out_admin_transition(&state, &updated).await;
    }

    Ok(Json(OrderResponse {
        message: "order status updated".to_string(),
        order: updated,
    }))
}

async fn fan_out_admin_transition(state: &AppState, order: &Order) {
    let provider = match providers::get_provider(&state.db, &order.provider_id).await {
        Ok(Some(provider)) => provider,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, order_id = %order.id, "transition fan-out skipped");
            return;
        }
    };
    let order_ref = OrderMessageData::order_ref_from_id(&order.id);
    let records = vec![
        Notification::new(
            order.consumer_id.clone(),
            "Order Status Updated".to_string(),
            format!(
                "Your order status has been updated to {} by admin.",
                order.status
            ),
            NotificationKind::Order,
            Some(serde_json::json!({
                "order_id": order.id,
                "status": order.status,
            })),
        ),
        Notification::new(
            provider.user_id,
            "Order Status Updated".to_string(),
            format!(
                "Order {} status updated to {} by admin.",
                order_ref, order.status
            ),
            NotificationKind::Order,
            Some(serde_json::json!({
                "order_id": order.id,
                "status": order.status,
            })),
        ),
    ];
    if let Err(e) = notifications::create_notifications(&state.db, records).await {
        warn!(error = %e, order_id = %order.id, "transition notifications not recorded");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;
    use tempfile::tempdir;
    use tiffinhub_auth::SessionSigner;
    use tiffinhub_core::{ServiceProvider, User};
    use tiffinhub_notify::Notifier;
    use tiffinhub_payments::PaymentClient;
    use tiffinhub_storage::Database;

    const TEST_KEY_SECRET: &str = "rzp_test_secret";

    async fn test_state(with_payments: bool) -> (AppState, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("orders.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let payments = with_payments.then(|| {
            PaymentClient::new(
                "rzp_test_key".into(),
                TEST_KEY_SECRET.into(),
                "https://gateway.invalid".into(),
            )
            .unwrap()
        });
        let state = AppState {
            db,
            signer: SessionSigner::new(b"orders-handler-test-secret-of-length", 7),
            payments,
            notifier: Arc::new(Notifier::disabled()),
            auto_confirm: true,
            cookie_secure: false,
        };
        (state, dir)
    }

    async fn seed_parties(state: &AppState) -> (User, User, ServiceProvider) {
        let consumer = User::new("Asha".into(), "asha@x.com".into(), "$h".into(), Role::Consumer);
        users::create_user(&state.db, &consumer).await.unwrap();
        let owner = User::new("Ravi".into(), "ravi@x.com".into(), "$h".into(), Role::Provider);
        users::create_user(&state.db, &owner).await.unwrap();
        let provider = ServiceProvider::new(owner.id.clone(), "Ravi's Kitchen".into());
        providers::create_provider(&state.db, &provider).await.unwrap();
        (consumer, owner, provider)
    }

    fn identity_of(user: &User) -> Identity {
        Identity {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            token_version: user.token_version,
        }
    }

    fn cart() -> Vec<OrderItem> {
        vec![OrderItem {
            item_id: "item-1".into(),
            name: "Thali".into(),
            price: 100.0,
            quantity: 2,
        }]
    }

    fn order_body(provider_id: &str, method: &str, payment: Option<PaymentReference>) -> CreateOrderRequest {
        CreateOrderRequest {
            provider_id: provider_id.to_string(),
            items: cart(),
            total_amount: 200.0,
            delivery_address: "12 MG Road".into(),
            delivery_date: "2026-08-10".into(),
            payment_method: method.to_string(),
            notes: None,
            payment,
        }
    }

    fn sign(order_id: &str, payment_id: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(TEST_KEY_SECRET.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn unread_count(state: &AppState, user_id: &str) -> u64 {
        let (_, unread) = notifications::list_for_user(&state.db, user_id, false, 1, 50, 0)
            .await
            .unwrap();
        unread
    }

    #[tokio::test]
    async fn cod_order_confirms_with_pending_payment_and_two_notifications() {
        let (state, _dir) = test_state(false).await;
        let (consumer, owner, provider) = seed_parties(&state).await;

        let (status, Json(response)) = create(
            State(state.clone()),
            Extension(identity_of(&consumer)),
            Json(order_body(&provider.id, "cod", None)),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.order.status, OrderStatus::Confirmed);
        assert_eq!(response.order.payment_status, PaymentStatus::Pending);
        assert_eq!(response.order.total_amount, 200.0);

        // One notification for each party, none for anyone else.
        assert_eq!(unread_count(&state, &consumer.id).await, 1);
        assert_eq!(unread_count(&state, &owner.id).await, 1);

        let persisted = orders::get_order(&state.db, &response.order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(persisted.consumer_id, consumer.id);
    }

    #[tokio::test]
    async fn tampered_gateway_signature_rejects_without_persisting() {
        let (state, _dir) = test_state(true).await;
        let (consumer, owner, provider) = seed_parties(&state).await;

        let payment = PaymentReference {
            order_id: "order_x".into(),
            payment_id: "pay_y".into(),
            signature: "0badbadbadbadbadbadbadbadbadbadbadbadbadbadbadbadbadbadbadbadbad".into(),
        };
        let err = create(
            State(state.clone()),
            Extension(identity_of(&consumer)),
            Json(order_body(&provider.id, GATEWAY_METHOD, Some(payment))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err.0, HubError::Payment(_)));

        let listed = orders::list_orders(&state.db, OrderFilter::default(), 1, 10, 0)
            .await
            .unwrap();
        assert_eq!(listed.total_records, 0, "no order row persisted");
        assert_eq!(unread_count(&state, &consumer.id).await, 0);
        assert_eq!(unread_count(&state, &owner.id).await, 0);
    }

    #[tokio::test]
    async fn valid_gateway_signature_marks_the_order_paid() {
        let (state, _dir) = test_state(true).await;
        let (consumer, owner, provider) = seed_parties(&state).await;

        let payment = PaymentReference {
            order_id: "order_x".into(),
            payment_id: "pay_y".into(),
            signature: sign("order_x", "pay_y"),
        };
        let (status, Json(response)) = create(
            State(state.clone()),
            Extension(identity_of(&consumer)),
            Json(order_body(&provider.id, GATEWAY_METHOD, Some(payment))),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.order.payment_status, PaymentStatus::Paid);
        assert_eq!(unread_count(&state, &consumer.id).await, 1);
        assert_eq!(unread_count(&state, &owner.id).await, 1);
    }

    #[tokio::test]
    async fn auto_confirm_off_leaves_orders_pending() {
        let (mut_state, _dir) = test_state(false).await;
        let state = AppState {
            auto_confirm: false,
            ..mut_state
        };
        let (consumer, _owner, provider) = seed_parties(&state).await;

        let (_, Json(response)) = create(
            State(state.clone()),
            Extension(identity_of(&consumer)),
            Json(order_body(&provider.id, "cod", None)),
        )
        .await
        .unwrap();
        assert_eq!(response.order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn only_consumers_place_orders() {
        let (state, _dir) = test_state(false).await;
        let (_consumer, owner, provider) = seed_parties(&state).await;

        let err = create(
            State(state.clone()),
            Extension(identity_of(&owner)),
            Json(order_body(&provider.id, "cod", None)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err.0, HubError::Forbidden(_)));
    }

    #[tokio::test]
    async fn transition_matrix_enforces_ownership_and_roles() {
        let (state, _dir) = test_state(false).await;
        let (consumer, owner, provider) = seed_parties(&state).await;
        let (_, Json(created)) = create(
            State(state.clone()),
            Extension(identity_of(&consumer)),
            Json(order_body(&provider.id, "cod", None)),
        )
        .await
        .unwrap();
        let order_id = created.order.id.clone();

        // A different consumer cannot touch the order.
        let stranger = User::new("Meera".into(), "meera@x.com".into(), "$h".into(), Role::Consumer);
        users::create_user(&state.db, &stranger).await.unwrap();
        let err = update_status(
            State(state.clone()),
            Extension(identity_of(&stranger)),
            Path(order_id.clone()),
            Json(UpdateStatusRequest {
                status: OrderStatus::Cancelled,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err.0, HubError::Forbidden(_)));

        // The owning consumer cannot drive fulfilment.
        let err = update_status(
            State(state.clone()),
            Extension(identity_of(&consumer)),
            Path(order_id.clone()),
            Json(UpdateStatusRequest {
                status: OrderStatus::Preparing,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err.0, HubError::Forbidden(_)));

        // A different provider cannot drive it either.
        let other_owner = User::new("Sita".into(), "sita@x.com".into(), "$h".into(), Role::Provider);
        users::create_user(&state.db, &other_owner).await.unwrap();
        let other_provider = ServiceProvider::new(other_owner.id.clone(), "Other".into());
        providers::create_provider(&state.db, &other_provider).await.unwrap();
        let err = update_status(
            State(state.clone()),
            Extension(identity_of(&other_owner)),
            Path(order_id.clone()),
            Json(UpdateStatusRequest {
                status: OrderStatus::Preparing,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err.0, HubError::Forbidden(_)));

        // The order's provider follows the graph.
        let Json(updated) = update_status(
            State(state.clone()),
            Extension(identity_of(&owner)),
            Path(order_id.clone()),
            Json(UpdateStatusRequest {
                status: OrderStatus::Preparing,
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.order.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn admin_transition_notifies_both_parties() {
        let (state, _dir) = test_state(false).await;
        let (consumer, owner, provider) = seed_parties(&state).await;
        let (_, Json(created)) = create(
            State(state.clone()),
            Extension(identity_of(&consumer)),
            Json(order_body(&provider.id, "cod", None)),
        )
        .await
        .unwrap();

        let admin = User::new("Root".into(), "root@x.com".into(), "$h".into(), Role::Admin);
        users::create_user(&state.db, &admin).await.unwrap();

        let consumer_before = unread_count(&state, &consumer.id).await;
        let owner_before = unread_count(&state, &owner.id).await;

        let Json(updated) = update_status(
            State(state.clone()),
            Extension(identity_of(&admin)),
            Path(created.order.id.clone()),
            Json(UpdateStatusRequest {
                status: OrderStatus::Preparing,
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.order.status, OrderStatus::Preparing);
        assert_eq!(unread_count(&state, &consumer.id).await, consumer_before + 1);
        assert_eq!(unread_count(&state, &owner.id).await, owner_before + 1);
    }

    fn item(price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            item_id: "item-1".into(),
            name: "Thali".into(),
            price,
            quantity,
        }
    }

    #[test]
    fn matching_total_passes_validation() {
        assert!(validate_items(&[item(100.0, 2)], 200.0).is_ok());
    }

    #[test]
    fn mismatched_total_is_rejected() {
        let err = validate_items(&[item(100.0, 2)], 250.0).unwrap_err();
        assert!(matches!(err, HubError::Validation(_)));
    }

    #[test]
    fn empty_cart_and_bad_lines_are_rejected() {
        assert!(validate_items(&[], 0.0).is_err());
        assert!(validate_items(&[item(100.0, 0)], 0.0).is_err());
        assert!(validate_items(&[item(-1.0, 1)], -1.0).is_err());
    }

    #[test]
    fn fractional_totals_tolerate_rounding_noise() {
        assert!(validate_items(&[item(33.33, 3)], 99.99).is_ok());
        assert!(validate_items(&[item(33.33, 3)], 99.994).is_ok());
    }

    #[test]
    fn create_request_parses_gateway_payment_block() {
        let json = r#"{
            "provider_id": "prov-1",
            "items": [{"item_id": "i1", "name": "Thali", "price": 100.0, "quantity": 2}],
            "total_amount": 200.0,
            "delivery_address": "12 MG Road",
            "delivery_date": "2026-08-10",
            "payment_method": "razorpay",
            "payment": {
                "order_id": "order_x",
                "payment_id": "pay_y",
                "signature": "deadbeef"
            }
        }"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.payment_method, GATEWAY_METHOD);
        assert_eq!(req.payment.unwrap().payment_id, "pay_y");
    }

    #[test]
    fn create_request_without_payment_block_is_cod() {
        let json = r#"{
            "provider_id": "prov-1",
            "items": [{"item_id": "i1", "name": "Thali", "price": 100.0, "quantity": 2}],
            "total_amount": 200.0,
            "delivery_address": "12 MG Road",
            "delivery_date": "2026-08-10",
            "payment_method": "cod"
        }"#;
        let req: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert!(req.payment.is_none());
        assert!(req.notes.is_none());
    }
}
