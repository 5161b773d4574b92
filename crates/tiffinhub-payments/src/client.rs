// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the payment gateway's order API.
//!
//! The gateway holds funds against an order created here before checkout;
//! the consumer completes payment client-side and the resulting reference
//! triple is verified by [`crate::signature`] at order creation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tiffinhub_core::HubError;

/// Request body for gateway order creation. Amounts are minor units
/// (rupees x 100).
#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    amount: u64,
    currency: String,
    receipt: String,
}

/// A gateway-side order awaiting payment.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Client for the payment gateway's REST API.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl PaymentClient {
    /// Creates a new gateway client with basic-auth credentials.
    pub fn new(key_id: String, key_secret: String, base_url: String) -> Result<Self, HubError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HubError::Payment(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            key_id,
            key_secret,
            base_url,
        })
    }

    /// The key secret, used for signature verification of completed payments.
    pub fn key_secret(&self) -> &str {
        &self.key_secret
    }

    /// Create a gateway order for the given amount.
    ///
    /// `amount` is in major units (rupees); the gateway API takes minor
    /// units, so it is multiplied by 100 here.
    pub async fn create_order(&self, amount: f64, currency: &str) -> Result<GatewayOrder, HubError> {
        let body = CreateOrderRequest {
            amount: (amount * 100.0).round() as u64,
            currency: currency.to_string(),
            receipt: format!("receipt_{}", uuid::Uuid::new_v4()),
        };

        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| HubError::Payment(format!("gateway request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HubError::Payment(format!(
                "gateway order creation failed with {status}: {body}"
            )));
        }

        let order: GatewayOrder = response
            .json()
            .await
            .map_err(|e| HubError::Payment(format!("malformed gateway response: {e}")))?;
        debug!(gateway_order_id = %order.id, amount = order.amount, "gateway order created");
        Ok(order)
    }
}
