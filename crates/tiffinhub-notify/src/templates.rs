// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email and SMS message templates for order events.

/// Display fields for order-event messages. `order_ref` is the short
/// human-facing suffix of the order id.
#[derive(Debug, Clone)]
pub struct OrderMessageData {
    pub order_ref: String,
    pub customer_name: String,
    pub provider_name: String,
    pub total_amount: f64,
    pub delivery_date: String,
}

impl OrderMessageData {
    /// Short order reference: the last 8 characters of the id.
    pub fn order_ref_from_id(id: &str) -> String {
        let chars: Vec<char> = id.chars().collect();
        let start = chars.len().saturating_sub(8);
        chars[start..].iter().collect()
    }
}

/// A rendered email: subject plus HTML and plain-text bodies.
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Order confirmation email sent to the consumer on checkout.
pub fn order_confirmation_email(data: &OrderMessageData) -> EmailContent {
    EmailContent {
        subject: format!("Order Confirmation - {}", data.order_ref),
        html: format!(
            "<h2>Order Confirmed!</h2>\
             <p>Dear {customer},</p>\
             <p>Your order has been confirmed with {provider}.</p>\
             <p><strong>Order ID:</strong> {order}</p>\
             <p><strong>Total Amount:</strong> \u{20b9}{amount}</p>\
             <p><strong>Delivery Date:</strong> {date}</p>\
             <p>You can track your order status in your dashboard.</p>\
             <p>Thank you for choosing TiffinHub!</p>",
            customer = data.customer_name,
            provider = data.provider_name,
            order = data.order_ref,
            amount = data.total_amount,
            date = data.delivery_date,
        ),
        text: format!(
            "Order Confirmed! Your order {} has been confirmed with {}. \
             Total: \u{20b9}{}. Delivery: {}.",
            data.order_ref, data.provider_name, data.total_amount, data.delivery_date
        ),
    }
}

/// Status-update email sent to the consumer when an order moves.
pub fn order_status_update_email(data: &OrderMessageData, status: &str) -> EmailContent {
    EmailContent {
        subject: format!("Order Status Update - {}", data.order_ref),
        html: format!(
            "<h2>Order Status Updated</h2>\
             <p>Dear {customer},</p>\
             <p>Your order status has been updated to: <strong>{status}</strong></p>\
             <p><strong>Order ID:</strong> {order}</p>\
             <p><strong>Provider:</strong> {provider}</p>\
             <p>Track your order in your dashboard for more details.</p>\
             <p>Thank you for choosing TiffinHub!</p>",
            customer = data.customer_name,
            order = data.order_ref,
            provider = data.provider_name,
        ),
        text: format!(
            "Order Status Update: Your order {} status is now {status}.",
            data.order_ref
        ),
    }
}

/// Order confirmation SMS.
pub fn order_confirmation_sms(data: &OrderMessageData) -> String {
    format!(
        "TiffinHub: Order {} confirmed! Total: \u{20b9}{}. Delivery: {}. Track in app.",
        data.order_ref, data.total_amount, data.delivery_date
    )
}

/// Status-update SMS.
pub fn order_status_update_sms(data: &OrderMessageData, status: &str) -> String {
    format!(
        "TiffinHub: Order {} status updated to {status}. Check app for details.",
        data.order_ref
    )
}
