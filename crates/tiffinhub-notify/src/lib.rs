// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Side-channel notification dispatch for TiffinHub.
//!
//! Durable in-app notifications are storage records created by the domain
//! handlers; this crate covers the email and SMS side channels. Dispatch is
//! best-effort and fire-and-forget relative to the primary transaction:
//! failures are logged as structured warn events and swallowed, never
//! propagated and never retried.

pub mod email;
pub mod sms;
pub mod templates;

use tracing::warn;

use tiffinhub_config::model::{EmailConfig, SmsConfig};
use tiffinhub_core::HubError;

pub use email::EmailChannel;
pub use sms::SmsChannel;
pub use templates::{EmailContent, OrderMessageData};

/// Facade over the configured side channels. Channels whose credentials
/// are absent from the config are disabled and silently skipped.
pub struct Notifier {
    email: Option<EmailChannel>,
    sms: Option<SmsChannel>,
}

impl Notifier {
    /// Build the notifier from the email and sms config sections.
    pub fn from_config(email: &EmailConfig, sms: &SmsConfig) -> Result<Self, HubError> {
        let email_channel = match (&email.smtp_host, &email.sender_email) {
            (Some(host), Some(sender)) => Some(EmailChannel::new(
                host,
                email.smtp_username.clone(),
                email.smtp_password.clone(),
                &email.sender_name,
                sender,
            )?),
            _ => None,
        };
        let sms_channel = match (&sms.account_sid, &sms.auth_token, &sms.from_number) {
            (Some(sid), Some(token), Some(from)) => Some(SmsChannel::new(
                sid.clone(),
                token.clone(),
                from.clone(),
                sms.base_url.clone(),
            )?),
            _ => None,
        };
        Ok(Self {
            email: email_channel,
            sms: sms_channel,
        })
    }

    /// A notifier with every channel disabled (tests, minimal deployments).
    pub fn disabled() -> Self {
        Self {
            email: None,
            sms: None,
        }
    }

    /// Order confirmation to the consumer: email always, SMS when a phone
    /// number is on file. Best-effort on every channel.
    pub async fn order_confirmation(
        &self,
        consumer_email: &str,
        consumer_phone: Option<&str>,
        data: &OrderMessageData,
    ) {
        if let Some(email) = &self.email {
            let content = templates::order_confirmation_email(data);
            if let Err(e) = email
                .send(consumer_email, &content.subject, &content.html, &content.text)
                .await
            {
                warn!(channel = "email", event = "order_confirmation", error = %e,
                      "notification dispatch failed");
            }
        }
        if let (Some(sms), Some(phone)) = (&self.sms, consumer_phone) {
            if let Err(e) = sms.send(phone, &templates::order_confirmation_sms(data)).await {
                warn!(channel = "sms", event = "order_confirmation", error = %e,
                      "notification dispatch failed");
            }
        }
    }

    /// Status-update message to the consumer. Best-effort on every channel.
    pub async fn order_status_update(
        &self,
        consumer_email: &str,
        consumer_phone: Option<&str>,
        data: &OrderMessageData,
        status: &str,
    ) {
        if let Some(email) = &self.email {
            let content = templates::order_status_update_email(data, status);
            if let Err(e) = email
                .send(consumer_email, &content.subject, &content.html, &content.text)
                .await
            {
                warn!(channel = "email", event = "order_status_update", error = %e,
                      "notification dispatch failed");
            }
        }
        if let (Some(sms), Some(phone)) = (&self.sms, consumer_phone) {
            if let Err(e) = sms
                .send(phone, &templates::order_status_update_sms(data, status))
                .await
            {
                warn!(channel = "sms", event = "order_status_update", error = %e,
                      "notification dispatch failed");
            }
        }
    }
}
