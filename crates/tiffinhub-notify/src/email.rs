// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound transactional email over SMTP (lettre).

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use tiffinhub_core::HubError;

/// SMTP email channel.
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl EmailChannel {
    /// Build a channel against an SMTP relay with optional credentials.
    pub fn new(
        smtp_host: &str,
        username: Option<String>,
        password: Option<String>,
        sender_name: &str,
        sender_email: &str,
    ) -> Result<Self, HubError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host).map_err(|e| {
                HubError::Notify {
                    message: format!("invalid SMTP relay {smtp_host}"),
                    source: Some(Box::new(e)),
                }
            })?;
        if let (Some(username), Some(password)) = (username, password) {
            builder = builder.credentials(Credentials::new(username, password));
        }
        let sender: Mailbox = format!("{sender_name} <{sender_email}>")
            .parse()
            .map_err(|e| HubError::Notify {
                message: format!("invalid sender address {sender_email}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }

    /// Send one message with HTML and plain-text alternatives.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<(), HubError> {
        let to: Mailbox = to.parse().map_err(|e| HubError::Notify {
            message: format!("invalid recipient address {to}"),
            source: Some(Box::new(e)),
        })?;
        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                text.to_string(),
                html.to_string(),
            ))
            .map_err(|e| HubError::Notify {
                message: "failed to build email".to_string(),
                source: Some(Box::new(e)),
            })?;

        self.transport
            .send(message)
            .await
            .map_err(|e| HubError::Notify {
                message: "SMTP send failed".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}
