// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound SMS via the provider's REST API (Twilio-compatible).

use std::time::Duration;

use tiffinhub_core::HubError;

/// SMS channel posting form-encoded messages to the provider API.
#[derive(Debug, Clone)]
pub struct SmsChannel {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
}

impl SmsChannel {
    /// Build a channel with account credentials and the sending number.
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
        base_url: String,
    ) -> Result<Self, HubError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HubError::Notify {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            account_sid,
            auth_token,
            from_number,
            base_url,
        })
    }

    /// Send one SMS.
    pub async fn send(&self, to: &str, body: &str) -> Result<(), HubError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let form = [
            ("To", to),
            ("From", self.from_number.as_str()),
            ("Body", body),
        ];
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| HubError::Notify {
                message: "SMS request failed".to_string(),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HubError::Notify {
                message: format!("SMS provider returned {status}: {body}"),
                source: None,
            });
        }
        Ok(())
    }
}
