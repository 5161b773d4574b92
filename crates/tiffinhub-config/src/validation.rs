// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of a loaded [`HubConfig`].

use tiffinhub_core::HubError;

use crate::model::HubConfig;

/// Validate cross-field constraints Figment cannot express.
pub fn validate_config(config: &HubConfig) -> Result<(), HubError> {
    if let Some(secret) = &config.auth.jwt_secret {
        if secret.len() < 32 {
            return Err(HubError::Config(
                "auth.jwt_secret must be at least 32 bytes".to_string(),
            ));
        }
    }

    if config.auth.session_ttl_days <= 0 {
        return Err(HubError::Config(
            "auth.session_ttl_days must be positive".to_string(),
        ));
    }

    // Partial payment credentials are a misconfiguration, not a disabled
    // channel.
    if config.payments.key_id.is_some() != config.payments.key_secret.is_some() {
        return Err(HubError::Config(
            "payments.key_id and payments.key_secret must be set together".to_string(),
        ));
    }

    if config.email.smtp_host.is_some() && config.email.sender_email.is_none() {
        return Err(HubError::Config(
            "email.sender_email is required when email.smtp_host is set".to_string(),
        ));
    }

    if config.sms.account_sid.is_some()
        && (config.sms.auth_token.is_none() || config.sms.from_number.is_none())
    {
        return Err(HubError::Config(
            "sms.auth_token and sms.from_number are required when sms.account_sid is set"
                .to_string(),
        ));
    }

    Ok(())
}
