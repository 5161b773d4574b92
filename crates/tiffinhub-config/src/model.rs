// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the TiffinHub service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level TiffinHub configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; sections for optional channels (email, sms, payments) disable
/// the channel when their credentials are absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session credential settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Order lifecycle policy settings.
    #[serde(default)]
    pub orders: OrdersConfig,

    /// Payment gateway settings.
    #[serde(default)]
    pub payments: PaymentsConfig,

    /// Outbound email (SMTP) settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Outbound SMS settings.
    #[serde(default)]
    pub sms: SmsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tiffinhub").join("tiffinhub.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tiffinhub.db"))
        .to_string_lossy()
        .into_owned()
}

/// Session credential configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HMAC secret for signing session tokens. Required to serve.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Session lifetime in days.
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,

    /// Set the `Secure` attribute on the session cookie.
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            session_ttl_days: default_session_ttl_days(),
            cookie_secure: false,
        }
    }
}

fn default_session_ttl_days() -> i64 {
    7
}

/// Order lifecycle policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrdersConfig {
    /// When true (the default), newly created orders are persisted as
    /// "confirmed" directly. When false, they start "pending" and await an
    /// explicit provider confirmation.
    #[serde(default = "default_auto_confirm")]
    pub auto_confirm: bool,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            auto_confirm: default_auto_confirm(),
        }
    }
}

fn default_auto_confirm() -> bool {
    true
}

/// Payment gateway configuration. Both credentials must be present for
/// gateway payments to be accepted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentsConfig {
    /// Gateway API key id.
    #[serde(default)]
    pub key_id: Option<String>,

    /// Gateway API key secret; also the HMAC secret for signature checks.
    #[serde(default)]
    pub key_secret: Option<String>,

    /// Gateway API base URL.
    #[serde(default = "default_payments_base_url")]
    pub base_url: String,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: None,
            base_url: default_payments_base_url(),
        }
    }
}

fn default_payments_base_url() -> String {
    "https://api.razorpay.com".to_string()
}

/// Outbound email configuration. `None` for `smtp_host` disables email.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// SMTP relay host. `None` disables the email channel.
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Display name on outbound mail.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Sender address on outbound mail.
    #[serde(default)]
    pub sender_email: Option<String>,
}

fn default_sender_name() -> String {
    "TiffinHub".to_string()
}

/// Outbound SMS configuration. `None` for `account_sid` disables SMS.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmsConfig {
    /// Provider account SID. `None` disables the SMS channel.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Provider auth token.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Sending phone number.
    #[serde(default)]
    pub from_number: Option<String>,

    /// Provider API base URL.
    #[serde(default = "default_sms_base_url")]
    pub base_url: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            base_url: default_sms_base_url(),
        }
    }
}

fn default_sms_base_url() -> String {
    "https://api.twilio.com".to_string()
}
