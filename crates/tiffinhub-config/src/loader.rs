// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./tiffinhub.toml` > `~/.config/tiffinhub/
//! tiffinhub.toml` > `/etc/tiffinhub/tiffinhub.toml` with environment
//! variable overrides via the `TIFFINHUB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HubConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tiffinhub/tiffinhub.toml` (system-wide)
/// 3. `~/.config/tiffinhub/tiffinhub.toml` (user XDG config)
/// 4. `./tiffinhub.toml` (local directory)
/// 5. `TIFFINHUB_*` environment variables
pub fn load_config() -> Result<HubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HubConfig::default()))
        .merge(Toml::file("/etc/tiffinhub/tiffinhub.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tiffinhub/tiffinhub.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tiffinhub.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HubConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HubConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TIFFINHUB_AUTH_JWT_SECRET` must map to
/// `auth.jwt_secret`, not `auth.jwt.secret`.
fn env_provider() -> Env {
    Env::prefixed("TIFFINHUB_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TIFFINHUB_AUTH_JWT_SECRET -> "auth_jwt_secret"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("orders_", "orders.", 1)
            .replacen("payments_", "payments.", 1)
            .replacen("email_", "email.", 1)
            .replacen("sms_", "sms.", 1);
        mapped.into()
    })
}
