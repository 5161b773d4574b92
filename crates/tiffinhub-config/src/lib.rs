// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the TiffinHub service.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! let config = tiffinhub_config::load_and_validate().expect("config errors");
//! println!("binding {}:{}", config.server.host, config.server.port);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

use tiffinhub_core::HubError;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::HubConfig;

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<HubConfig, HubError> {
    let config = loader::load_config().map_err(|e| HubError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<HubConfig, HubError> {
    let config =
        loader::load_config_from_str(toml_content).map_err(|e| HubError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a specific file path and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<HubConfig, HubError> {
    let config =
        loader::load_config_from_path(path).map_err(|e| HubError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_file() {
        let config = load_and_validate_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.session_ttl_days, 7);
        assert!(config.orders.auto_confirm);
        assert!(config.email.smtp_host.is_none());
    }

    #[test]
    fn toml_sections_override_defaults() {
        let config = load_and_validate_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [orders]
            auto_confirm = false

            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(!config.orders.auto_confirm);
        assert!(config.auth.jwt_secret.is_some());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_and_validate_str(
            r#"
            [server]
            prot = 9000
            "#,
        );
        assert!(result.is_err(), "typo'd key should fail extraction");
    }

    #[test]
    fn invalid_section_values_surface_as_config_errors() {
        let result = load_and_validate_str(
            r#"
            [auth]
            jwt_secret = "tooshort"
            "#,
        );
        match result {
            Err(HubError::Config(msg)) => assert!(msg.contains("jwt_secret")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
