// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service wiring: storage, session signer, payment client, notification
//! channels, and the HTTP gateway.

use std::sync::Arc;

use tracing::info;

use tiffinhub_auth::SessionSigner;
use tiffinhub_config::HubConfig;
use tiffinhub_core::HubError;
use tiffinhub_gateway::{AppState, start_server};
use tiffinhub_notify::Notifier;
use tiffinhub_payments::PaymentClient;
use tiffinhub_storage::Database;

/// Run the service until a shutdown signal arrives.
pub async fn run(config: HubConfig) -> Result<(), HubError> {
    let secret = config.auth.jwt_secret.as_deref().ok_or_else(|| {
        HubError::Config("auth.jwt_secret is required to serve".to_string())
    })?;

    let db = Database::open(&config.storage.database_path).await?;
    info!(path = %config.storage.database_path, "storage ready");

    let payments = match (&config.payments.key_id, &config.payments.key_secret) {
        (Some(key_id), Some(key_secret)) => Some(PaymentClient::new(
            key_id.clone(),
            key_secret.clone(),
            config.payments.base_url.clone(),
        )?),
        _ => None,
    };
    if payments.is_none() {
        info!("payment gateway not configured; gateway-method orders will be rejected");
    }

    let notifier = Arc::new(Notifier::from_config(&config.email, &config.sms)?);

    let state = AppState {
        db: db.clone(),
        signer: SessionSigner::new(secret.as_bytes(), config.auth.session_ttl_days),
        payments,
        notifier,
        auto_confirm: config.orders.auto_confirm,
        cookie_secure: config.auth.cookie_secure,
    };

    start_server(
        &config.server.host,
        config.server.port,
        state,
        shutdown_signal(),
    )
    .await?;

    db.close().await?;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        return;
    }
    info!("shutdown signal received");
}
