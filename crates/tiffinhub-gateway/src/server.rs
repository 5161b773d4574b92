// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. Login and registration are
//! the only public API routes; everything else sits behind the identity
//! middleware, which also enforces the admin prefix.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tiffinhub_core::HubError;

use crate::auth::identity_middleware;
use crate::handlers;
use crate::state::AppState;

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/logout-all", post(handlers::auth::logout_all))
        .route("/api/auth/account", delete(handlers::auth::delete_account))
        .route(
            "/api/users/profile",
            get(handlers::users::get_profile).put(handlers::users::update_profile),
        )
        .route("/api/providers", get(handlers::providers::list))
        .route("/api/providers/{id}", get(handlers::providers::get))
        .route(
            "/api/favorites",
            get(handlers::favorites::list)
                .post(handlers::favorites::add)
                .delete(handlers::favorites::remove),
        )
        .route(
            "/api/menus",
            get(handlers::menus::list).post(handlers::menus::create),
        )
        .route(
            "/api/menus/{id}",
            get(handlers::menus::get)
                .patch(handlers::menus::update)
                .delete(handlers::menus::delete),
        )
        .route(
            "/api/menus/{id}/items/{item_id}",
            patch(handlers::menus::update_item),
        )
        .route(
            "/api/orders",
            get(handlers::orders::list).post(handlers::orders::create),
        )
        .route("/api/orders/{id}/status", patch(handlers::orders::update_status))
        .route(
            "/api/payments/order",
            post(handlers::orders::create_gateway_order),
        )
        .route(
            "/api/reviews",
            get(handlers::reviews::list).post(handlers::reviews::create),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list).patch(handlers::notifications::mark_read),
        )
        .route(
            "/api/help-requests",
            get(handlers::help_requests::list).post(handlers::help_requests::create),
        )
        .route(
            "/api/help-requests/{id}",
            get(handlers::help_requests::get).patch(handlers::help_requests::update),
        )
        .route("/api/analytics/dashboard", get(handlers::analytics::dashboard))
        .route(
            "/api/analytics/provider",
            get(handlers::analytics::provider_analytics),
        )
        .route("/api/settings", get(handlers::settings::get).put(handlers::settings::put))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/users/{id}", patch(handlers::admin::set_user_active))
        .route("/api/admin/orders", get(handlers::admin::list_orders))
        // The admin transition shares the role-aware handler; the prefix
        // middleware guarantees an admin caller here.
        .route(
            "/api/admin/orders/{id}/status",
            patch(handlers::orders::update_status),
        )
        .route("/api/admin/providers", get(handlers::admin::list_providers))
        .route(
            "/api/admin/providers/{id}",
            patch(handlers::admin::update_provider),
        )
        .route(
            "/api/admin/providers/{id}/verify",
            patch(handlers::admin::verify_provider),
        )
        .route("/api/admin/reviews", get(handlers::admin::list_reviews))
        .route(
            "/api/admin/reviews/{id}",
            delete(handlers::admin::delete_review),
        )
        .route("/api/admin/reports", get(handlers::admin::get_reports))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the shutdown future resolves.
pub async fn start_server(
    host: &str,
    port: u16,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), HubError> {
    let app = build_router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HubError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| HubError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
