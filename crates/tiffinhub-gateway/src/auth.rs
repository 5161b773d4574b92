// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Verifies the session credential once per request (bearer header first,
//! session cookie second), checks the claims' token_version against the
//! user's current value so "logout everywhere" takes effect at read time,
//! and injects the resulting [`Identity`] as a request extension. Fails
//! closed: any verification error is a 401.
//!
//! Routes under `/api/admin` additionally require the admin role.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use tiffinhub_core::{HubError, Identity, Role};
use tiffinhub_storage::queries::users;

use crate::error::ApiError;
use crate::state::AppState;

/// Cookie holding the session token.
pub const SESSION_COOKIE: &str = "token";

/// Extract the raw session token from the Authorization header or the
/// session cookie.
fn token_from_request(request: &Request, jar: &CookieJar) -> Option<String> {
    let bearer = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from);
    bearer.or_else(|| jar.get(SESSION_COOKIE).map(|c| c.value().to_string()))
}

/// Resolve a token into a request identity.
///
/// Signature, expiry, account existence, and token_version all gate here;
/// the admin prefix additionally requires the admin role.
async fn authenticate(
    state: &AppState,
    token: Option<String>,
    path: &str,
) -> Result<Identity, HubError> {
    let token = token.ok_or_else(|| HubError::Auth("missing credential".to_string()))?;

    let claims = state
        .signer
        .verify(&token)
        .ok_or_else(|| HubError::Auth("invalid or expired token".to_string()))?;

    // The credential is stale once the user's token_version moves past the
    // version embedded at issue time.
    let user = users::get_user(&state.db, &claims.sub)
        .await?
        .ok_or_else(|| HubError::Auth("invalid or expired token".to_string()))?;
    if user.token_version != claims.token_version {
        return Err(HubError::Auth("invalid or expired token".to_string()));
    }

    if path.starts_with("/api/admin") && claims.role != Role::Admin {
        return Err(HubError::Forbidden("admin role required".to_string()));
    }

    Ok(claims.identity())
}

/// Middleware guarding every non-public route.
pub async fn identity_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_request(&request, &jar);
    let identity = authenticate(&state, token, request.uri().path()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::Body;
    use tempfile::tempdir;
    use tiffinhub_auth::SessionSigner;
    use tiffinhub_core::User;
    use tiffinhub_notify::Notifier;
    use tiffinhub_storage::Database;

    fn request_with_header(name: &str, value: &str) -> Request {
        axum::http::Request::builder()
            .uri("/api/orders")
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("auth.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let state = AppState {
            db,
            signer: SessionSigner::new(b"middleware-test-secret-of-enough-len", 7),
            payments: None,
            notifier: Arc::new(Notifier::disabled()),
            auto_confirm: true,
            cookie_secure: false,
        };
        (state, dir)
    }

    async fn seed_user(state: &AppState, role: Role) -> User {
        let user = User::new("Asha".into(), "asha@x.com".into(), "$h".into(), role);
        users::create_user(&state.db, &user).await.unwrap();
        user
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let request = request_with_header("authorization", "Bearer header-token");
        let jar = CookieJar::new().add(axum_extra::extract::cookie::Cookie::new(
            SESSION_COOKIE,
            "cookie-token",
        ));
        assert_eq!(
            token_from_request(&request, &jar).as_deref(),
            Some("header-token")
        );
    }

    #[test]
    fn cookie_is_the_fallback() {
        let request = axum::http::Request::builder()
            .uri("/api/orders")
            .body(Body::empty())
            .unwrap();
        let jar = CookieJar::new().add(axum_extra::extract::cookie::Cookie::new(
            SESSION_COOKIE,
            "cookie-token",
        ));
        assert_eq!(
            token_from_request(&request, &jar).as_deref(),
            Some("cookie-token")
        );
    }

    #[test]
    fn malformed_authorization_header_is_ignored() {
        let request = request_with_header("authorization", "Basic dXNlcg==");
        let jar = CookieJar::new();
        assert!(token_from_request(&request, &jar).is_none());
    }

    #[tokio::test]
    async fn valid_token_resolves_to_the_identity() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, Role::Consumer).await;
        let token = state
            .signer
            .issue(&user.id, &user.email, user.role, user.token_version)
            .unwrap();

        let identity = authenticate(&state, Some(token), "/api/orders").await.unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role, Role::Consumer);
    }

    #[tokio::test]
    async fn missing_and_garbage_tokens_fail_closed() {
        let (state, _dir) = test_state().await;
        assert!(matches!(
            authenticate(&state, None, "/api/orders").await,
            Err(HubError::Auth(_))
        ));
        assert!(matches!(
            authenticate(&state, Some("garbage".into()), "/api/orders").await,
            Err(HubError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn bumped_token_version_invalidates_issued_sessions() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, Role::Consumer).await;
        let token = state
            .signer
            .issue(&user.id, &user.email, user.role, user.token_version)
            .unwrap();

        // Valid before the bump.
        authenticate(&state, Some(token.clone()), "/api/orders").await.unwrap();

        users::bump_token_version(&state.db, &user.id).await.unwrap();
        assert!(matches!(
            authenticate(&state, Some(token), "/api/orders").await,
            Err(HubError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn deleted_account_invalidates_the_token() {
        let (state, _dir) = test_state().await;
        let user = seed_user(&state, Role::Consumer).await;
        let token = state
            .signer
            .issue(&user.id, &user.email, user.role, user.token_version)
            .unwrap();
        users::delete_user(&state.db, &user.id).await.unwrap();
        assert!(matches!(
            authenticate(&state, Some(token), "/api/orders").await,
            Err(HubError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn admin_prefix_requires_the_admin_role() {
        let (state, _dir) = test_state().await;
        let consumer = seed_user(&state, Role::Consumer).await;
        let token = state
            .signer
            .issue(&consumer.id, &consumer.email, consumer.role, 0)
            .unwrap();
        assert!(matches!(
            authenticate(&state, Some(token.clone()), "/api/admin/users").await,
            Err(HubError::Forbidden(_))
        ));
        // The same credential is fine outside the admin prefix.
        authenticate(&state, Some(token), "/api/orders").await.unwrap();

        let admin = User::new("Root".into(), "root@x.com".into(), "$h".into(), Role::Admin);
        users::create_user(&state.db, &admin).await.unwrap();
        let token = state
            .signer
            .issue(&admin.id, &admin.email, admin.role, 0)
            .unwrap();
        authenticate(&state, Some(token), "/api/admin/users").await.unwrap();
    }
}
