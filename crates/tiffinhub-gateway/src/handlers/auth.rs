// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account lifecycle handlers: register, login, session introspection,
//! logout (single and everywhere), and hard account deletion.

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::AppendHeaders;
use axum::Json;
use serde::{Deserialize, Serialize};

use tiffinhub_auth::{hash_password, verify_password};
use tiffinhub_core::types::OperatingHours;
use tiffinhub_core::{HubError, Identity, Role, ServiceProvider, User};
use tiffinhub_storage::queries::{providers, users};

use crate::auth::SESSION_COOKIE;
use crate::error::ApiResult;
use crate::state::AppState;

/// Build the session Set-Cookie value: HTTP-only, strict same-site, with
/// the token's lifetime as max-age. A zero max-age clears the cookie.
fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut value = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_secs}"
    );
    if secure {
        value.push_str("; Secure");
    }
    value
}

/// Public display fields of an account.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Provider business fields supplied at registration.
#[derive(Debug, Deserialize)]
pub struct BusinessData {
    pub business_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cuisine: Vec<String>,
    #[serde(default)]
    pub delivery_areas: Vec<String>,
    #[serde(default)]
    pub operating_hours: Option<OperatingHours>,
}

/// Request body for POST /api/auth/register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub business: Option<BusinessData>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserSummary,
}

/// POST /api/auth/register
///
/// Creates the account (and, for providers with business data, the
/// ServiceProvider record) and opens a session.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(HubError::Validation("name is required".to_string()).into());
    }
    if !body.email.contains('@') {
        return Err(HubError::Validation("email is invalid".to_string()).into());
    }
    if body.password.len() < 6 {
        return Err(
            HubError::Validation("password must be at least 6 characters".to_string()).into(),
        );
    }
    if users::get_user_by_email(&state.db, &body.email).await?.is_some() {
        return Err(HubError::Validation("user already exists".to_string()).into());
    }

    let mut user = User::new(
        body.name.trim().to_string(),
        body.email,
        hash_password(&body.password)?,
        body.role,
    );
    user.phone = body.phone;
    user.address = body.address;
    users::create_user(&state.db, &user).await?;

    if body.role == Role::Provider {
        if let Some(business) = body.business {
            let mut provider = ServiceProvider::new(user.id.clone(), business.business_name);
            provider.description = business.description;
            provider.cuisine = business.cuisine;
            provider.delivery_areas = business.delivery_areas;
            if let Some(hours) = business.operating_hours {
                provider.operating_hours = hours;
            }
            providers::create_provider(&state.db, &provider).await?;
        }
    }

    let token = state
        .signer
        .issue(&user.id, &user.email, user.role, user.token_version)?;
    let cookie = session_cookie(&token, state.signer.ttl_secs(), state.cookie_secure);

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            message: "user registered successfully".to_string(),
            user: UserSummary::from(&user),
        }),
    ))
}

/// Request body for POST /api/auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
///
/// Inactive accounts are rejected here specifically; session checks do not
/// consult the flag.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let user = users::get_user_by_email(&state.db, &body.email)
        .await?
        .ok_or_else(|| HubError::Auth("invalid credentials".to_string()))?;

    if !user.is_active {
        return Err(HubError::Auth("account is deactivated".to_string()).into());
    }
    if !verify_password(&body.password, &user.password_hash)? {
        return Err(HubError::Auth("invalid credentials".to_string()).into());
    }

    let token = state
        .signer
        .issue(&user.id, &user.email, user.role, user.token_version)?;
    let cookie = session_cookie(&token, state.signer.ttl_secs(), state.cookie_secure);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            message: "login successful".to_string(),
            user: UserSummary::from(&user),
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<MeResponse>> {
    let user = users::get_user(&state.db, &identity.user_id)
        .await?
        .ok_or_else(|| HubError::NotFound("user not found".to_string()))?;
    Ok(Json(MeResponse { user }))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/auth/logout
///
/// Clears the session cookie. The token itself stays valid until expiry;
/// use logout-all to invalidate every issued credential.
pub async fn logout(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, session_cookie("", 0, state.cookie_secure))]),
        Json(MessageResponse {
            message: "logged out".to_string(),
        }),
    )
}

/// POST /api/auth/logout-all
///
/// Bumps the account's token_version; every previously issued credential
/// becomes stale at the next middleware check.
pub async fn logout_all(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl axum::response::IntoResponse> {
    users::bump_token_version(&state.db, &identity.user_id).await?;
    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie("", 0, state.cookie_secure))]),
        Json(MessageResponse {
            message: "logged out from all devices".to_string(),
        }),
    ))
}

/// DELETE /api/auth/account
///
/// Hard-deletes the account and clears the session cookie.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl axum::response::IntoResponse> {
    users::delete_user(&state.db, &identity.user_id).await?;
    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie("", 0, state.cookie_secure))]),
        Json(MessageResponse {
            message: "account deleted permanently".to_string(),
        }),
    ))
}
