// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HubError-to-HTTP mapping.
//!
//! The single place where the error taxonomy becomes status codes. Internal
//! detail never leaks to the caller: storage and unexpected errors log
//! server-side and answer with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use tiffinhub_core::HubError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Wrapper giving [`HubError`] an HTTP rendering.
#[derive(Debug)]
pub struct ApiError(pub HubError);

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<HubError> for ApiError {
    fn from(err: HubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HubError::Validation(msg) | HubError::Payment(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            HubError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            HubError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            HubError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            HubError::Storage { .. }
            | HubError::Notify { .. }
            | HubError::Config(_)
            | HubError::Internal(_) => {
                error!(error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: HubError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_conventional_status_codes() {
        assert_eq!(status_of(HubError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(HubError::Payment("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(HubError::Auth("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(HubError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(status_of(HubError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(HubError::Internal("secret detail".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_never_reaches_the_body() {
        let response = ApiError(HubError::Internal("database password leaked".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The body is built from the generic message only.
        let body = ErrorBody {
            error: "internal server error".into(),
        };
        assert_eq!(serde_json::to_value(&body).unwrap()["error"], "internal server error");
    }
}
