//! Failures as HTTP responses.
//!
//! Every failure leaves the gateway as `{"error": {"code", "message"}}`,
//! where `code` is a stable machine-readable kind and `message` is meant for
//! people.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use amplify_auth::AuthError;
use amplify_facade::FacadeError;

/// A request that could not be served.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token, or one that does not validate.
    #[error("a valid bearer token is required")]
    Unauthorized,

    /// The caller lacks access to the organization involved.
    #[error("{0}")]
    Forbidden(String),

    /// The addressed row does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The write would break a uniqueness or ownership rule.
    #[error("{0}")]
    Conflict(String),

    /// Malformed path, body or field value.
    #[error("{0}")]
    BadRequest(String),

    /// Storage or identity provider failure. The detail is logged, not sent.
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: Detail<'a>,
}

#[derive(Serialize)]
struct Detail<'a> {
    code: &'static str,
    message: &'a str,
}

impl ApiError {
    const fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// The response status.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().0
    }

    /// The `code` field of the error envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().1
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.kind();
        let message = self.to_string();
        let envelope = Envelope {
            error: Detail {
                code,
                message: &message,
            },
        };
        (status, Json(envelope)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.http_status_code() == 401 {
            tracing::debug!(error = %err, "Rejected token");
            return Self::Unauthorized;
        }
        tracing::error!(error = %err, "Token validation failed");
        Self::Internal("identity provider unavailable".to_string())
    }
}

impl From<FacadeError> for ApiError {
    fn from(err: FacadeError) -> Self {
        match err {
            FacadeError::Validation(msg) => Self::BadRequest(msg),
            FacadeError::Authorization(msg) => Self::Forbidden(msg),
            FacadeError::NotFound(what) => Self::NotFound(what),
            FacadeError::Conflict(msg) => Self::Conflict(msg),
            FacadeError::Transport(store_err) => {
                tracing::error!(error = %store_err, "Store failure");
                Self::Internal("storage unavailable".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_pair_status_and_code() {
        let cases = [
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN, "forbidden"),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT, "conflict"),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "bad_request"),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn facade_errors_map_to_api_errors() {
        let cases = [
            (FacadeError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (FacadeError::Authorization("no".into()), StatusCode::FORBIDDEN),
            (FacadeError::NotFound("campaign".into()), StatusCode::NOT_FOUND),
            (FacadeError::Conflict("dup".into()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn auth_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from(AuthError::TokenExpired),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(AuthError::KeyNotFound("k1".into())),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from(AuthError::JwksFetchFailed("down".into())),
            ApiError::Internal(_)
        ));
    }

    #[tokio::test]
    async fn error_body_shape() {
        let response = ApiError::NotFound("campaign".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "not_found");
        assert_eq!(body["error"]["message"], "campaign not found");
    }
}
