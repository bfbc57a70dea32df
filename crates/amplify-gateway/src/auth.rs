//! Authentication extractor.
//!
//! [`AuthUser`] validates the `Authorization: Bearer <token>` header and
//! makes sure the caller has a profile before any handler runs.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use amplify_auth::{JwtValidator, ValidatedClaims};
use amplify_core::UserId;
use amplify_facade::Facade;

use crate::error::ApiError;
use crate::state::GatewayState;

/// An authenticated user extracted from a JWT token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID from the token subject.
    pub user_id: UserId,
    /// The email carried by the token.
    pub email: String,
}

impl AuthUser {
    /// Create an `AuthUser` from validated claims.
    #[must_use]
    pub fn from_claims(claims: &ValidatedClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email.clone(),
        }
    }
}

/// Extract the bearer token from request headers.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized)
}

#[async_trait]
impl<F, V> FromRequestParts<Arc<GatewayState<F, V>>> for AuthUser
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<GatewayState<F, V>>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.jwt_validator.validate(token).await?;

        // First sight of an identity creates its profile.
        state
            .facade
            .ensure_profile(&claims.user_id, &claims.email)
            .await?;

        Ok(Self::from_claims(&claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::{Duration, Utc};

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/v1/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn auth_user_from_claims() {
        let user_id = UserId::generate();
        let claims = ValidatedClaims {
            user_id,
            email: "ada@example.com".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };

        let user = AuthUser::from_claims(&claims);
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))).unwrap(), "abc");
        assert!(matches!(
            bearer_token(&parts_with(None)),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            bearer_token(&parts_with(Some("Basic abc"))),
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            bearer_token(&parts_with(Some("Bearer "))),
            Err(ApiError::Unauthorized)
        ));
    }
}
