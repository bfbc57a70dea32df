//! Token validation errors.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Why a bearer token was not turned into claims.
#[derive(Debug, Error)]
pub enum AuthError {
    /// `exp` is in the past.
    #[error("token has expired")]
    TokenExpired,

    /// The signature does not verify against the published key.
    #[error("token signature does not verify")]
    InvalidSignature,

    /// `iss` is not the configured identity provider.
    #[error("token issued by an unknown issuer")]
    InvalidIssuer,

    /// `aud` does not name this service.
    #[error("token not issued for this audience")]
    InvalidAudience,

    /// `sub` is not a UUID.
    #[error("token subject is not a user ID")]
    InvalidUserId,

    /// A claim or header field this service needs is absent.
    #[error("token lacks the {0} claim")]
    MissingClaim(String),

    /// The key set could not be downloaded or parsed.
    #[error("could not load signing keys: {0}")]
    JwksFetchFailed(String),

    /// No published key carries the token's `kid`, even after a refresh.
    #[error("no signing key with id {0}")]
    KeyNotFound(String),

    /// The token is not a well-formed JWT.
    #[error("malformed token: {0}")]
    InvalidToken(String),

    /// Local failure unrelated to the token.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether the same request may succeed later: with a fresh token, or
    /// once the identity provider is reachable again.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::JwksFetchFailed(_))
    }

    /// HTTP status a gateway should answer with.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::JwksFetchFailed(_) | Self::Internal(_) => 500,
            _ => 401,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::InvalidToken(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonwebtoken_errors_map_by_kind() {
        let expired: JwtError = ErrorKind::ExpiredSignature.into();
        assert!(matches!(AuthError::from(expired), AuthError::TokenExpired));

        let issuer: JwtError = ErrorKind::InvalidIssuer.into();
        assert!(matches!(AuthError::from(issuer), AuthError::InvalidIssuer));

        let garbage: JwtError = ErrorKind::InvalidToken.into();
        assert!(matches!(AuthError::from(garbage), AuthError::InvalidToken(_)));
    }

    #[test]
    fn token_problems_are_unauthorized() {
        assert_eq!(AuthError::TokenExpired.http_status_code(), 401);
        assert_eq!(AuthError::KeyNotFound("k1".into()).http_status_code(), 401);
        assert_eq!(AuthError::MissingClaim("email".into()).http_status_code(), 401);
        assert_eq!(AuthError::JwksFetchFailed("down".into()).http_status_code(), 500);
        assert_eq!(AuthError::Internal("io".into()).http_status_code(), 500);
    }

    #[test]
    fn only_expiry_and_fetch_failures_retry() {
        assert!(AuthError::TokenExpired.is_retriable());
        assert!(AuthError::JwksFetchFailed("down".into()).is_retriable());
        assert!(!AuthError::InvalidSignature.is_retriable());
        assert!(!AuthError::InvalidUserId.is_retriable());
    }

    #[test]
    fn messages_name_the_claim() {
        assert_eq!(
            AuthError::MissingClaim("email".into()).to_string(),
            "token lacks the email claim"
        );
    }
}
