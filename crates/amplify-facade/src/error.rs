//! Error types for the facade.
//!
//! Every facade operation fails with exactly one of five kinds: validation,
//! authorization, not found, conflict, or transport (storage failure).

use amplify_store::{InvalidEnumValue, StoreError};
use thiserror::Error;

/// A result type using `FacadeError`.
pub type Result<T> = std::result::Result<T, FacadeError>;

/// Errors that can occur in facade operations.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// The input was rejected before touching the store.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The acting user may not perform the operation.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// The addressed record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The operation would violate a uniqueness or ownership rule.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage layer failed.
    #[error("storage error: {0}")]
    Transport(#[source] StoreError),
}

impl FacadeError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Authorization(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Transport(_) => 500,
        }
    }

    /// Returns true if this error might be resolved by retrying.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub(crate) fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} {id}"))
    }
}

impl From<StoreError> for FacadeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::MissingReference(what) => Self::NotFound(what.to_string()),
            StoreError::NotFound => Self::NotFound("record".to_string()),
            other => Self::Transport(other),
        }
    }
}

impl From<InvalidEnumValue> for FacadeError {
    fn from(err: InvalidEnumValue) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amplify_store::CampaignStatus;

    #[test]
    fn error_status_codes() {
        assert_eq!(FacadeError::Validation("x".into()).http_status_code(), 400);
        assert_eq!(FacadeError::Authorization("x".into()).http_status_code(), 403);
        assert_eq!(FacadeError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(FacadeError::Conflict("x".into()).http_status_code(), 409);
        assert_eq!(
            FacadeError::Transport(StoreError::Database("x".into())).http_status_code(),
            500
        );
    }

    #[test]
    fn store_errors_map_to_kinds() {
        assert!(matches!(
            FacadeError::from(StoreError::Conflict("dup".into())),
            FacadeError::Conflict(_)
        ));
        assert!(matches!(
            FacadeError::from(StoreError::MissingReference("campaign")),
            FacadeError::NotFound(what) if what == "campaign"
        ));
        let transport = FacadeError::from(StoreError::Serialization("bad".into()));
        assert!(transport.is_retriable());
    }

    #[test]
    fn invalid_status_is_validation() {
        let err: FacadeError = "cancelled".parse::<CampaignStatus>().unwrap_err().into();
        assert!(matches!(err, FacadeError::Validation(msg) if msg.contains("cancelled")));
    }
}
