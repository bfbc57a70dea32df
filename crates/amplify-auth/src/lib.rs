//! Bearer token validation for amplify.
//!
//! The gateway hands every `Authorization: Bearer` token to a
//! [`JwtValidator`]. The production implementation, [`JwksValidator`],
//! checks an `EdDSA` signature against keys published by the identity
//! provider's JWKS endpoint, which [`jwks::JwksProvider`] downloads and
//! caches for [`AuthConfig::refresh_interval`]. A token whose `kid` is not
//! cached forces one early refresh.
//!
//! A valid token becomes [`ValidatedClaims`]: `sub` is parsed into an
//! [`amplify_core::UserId`] and `email` is required.
//!
//! With the `test-utils` feature, `MockJwtValidator` accepts
//! `test-token:<user-uuid>:<email>` without any network access.
//!
//! # Example
//!
//! ```no_run
//! use amplify_auth::{AuthConfig, JwksValidator, JwtValidator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = JwksValidator::new(AuthConfig::from_env())?;
//! let claims = validator.validate("eyJhbGciOiJFZERTQSJ9...").await?;
//! println!("{} <{}>", claims.user_id, claims.email);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod jwks;
pub mod jwt;

pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use jwt::{JwksValidator, JwtValidator, ValidatedClaims};

#[cfg(any(test, feature = "test-utils"))]
pub use jwt::MockJwtValidator;
