//! Token validation.
//!
//! A token is accepted when its `EdDSA` signature verifies against a key from
//! the identity provider, `iss` is the provider, `aud` names this service,
//! `exp` lies in the future, `sub` is a UUID and `email` is present.

use std::str::FromStr;

use amplify_core::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::{Deserialize, Deserializer};

use crate::error::{AuthError, Result};
use crate::jwks::JwksProvider;
use crate::AuthConfig;

/// The identity a valid token vouches for.
#[derive(Debug, Clone)]
pub struct ValidatedClaims {
    /// From `sub`.
    pub user_id: UserId,
    /// From `email`.
    pub email: String,
    /// From `exp`.
    pub expires_at: DateTime<Utc>,
}

/// Turns a bearer token into claims.
#[async_trait]
pub trait JwtValidator: Send + Sync {
    /// Check `token` and return the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` describing the first check that failed.
    async fn validate(&self, token: &str) -> Result<ValidatedClaims>;
}

#[derive(Deserialize)]
struct RawClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    aud: Vec<String>,
    exp: u64,
}

/// `aud` may be a single string or an array of them.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(aud) => vec![aud],
        OneOrMany::Many(auds) => auds,
    })
}

impl TryFrom<RawClaims> for ValidatedClaims {
    type Error = AuthError;

    fn try_from(raw: RawClaims) -> Result<Self> {
        let user_id = UserId::from_str(&raw.sub).map_err(|_| AuthError::InvalidUserId)?;
        let email = raw
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AuthError::MissingClaim("email".to_string()))?;
        let expires_at = i64::try_from(raw.exp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| AuthError::InvalidToken(format!("exp {} out of range", raw.exp)))?;

        Ok(Self {
            user_id,
            email,
            expires_at,
        })
    }
}

/// Validates tokens against the identity provider's published keys.
pub struct JwksValidator {
    config: AuthConfig,
    jwks: JwksProvider,
}

impl JwksValidator {
    /// Build a validator. Keys are fetched lazily on the first token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let jwks = JwksProvider::new(config.clone())?;
        Ok(Self { config, jwks })
    }

    /// The key cache behind this validator.
    #[must_use]
    pub const fn jwks(&self) -> &JwksProvider {
        &self.jwks
    }

    fn rules(&self) -> Validation {
        let mut rules = Validation::new(Algorithm::EdDSA);
        rules.set_issuer(&[self.config.issuer()]);
        rules.validate_aud = false;
        rules
    }
}

#[async_trait]
impl JwtValidator for JwksValidator {
    async fn validate(&self, token: &str) -> Result<ValidatedClaims> {
        let kid = decode_header(token)?
            .kid
            .ok_or_else(|| AuthError::MissingClaim("kid".to_string()))?;
        let key = self.jwks.get_key(&kid).await?;

        let raw = decode::<RawClaims>(token, &key, &self.rules())?.claims;
        if !raw.aud.iter().any(|aud| *aud == self.config.audience) {
            return Err(AuthError::InvalidAudience);
        }

        ValidatedClaims::try_from(raw)
    }
}

/// Accepts `test-token:<user-uuid>:<email>` without checking anything else.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MockJwtValidator;

#[cfg(any(test, feature = "test-utils"))]
impl MockJwtValidator {
    /// Build a token this validator accepts.
    #[must_use]
    pub fn token_for(user_id: &UserId, email: &str) -> String {
        format!("test-token:{user_id}:{email}")
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl JwtValidator for MockJwtValidator {
    async fn validate(&self, token: &str) -> Result<ValidatedClaims> {
        let malformed =
            || AuthError::InvalidToken("expected test-token:<user>:<email>".to_string());

        let rest = token.strip_prefix("test-token:").ok_or_else(malformed)?;
        let (user, email) = rest.split_once(':').ok_or_else(malformed)?;

        let user_id = UserId::from_str(user).map_err(|_| AuthError::InvalidUserId)?;
        if email.is_empty() {
            return Err(AuthError::MissingClaim("email".to_string()));
        }

        Ok(ValidatedClaims {
            user_id,
            email: email.to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwks::tests::jwks_body;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// PKCS#8 wrapping of the RFC 8032 test secret key.
    const TEST_PKCS8: [u8; 48] = [
        0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04,
        0x20, 0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec,
        0x2c, 0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c,
        0xae, 0x7f, 0x60,
    ];

    const USER: &str = "550e8400-e29b-41d4-a716-446655440000";

    async fn validator_with_jwks() -> (JwksValidator, MockServer) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(jwks_body("k1")))
            .mount(&server)
            .await;

        let validator = JwksValidator::new(AuthConfig {
            base_url: server.uri(),
            audience: "amplify".to_string(),
            jwks_refresh_seconds: 300,
        })
        .unwrap();
        (validator, server)
    }

    fn sign(claims: &serde_json::Value) -> String {
        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some("k1".to_string());
        encode(&header, claims, &EncodingKey::from_ed_der(&TEST_PKCS8)).unwrap()
    }

    fn claims(issuer: &str, aud: serde_json::Value, exp_offset: i64) -> serde_json::Value {
        let now = Utc::now().timestamp();
        serde_json::json!({
            "iss": issuer,
            "sub": USER,
            "aud": aud,
            "email": "ada@example.com",
            "iat": now,
            "exp": now + exp_offset,
        })
    }

    #[tokio::test]
    async fn validates_signed_token() {
        let (validator, server) = validator_with_jwks().await;
        let token = sign(&claims(&server.uri(), serde_json::json!("amplify"), 3600));

        let claims = validator.validate(&token).await.unwrap();
        assert_eq!(claims.user_id.to_string(), USER);
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn accepts_audience_array() {
        let (validator, server) = validator_with_jwks().await;
        let token = sign(&claims(
            &server.uri(),
            serde_json::json!(["other", "amplify"]),
            3600,
        ));

        assert!(validator.validate(&token).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_wrong_audience() {
        let (validator, server) = validator_with_jwks().await;
        let token = sign(&claims(&server.uri(), serde_json::json!("billing"), 3600));

        let result = validator.validate(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidAudience)));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let (validator, server) = validator_with_jwks().await;
        let token = sign(&claims(&server.uri(), serde_json::json!("amplify"), -3600));

        let result = validator.validate(&token).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn rejects_wrong_issuer() {
        let (validator, _server) = validator_with_jwks().await;
        let token = sign(&claims(
            "https://evil.example.com",
            serde_json::json!("amplify"),
            3600,
        ));

        let result = validator.validate(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidIssuer)));
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let (validator, _server) = validator_with_jwks().await;
        let result = validator.validate("not.a.jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn raw_claims_need_uuid_subject_and_email() {
        let raw: RawClaims = serde_json::from_value(serde_json::json!({
            "sub": USER, "aud": "amplify", "exp": 4_102_444_800_u64
        }))
        .unwrap();
        assert_eq!(raw.aud, vec!["amplify".to_string()]);
        assert!(matches!(
            ValidatedClaims::try_from(raw),
            Err(AuthError::MissingClaim(claim)) if claim == "email"
        ));

        let raw: RawClaims = serde_json::from_value(serde_json::json!({
            "sub": "ada", "email": "ada@example.com", "exp": 4_102_444_800_u64
        }))
        .unwrap();
        assert!(raw.aud.is_empty());
        assert!(matches!(
            ValidatedClaims::try_from(raw),
            Err(AuthError::InvalidUserId)
        ));
    }

    #[tokio::test]
    async fn mock_validator_works() {
        let validator = MockJwtValidator;
        let user_id = UserId::from_str(USER).unwrap();
        let token = MockJwtValidator::token_for(&user_id, "ada@example.com");

        let claims = validator.validate(&token).await.unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "ada@example.com");
    }

    #[tokio::test]
    async fn mock_validator_rejects_invalid() {
        let validator = MockJwtValidator;

        assert!(matches!(
            validator.validate("invalid-token").await,
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            validator.validate("test-token:not-a-uuid:a@b.c").await,
            Err(AuthError::InvalidUserId)
        ));
        assert!(matches!(
            validator.validate(&format!("test-token:{USER}:")).await,
            Err(AuthError::MissingClaim(_))
        ));
    }
}
