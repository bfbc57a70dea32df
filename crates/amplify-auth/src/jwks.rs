//! Signing key cache.
//!
//! [`JwksProvider`] downloads the identity provider's key set and keeps the
//! Ed25519 keys it finds, indexed by `kid`. The set is fetched again once it
//! is older than [`AuthConfig::refresh_interval`], or straight away when a
//! token names a `kid` the cache does not hold, which is how key rotation
//! shows up.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::prelude::*;
use jsonwebtoken::DecodingKey;
use parking_lot::RwLock;
use serde::Deserialize;

use crate::error::{AuthError, Result};
use crate::AuthConfig;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct KeySet {
    keys: Vec<Jwk>,
}

/// The members of a JWK this service reads. Everything else is ignored.
#[derive(Deserialize)]
struct Jwk {
    kty: String,
    kid: Option<String>,
    crv: Option<String>,
    x: Option<String>,
}

impl Jwk {
    /// The verification key, or `None` for keys this service cannot use.
    fn decoding_key(&self) -> Option<DecodingKey> {
        if self.kty != "OKP" || self.crv.as_deref() != Some("Ed25519") {
            tracing::debug!(kty = %self.kty, crv = ?self.crv, "Skipping non-Ed25519 key");
            return None;
        }
        let raw = match self.x.as_deref().map(|x| BASE64_URL_SAFE_NO_PAD.decode(x)) {
            Some(Ok(raw)) => raw,
            Some(Err(e)) => {
                tracing::warn!(kid = ?self.kid, error = %e, "Skipping key with bad encoding");
                return None;
            }
            None => {
                tracing::warn!(kid = ?self.kid, "Skipping key without public part");
                return None;
            }
        };
        Some(DecodingKey::from_ed_der(&raw))
    }
}

#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn lookup(&self, kid: &str, max_age: Duration) -> Option<DecodingKey> {
        let fresh = self.fetched_at.is_some_and(|at| at.elapsed() < max_age);
        if fresh {
            self.keys.get(kid).cloned()
        } else {
            None
        }
    }
}

fn fetch_failed(err: &reqwest::Error) -> AuthError {
    AuthError::JwksFetchFailed(err.to_string())
}

/// Fetches and caches the identity provider's signing keys.
pub struct JwksProvider {
    config: AuthConfig,
    http: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl JwksProvider {
    /// Create a provider with an empty cache. Nothing is fetched until the
    /// first lookup.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if the HTTP client cannot be built.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            cache: RwLock::new(KeyCache::default()),
        })
    }

    /// The key for `kid`, refreshing the set first when the cache is stale
    /// or does not know it.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if the refreshed set still lacks `kid`;
    /// `JwksFetchFailed` if the set cannot be downloaded.
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey> {
        let max_age = self.config.refresh_interval();
        if let Some(key) = self.cache.read().lookup(kid, max_age) {
            return Ok(key);
        }

        self.refresh().await?;

        self.cache
            .read()
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))
    }

    /// Number of usable keys in the cache.
    #[must_use]
    pub fn cached_key_count(&self) -> usize {
        self.cache.read().keys.len()
    }

    /// Download the key set now, replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::JwksFetchFailed` on any network, status or body
    /// failure. The previous cache is kept in that case.
    pub async fn refresh(&self) -> Result<()> {
        let url = self.config.jwks_url();
        tracing::debug!(url = %url, "Fetching signing keys");

        let set: KeySet = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| fetch_failed(&e))?
            .json()
            .await
            .map_err(|e| fetch_failed(&e))?;

        let keys: HashMap<String, DecodingKey> = set
            .keys
            .iter()
            .filter_map(|jwk| Some((jwk.kid.clone()?, jwk.decoding_key()?)))
            .collect();

        tracing::info!(count = keys.len(), "Signing keys refreshed");

        *self.cache.write() = KeyCache {
            keys,
            fetched_at: Some(Instant::now()),
        };
        Ok(())
    }
}
