//! Identity provider settings.

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://auth.example.com";
const DEFAULT_AUDIENCE: &str = "amplify";
const DEFAULT_REFRESH_SECONDS: u64 = 300;

/// Where tokens come from and who they must be addressed to.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the identity provider. Tokens must name it as `iss`.
    pub base_url: String,
    /// Expected `aud` claim.
    pub audience: String,
    /// Maximum age of the cached key set, in seconds.
    pub jwks_refresh_seconds: u64,
}

impl AuthConfig {
    /// Read `AUTH_BASE_URL`, `AUTH_AUDIENCE` and `AUTH_JWKS_REFRESH_SECONDS`
    /// from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the settings from a variable lookup.
    ///
    /// Blank or unparsable values keep their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: var("AUTH_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            audience: var("AUTH_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            jwks_refresh_seconds: var("AUTH_JWKS_REFRESH_SECONDS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_REFRESH_SECONDS),
        }
    }

    /// The key set endpoint, `<base>/.well-known/jwks.json`.
    #[must_use]
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.base_url.trim_end_matches('/'))
    }

    /// The issuer tokens must carry.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.base_url
    }

    /// How long cached keys stay fresh.
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.jwks_refresh_seconds)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = AuthConfig::default();
        assert_eq!(config.base_url, "https://auth.example.com");
        assert_eq!(config.audience, "amplify");
        assert_eq!(config.refresh_interval(), Duration::from_secs(300));
    }

    #[test]
    fn reads_lookup_values() {
        let config = AuthConfig::from_lookup(|key| match key {
            "AUTH_BASE_URL" => Some("https://id.example.org".to_string()),
            "AUTH_AUDIENCE" => Some("campaigns".to_string()),
            "AUTH_JWKS_REFRESH_SECONDS" => Some("60".to_string()),
            _ => None,
        });
        assert_eq!(config.issuer(), "https://id.example.org");
        assert_eq!(config.audience, "campaigns");
        assert_eq!(config.jwks_refresh_seconds, 60);
    }

    #[test]
    fn bad_refresh_value_keeps_default() {
        let config = AuthConfig::from_lookup(|key| {
            (key == "AUTH_JWKS_REFRESH_SECONDS").then(|| "soon".to_string())
        });
        assert_eq!(config.jwks_refresh_seconds, 300);
    }

    #[test]
    fn jwks_url_ignores_trailing_slash() {
        let config = AuthConfig {
            base_url: "https://id.example.org/".to_string(),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.jwks_url(),
            "https://id.example.org/.well-known/jwks.json"
        );
    }
}
