//! Request payloads for facade operations and their validation.
//!
//! Drafts carry user input as it arrives from the outside world: statuses
//! and roles are plain strings here and are parsed into their closed
//! enumerations during validation.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use amplify_store::InvalidEnumValue;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FacadeError, Result};

/// Maximum length of a name after trimming, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Payload for creating or replacing an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    /// Display name.
    pub name: String,
    /// Optional logo reference.
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewOrganization {
    /// Create a payload with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logo_url: None,
        }
    }
}

/// Payload for creating or replacing an influencer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfluencerDraft {
    /// Full name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Handles keyed by platform.
    #[serde(default)]
    pub social_handles: BTreeMap<String, String>,
    /// Category tags.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Free-form audience demographics.
    #[serde(default)]
    pub audience_demographics: serde_json::Value,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl InfluencerDraft {
    /// Create a draft with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Payload for creating or replacing a campaign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignDraft {
    /// Campaign name.
    pub name: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// First day.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Budget in minor currency units.
    #[serde(default)]
    pub budget_cents: Option<u64>,
    /// Status; `draft` on create and unchanged on update when omitted.
    #[serde(default)]
    pub status: Option<String>,
    /// Free-form goals.
    #[serde(default)]
    pub goals: serde_json::Value,
}

impl CampaignDraft {
    /// Create a draft with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Payload for linking an influencer to a campaign or replacing the link terms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkDraft {
    /// Status; `invited` on create and unchanged on update when omitted.
    #[serde(default)]
    pub status: Option<String>,
    /// Compensation terms.
    #[serde(default)]
    pub compensation: serde_json::Value,
    /// Agreed deliverables.
    #[serde(default)]
    pub deliverables: Vec<String>,
    /// Tracking links.
    #[serde(default)]
    pub tracking_links: Vec<String>,
}

/// Payload for creating or replacing a content item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentDraft {
    /// Platform the content goes out on.
    pub platform: String,
    /// Kind of content.
    pub content_type: String,
    /// Public URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Planned publication time.
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Actual publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Status; `planned` on create and unchanged on update when omitted.
    #[serde(default)]
    pub status: Option<String>,
    /// Free-form metrics.
    #[serde(default)]
    pub metrics: serde_json::Value,
}

impl ContentDraft {
    /// Create a draft for the given platform and content type.
    #[must_use]
    pub fn new(platform: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            content_type: content_type.into(),
            ..Self::default()
        }
    }
}

// =============================================================================
// Validation helpers
// =============================================================================

/// Trim a required name and check its length.
pub(crate) fn name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(FacadeError::Validation(format!("{field} must not be empty")));
    }
    if len > MAX_NAME_LEN {
        return Err(FacadeError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim an email address and require an `@`.
pub(crate) fn email(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if !trimmed.contains('@') {
        return Err(FacadeError::Validation(format!(
            "{field} must be an email address"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional_email(field: &str, value: Option<String>) -> Result<Option<String>> {
    optional_text(value).map(|v| email(field, &v)).transpose()
}

/// Require an `http://` or `https://` URL.
pub(crate) fn url(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(FacadeError::Validation(format!(
            "{field} must start with http:// or https://"
        )))
    }
}

pub(crate) fn optional_url(field: &str, value: Option<String>) -> Result<Option<String>> {
    optional_text(value).map(|v| url(field, &v)).transpose()
}

pub(crate) fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(FacadeError::Validation(format!(
            "end date {end} precedes start date {start}"
        ))),
        _ => Ok(()),
    }
}

/// Parse an optional enumeration value, falling back to `current`.
pub(crate) fn parse_or<T>(value: Option<&str>, current: T) -> Result<T>
where
    T: FromStr<Err = InvalidEnumValue>,
{
    match value {
        Some(v) => Ok(v.parse()?),
        None => Ok(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amplify_store::CampaignStatus;

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(name("name", "  Acme  ").unwrap(), "Acme");
        assert!(name("name", "   ").is_err());
        assert!(name("name", &"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(name("name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
        // Length counts characters, not bytes
        assert!(name("name", &"é".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn email_requires_at_sign() {
        assert_eq!(email("email", " a@b.co ").unwrap(), "a@b.co");
        assert!(email("email", "nobody").is_err());
        assert_eq!(optional_email("email", Some("  ".into())).unwrap(), None);
    }

    #[test]
    fn urls_require_http_scheme() {
        assert!(url("url", "https://example.com/p/1").is_ok());
        assert!(url("url", "http://example.com").is_ok());
        assert!(url("url", "ftp://example.com").is_err());
        assert!(url("url", "example.com").is_err());
        assert_eq!(optional_url("url", None).unwrap(), None);
    }

    #[test]
    fn end_date_may_not_precede_start() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(date_range(Some(d("2026-01-01")), Some(d("2026-01-01"))).is_ok());
        assert!(date_range(Some(d("2026-01-02")), Some(d("2026-01-01"))).is_err());
        assert!(date_range(None, Some(d("2026-01-01"))).is_ok());
    }

    #[test]
    fn parse_or_keeps_current_when_absent() {
        assert_eq!(
            parse_or(None, CampaignStatus::Paused).unwrap(),
            CampaignStatus::Paused
        );
        assert_eq!(
            parse_or(Some("active"), CampaignStatus::Draft).unwrap(),
            CampaignStatus::Active
        );
        assert!(matches!(
            parse_or::<CampaignStatus>(Some("bogus"), CampaignStatus::Draft),
            Err(FacadeError::Validation(_))
        ));
    }

    #[test]
    fn drafts_deserialize_with_defaults() {
        let draft: InfluencerDraft = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(draft.name, "Ada");
        assert!(draft.social_handles.is_empty());
        assert!(draft.audience_demographics.is_null());
    }
}
