//! API response types for the gateway client.
//!
//! These types mirror the JSON the gateway returns. Enumerated values such
//! as statuses stay plain strings here; the client only displays them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Caller
// =============================================================================

/// The calling user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// User ID.
    pub user_id: String,
    /// Email address.
    pub email: String,
    /// Optional display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Current organization, if one is selected.
    #[serde(default)]
    pub organization_id: Option<String>,
}

/// Request to switch the current organization.
#[derive(Debug, Serialize)]
pub struct SwitchOrganizationRequest {
    /// The organization to make current.
    pub organization_id: String,
}

// =============================================================================
// Tenant records
// =============================================================================

/// An organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID.
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Optional logo reference.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An influencer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Influencer {
    /// Influencer ID.
    pub influencer_id: String,
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
    pub categories: Vec<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    /// Campaign ID.
    pub campaign_id: String,
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
    /// Lifecycle status.
    pub status: String,
}

/// An influencer's participation in a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignInfluencer {
    /// Link ID.
    pub link_id: String,
    /// Campaign ID.
    pub campaign_id: String,
    /// Influencer ID.
    pub influencer_id: String,
    /// Participation status.
    pub status: String,
    /// Compensation terms.
    #[serde(default)]
    pub compensation: Value,
    /// Agreed deliverables.
    #[serde(default)]
    pub deliverables: Vec<String>,
}

/// A content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Content ID.
    pub content_id: String,
    /// Owning link.
    pub link_id: String,
    /// Platform.
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
    /// Lifecycle status.
    pub status: String,
}

// =============================================================================
// List envelopes
// =============================================================================

/// `GET /v1/organizations`.
#[derive(Debug, Deserialize)]
pub struct ListOrganizationsResponse {
    /// Organizations.
    pub organizations: Vec<Organization>,
}

/// `GET /v1/influencers`.
#[derive(Debug, Deserialize)]
pub struct ListInfluencersResponse {
    /// Influencers.
    pub influencers: Vec<Influencer>,
}

/// `GET /v1/campaigns`.
#[derive(Debug, Deserialize)]
pub struct ListCampaignsResponse {
    /// Campaigns.
    pub campaigns: Vec<Campaign>,
}

/// `GET /v1/campaigns/:id/influencers`.
#[derive(Debug, Deserialize)]
pub struct ListLinksResponse {
    /// Links.
    pub influencers: Vec<CampaignInfluencer>,
}

/// `GET /v1/content` and `GET /v1/campaign-influencers/:id/content`.
#[derive(Debug, Deserialize)]
pub struct ListContentResponse {
    /// Content items.
    pub content: Vec<Content>,
}

// =============================================================================
// Errors
// =============================================================================

/// Error envelope returned by the gateway.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
