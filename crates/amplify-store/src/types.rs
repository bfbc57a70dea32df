//! Domain types stored in the database.
//!
//! These types represent the persisted rows of every table: organizations,
//! memberships, profiles, and the tenant-scoped influencer, campaign,
//! campaign-influencer, and content records.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use amplify_core::{CampaignId, ContentId, InfluencerId, LinkId, OrganizationId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidEnumValue;

/// Declares a closed string enumeration with `FromStr`, `Display`, and a
/// list of every accepted value.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The wire and storage representation of this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(InvalidEnumValue {
                        kind: $kind,
                        value: other.to_string(),
                        expected: Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", "),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    /// Role of a user within an organization.
    Role ("role") {
        /// Full control, including deleting the organization.
        Owner => "owner",
        /// May edit the organization and manage its members.
        Admin => "admin",
        /// May read and write the organization's records.
        Member => "member",
    }
}

impl Role {
    /// Whether this role may edit the organization and manage members.
    #[must_use]
    pub const fn can_manage(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

closed_enum! {
    /// Lifecycle status of a campaign.
    CampaignStatus ("campaign status") {
        /// Being planned, not yet running.
        Draft => "draft",
        /// Currently running.
        Active => "active",
        /// Temporarily halted.
        Paused => "paused",
        /// Finished.
        Completed => "completed",
    }
}

impl Default for CampaignStatus {
    fn default() -> Self {
        Self::Draft
    }
}

closed_enum! {
    /// Status of an influencer's participation in a campaign.
    LinkStatus ("campaign influencer status") {
        /// Invitation sent.
        Invited => "invited",
        /// Terms under discussion.
        Negotiating => "negotiating",
        /// Terms agreed.
        Confirmed => "confirmed",
        /// Producing deliverables.
        Active => "active",
        /// All deliverables done.
        Completed => "completed",
        /// The influencer turned the campaign down.
        Declined => "declined",
    }
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::Invited
    }
}

closed_enum! {
    /// Publication status of a content item.
    ContentStatus ("content status") {
        /// Idea stage, no date yet.
        Planned => "planned",
        /// Has a publication date.
        Scheduled => "scheduled",
        /// Live on the platform.
        Published => "published",
        /// Taken down or retired.
        Archived => "archived",
    }
}

impl Default for ContentStatus {
    fn default() -> Self {
        Self::Planned
    }
}

/// An organization, the root tenant boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Unique identifier for the organization.
    pub organization_id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Reference to the logo image, if any.
    pub logo_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A grant of a role to a user within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// The organization the grant applies to.
    pub organization_id: OrganizationId,
    /// The user holding the grant.
    pub user_id: UserId,
    /// The granted role.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Per-user profile, created on first authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The user this profile belongs to.
    pub user_id: UserId,
    /// Email address reported by the identity provider.
    pub email: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Current organization context, if one has been selected.
    pub organization_id: Option<OrganizationId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An influencer tracked by an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    /// Unique identifier for the influencer.
    pub influencer_id: InfluencerId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Social handles keyed by platform (e.g. `instagram` → `@alice`).
    pub social_handles: BTreeMap<String, String>,
    /// Category tags.
    pub categories: BTreeSet<String>,
    /// Free-form audience demographics.
    pub audience_demographics: serde_json::Value,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A marketing campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// Unique identifier for the campaign.
    pub campaign_id: CampaignId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Campaign name.
    pub name: String,
    /// Longer description.
    pub description: Option<String>,
    /// First day of the campaign.
    pub start_date: Option<NaiveDate>,
    /// Last day of the campaign.
    pub end_date: Option<NaiveDate>,
    /// Budget in minor currency units.
    pub budget_cents: Option<u64>,
    /// Current status.
    pub status: CampaignStatus,
    /// Free-form goal data.
    pub goals: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// The link between a campaign and an influencer participating in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignInfluencer {
    /// Unique identifier for the link.
    pub link_id: LinkId,
    /// Organization of the campaign (and influencer).
    pub organization_id: OrganizationId,
    /// The campaign.
    pub campaign_id: CampaignId,
    /// The participating influencer.
    pub influencer_id: InfluencerId,
    /// Participation status.
    pub status: LinkStatus,
    /// Compensation terms.
    pub compensation: serde_json::Value,
    /// Agreed deliverables.
    pub deliverables: Vec<String>,
    /// Tracking links handed to the influencer.
    pub tracking_links: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A piece of content produced under a campaign-influencer link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Unique identifier for the content item.
    pub content_id: ContentId,
    /// Organization of the owning link.
    pub organization_id: OrganizationId,
    /// The owning campaign-influencer link.
    pub link_id: LinkId,
    /// Platform the content is published on.
    pub platform: String,
    /// Kind of content (post, story, video, ...).
    pub content_type: String,
    /// Public URL once known.
    pub url: Option<String>,
    /// Planned publication time.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Actual publication time.
    pub published_at: Option<DateTime<Utc>>,
    /// Current status.
    pub status: ContentStatus,
    /// Free-form performance metrics.
    pub metrics: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
