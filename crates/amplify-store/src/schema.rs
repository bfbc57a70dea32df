//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage. Every
//! table has a primary family keyed by its own 16-byte ID; secondary indexes
//! are keyed by `parent_id || child_id` with empty values so that prefix scans
//! enumerate children.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Organization records, keyed by `organization_id`.
    pub const ORGANIZATIONS: &str = "organizations";

    /// Membership records, keyed by `organization_id || user_id`.
    pub const MEMBERSHIPS: &str = "memberships";

    /// Index: memberships by user, keyed by `user_id || organization_id`.
    pub const MEMBERSHIPS_BY_USER: &str = "memberships_by_user";

    /// Profile records, keyed by `user_id`.
    pub const PROFILES: &str = "profiles";

    /// Influencer records, keyed by `influencer_id`.
    pub const INFLUENCERS: &str = "influencers";

    /// Index: influencers by organization, keyed by `organization_id || influencer_id`.
    pub const INFLUENCERS_BY_ORG: &str = "influencers_by_org";

    /// Campaign records, keyed by `campaign_id`.
    pub const CAMPAIGNS: &str = "campaigns";

    /// Index: campaigns by organization, keyed by `organization_id || campaign_id`.
    pub const CAMPAIGNS_BY_ORG: &str = "campaigns_by_org";

    /// Campaign-influencer link records, keyed by `link_id`.
    pub const LINKS: &str = "campaign_influencers";

    /// Index: links by campaign, keyed by `campaign_id || link_id`.
    pub const LINKS_BY_CAMPAIGN: &str = "links_by_campaign";

    /// Index: links by influencer, keyed by `influencer_id || link_id`.
    pub const LINKS_BY_INFLUENCER: &str = "links_by_influencer";

    /// Unique index: `campaign_id || influencer_id` mapped to the `link_id`.
    pub const LINKS_BY_PAIR: &str = "links_by_pair";

    /// Content records, keyed by `content_id`.
    pub const CONTENT: &str = "content";

    /// Index: content by link, keyed by `link_id || content_id`.
    pub const CONTENT_BY_LINK: &str = "content_by_link";

    /// Index: content by organization, keyed by `organization_id || content_id`.
    pub const CONTENT_BY_ORG: &str = "content_by_org";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ORGANIZATIONS,
        cf::MEMBERSHIPS,
        cf::MEMBERSHIPS_BY_USER,
        cf::PROFILES,
        cf::INFLUENCERS,
        cf::INFLUENCERS_BY_ORG,
        cf::CAMPAIGNS,
        cf::CAMPAIGNS_BY_ORG,
        cf::LINKS,
        cf::LINKS_BY_CAMPAIGN,
        cf::LINKS_BY_INFLUENCER,
        cf::LINKS_BY_PAIR,
        cf::CONTENT,
        cf::CONTENT_BY_LINK,
        cf::CONTENT_BY_ORG,
    ]
}
