//! `RocksDB` storage layer for amplify.
//!
//! This crate provides persistent storage for organizations, memberships,
//! profiles, and the tenant-scoped influencer, campaign, campaign-influencer,
//! and content tables, using `RocksDB` column families for secondary indexes.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `organizations`, `memberships`, `memberships_by_user`, `profiles`
//! - `influencers` + `influencers_by_org`
//! - `campaigns` + `campaigns_by_org`
//! - `campaign_influencers` + `links_by_campaign`, `links_by_influencer`,
//!   and the unique `links_by_pair` index
//! - `content` + `content_by_link`, `content_by_org`
//!
//! Referential integrity lives here: writes whose parent rows are missing fail
//! with [`StoreError::MissingReference`], duplicate campaign-influencer pairs
//! fail with [`StoreError::Conflict`], and deleting a parent removes its
//! dependents in the same atomic write batch.
//!
//! # Example
//!
//! ```no_run
//! use amplify_store::{RocksStore, Store};
//! use amplify_core::OrganizationId;
//!
//! let store = RocksStore::open("/tmp/amplify-db").unwrap();
//!
//! // List campaigns for an organization
//! let organization_id = OrganizationId::generate();
//! let campaigns = store.list_campaigns_by_organization(&organization_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;
pub mod types;

pub use error::{InvalidEnumValue, Result, StoreError};
pub use rocks::RocksStore;
pub use types::{
    Campaign, CampaignInfluencer, CampaignStatus, Content, ContentStatus, Influencer, LinkStatus,
    Membership, Organization, Profile, Role,
};

use amplify_core::{CampaignId, ContentId, InfluencerId, LinkId, OrganizationId, UserId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer. Every mutating method is a single
/// atomic write: either all of its effects (including cascades and index
/// maintenance) are applied or none are.
///
/// The checks a mutation depends on (row still present, references, the
/// unique pair, the last owner) are made inside that same atomic step, so
/// `update_*` never brings back a row that a concurrent delete removed.
pub trait Store: Send + Sync {
    // =========================================================================
    // Organization Operations
    // =========================================================================

    /// Insert or update an organization record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_organization(&self, organization: &Organization) -> Result<()>;

    /// Replace an existing organization record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the organization no longer exists.
    fn update_organization(&self, organization: &Organization) -> Result<()>;

    /// Create an organization together with its first owner membership.
    ///
    /// If the owner has a profile without a current organization, the new
    /// organization becomes the current one. All of it is one write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the organization already exists.
    fn create_organization(&self, organization: &Organization, owner: &Membership) -> Result<()>;

    /// Get an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_organization(&self, organization_id: &OrganizationId) -> Result<Option<Organization>>;

    /// Delete an organization together with every row it owns.
    ///
    /// Memberships, influencers, campaigns, links, and content are removed, and
    /// profiles whose current organization was this one are cleared.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the organization doesn't exist.
    fn delete_organization(&self, organization_id: &OrganizationId) -> Result<()>;

    // =========================================================================
    // Membership Operations
    // =========================================================================

    /// Insert a new membership.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingReference` if the organization doesn't exist
    /// and `StoreError::Conflict` if the user is already a member.
    fn put_membership(&self, membership: &Membership) -> Result<()>;

    /// Change the role of an existing membership.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the membership doesn't exist and
    /// `StoreError::Conflict` if it would demote the organization's last owner.
    fn update_membership_role(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Membership>;

    /// Get the membership of a user in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_membership(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<Option<Membership>>;

    /// Delete a membership.
    ///
    /// If the user's profile pointed at this organization, its current
    /// organization is cleared in the same write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the membership doesn't exist and
    /// `StoreError::Conflict` if it belongs to the organization's last owner.
    fn delete_membership(&self, organization_id: &OrganizationId, user_id: &UserId) -> Result<()>;

    /// List all memberships of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_memberships_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Membership>>;

    /// List all memberships held by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_memberships_by_user(&self, user_id: &UserId) -> Result<Vec<Membership>>;

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Insert or update a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_profile(&self, profile: &Profile) -> Result<()>;

    /// Create the user's profile, or set its email if it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn ensure_profile(&self, user_id: &UserId, email: &str) -> Result<Profile>;

    /// Point the user's profile at an organization they belong to.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the profile doesn't exist and
    /// `StoreError::MissingReference` if the user holds no membership in the
    /// organization.
    fn set_current_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Profile>;

    /// Get a profile by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>>;

    // =========================================================================
    // Influencer Operations
    // =========================================================================

    /// Insert or update an influencer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingReference` if the organization doesn't exist.
    fn put_influencer(&self, influencer: &Influencer) -> Result<()>;

    /// Replace an existing influencer record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record no longer exists and
    /// `StoreError::MissingReference` if the organization doesn't.
    fn update_influencer(&self, influencer: &Influencer) -> Result<()>;

    /// Get an influencer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_influencer(&self, influencer_id: &InfluencerId) -> Result<Option<Influencer>>;

    /// Delete an influencer, its campaign links, and their content.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the influencer doesn't exist.
    fn delete_influencer(&self, influencer_id: &InfluencerId) -> Result<()>;

    /// List the influencers of an organization, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_influencers_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Influencer>>;

    // =========================================================================
    // Campaign Operations
    // =========================================================================

    /// Insert or update a campaign.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingReference` if the organization doesn't exist.
    fn put_campaign(&self, campaign: &Campaign) -> Result<()>;

    /// Replace an existing campaign record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record no longer exists and
    /// `StoreError::MissingReference` if the organization doesn't.
    fn update_campaign(&self, campaign: &Campaign) -> Result<()>;

    /// Get a campaign by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_campaign(&self, campaign_id: &CampaignId) -> Result<Option<Campaign>>;

    /// Delete a campaign, its influencer links, and their content.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the campaign doesn't exist.
    fn delete_campaign(&self, campaign_id: &CampaignId) -> Result<()>;

    /// List the campaigns of an organization, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_campaigns_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Campaign>>;

    // =========================================================================
    // Campaign-Influencer Operations
    // =========================================================================

    /// Insert or update a campaign-influencer link.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingReference` if the campaign or influencer
    /// doesn't exist, and `StoreError::Conflict` if another link already
    /// joins the same pair.
    fn put_campaign_influencer(&self, link: &CampaignInfluencer) -> Result<()>;

    /// Replace an existing campaign influencer record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record no longer exists and
    /// `StoreError::MissingReference` if the campaign or influencer doesn't.
    fn update_campaign_influencer(&self, link: &CampaignInfluencer) -> Result<()>;

    /// Get a campaign-influencer link by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_campaign_influencer(&self, link_id: &LinkId) -> Result<Option<CampaignInfluencer>>;

    /// Find the link joining a campaign and an influencer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_campaign_influencer(
        &self,
        campaign_id: &CampaignId,
        influencer_id: &InfluencerId,
    ) -> Result<Option<CampaignInfluencer>>;

    /// Delete a campaign-influencer link and its content.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the link doesn't exist.
    fn delete_campaign_influencer(&self, link_id: &LinkId) -> Result<()>;

    /// List the links of a campaign, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_campaign_influencers_by_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<CampaignInfluencer>>;

    /// List the links of an influencer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_campaign_influencers_by_influencer(
        &self,
        influencer_id: &InfluencerId,
    ) -> Result<Vec<CampaignInfluencer>>;

    // =========================================================================
    // Content Operations
    // =========================================================================

    /// Insert or update a content item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MissingReference` if the link doesn't exist.
    fn put_content(&self, content: &Content) -> Result<()>;

    /// Replace an existing content record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record no longer exists and
    /// `StoreError::MissingReference` if the link doesn't.
    fn update_content(&self, content: &Content) -> Result<()>;

    /// Get a content item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_content(&self, content_id: &ContentId) -> Result<Option<Content>>;

    /// Delete a content item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the content item doesn't exist.
    fn delete_content(&self, content_id: &ContentId) -> Result<()>;

    /// List the content of a campaign-influencer link, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_content_by_link(&self, link_id: &LinkId) -> Result<Vec<Content>>;

    /// List all content of an organization, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_content_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Content>>;
}
