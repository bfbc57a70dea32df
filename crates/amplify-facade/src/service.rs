//! Facade service implementation.
//!
//! This module provides the `Facade` trait and the `FacadeService`
//! implementation that validates input, authorizes the acting user against
//! the row's organization, and performs the store write.

use std::fmt::Display;
use std::sync::Arc;

use amplify_core::{CampaignId, ContentId, InfluencerId, LinkId, OrganizationId, UserId};
use amplify_store::{
    Campaign, CampaignInfluencer, CampaignStatus, Content, ContentStatus, Influencer, LinkStatus,
    Membership, Organization, Profile, Role, Store, StoreError,
};
use async_trait::async_trait;
use chrono::Utc;

use crate::authz::{Authorizer, MembershipAuthorizer};
use crate::error::{FacadeError, Result};
use crate::types::{
    self, CampaignDraft, ContentDraft, InfluencerDraft, LinkDraft, NewOrganization,
};

/// Trait defining every operation available to an authenticated user.
///
/// Each operation takes the acting user first. Tenant-scoped operations are
/// authorized against the organization of the addressed row before anything
/// is written.
#[async_trait]
pub trait Facade: Send + Sync {
    // =========================================================================
    // Profile
    // =========================================================================

    /// Create the user's profile on first sight, or refresh its email.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Validation` if the email is malformed.
    async fn ensure_profile(&self, user_id: &UserId, email: &str) -> Result<Profile>;

    /// Get the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::NotFound` if the profile was never created.
    async fn get_profile(&self, user_id: &UserId) -> Result<Profile>;

    /// Make an organization the user's current context.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Authorization` if the user is not a member.
    async fn switch_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Profile>;

    // =========================================================================
    // Organizations
    // =========================================================================

    /// Create an organization owned by the acting user.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Validation` if the name is invalid.
    async fn create_organization(
        &self,
        user_id: &UserId,
        request: NewOrganization,
    ) -> Result<Organization>;

    /// Get an organization the user belongs to.
    async fn get_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Organization>;

    /// Replace an organization's name and logo. Requires owner or admin.
    async fn update_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        request: NewOrganization,
    ) -> Result<Organization>;

    /// Delete an organization and everything it owns. Requires owner.
    async fn delete_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<()>;

    /// List the organizations the user belongs to.
    async fn list_organizations(&self, user_id: &UserId) -> Result<Vec<Organization>>;

    // =========================================================================
    // Members
    // =========================================================================

    /// Grant a user a role in an organization. Requires owner or admin.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Conflict` if the user is already a member.
    async fn add_member(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        member_id: &UserId,
        role: &str,
    ) -> Result<Membership>;

    /// Change a member's role. Requires owner or admin.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Conflict` when demoting the last owner.
    async fn update_member_role(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        member_id: &UserId,
        role: &str,
    ) -> Result<Membership>;

    /// Remove a member. Any member may remove themselves.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Conflict` when removing the last owner.
    async fn remove_member(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        member_id: &UserId,
    ) -> Result<()>;

    /// List an organization's members.
    async fn list_members(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Membership>>;

    // =========================================================================
    // Influencers
    // =========================================================================

    /// Create an influencer in an organization.
    async fn create_influencer(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        draft: InfluencerDraft,
    ) -> Result<Influencer>;

    /// Get an influencer.
    async fn get_influencer(
        &self,
        user_id: &UserId,
        influencer_id: &InfluencerId,
    ) -> Result<Influencer>;

    /// Replace an influencer's fields.
    async fn update_influencer(
        &self,
        user_id: &UserId,
        influencer_id: &InfluencerId,
        draft: InfluencerDraft,
    ) -> Result<Influencer>;

    /// Delete an influencer with its campaign links and their content.
    async fn delete_influencer(&self, user_id: &UserId, influencer_id: &InfluencerId)
        -> Result<()>;

    /// List the influencers of the user's current organization.
    async fn list_influencers(&self, user_id: &UserId) -> Result<Vec<Influencer>>;

    // =========================================================================
    // Campaigns
    // =========================================================================

    /// Create a campaign in an organization.
    async fn create_campaign(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        draft: CampaignDraft,
    ) -> Result<Campaign>;

    /// Get a campaign.
    async fn get_campaign(&self, user_id: &UserId, campaign_id: &CampaignId) -> Result<Campaign>;

    /// Replace a campaign's fields.
    async fn update_campaign(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        draft: CampaignDraft,
    ) -> Result<Campaign>;

    /// Change a campaign's status.
    async fn set_campaign_status(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        status: &str,
    ) -> Result<Campaign>;

    /// Delete a campaign with its influencer links and their content.
    async fn delete_campaign(&self, user_id: &UserId, campaign_id: &CampaignId) -> Result<()>;

    /// List the campaigns of the user's current organization.
    async fn list_campaigns(&self, user_id: &UserId) -> Result<Vec<Campaign>>;

    // =========================================================================
    // Campaign influencers
    // =========================================================================

    /// Link an influencer to a campaign of the same organization.
    ///
    /// # Errors
    ///
    /// Returns `FacadeError::Conflict` if the pair is already linked.
    async fn add_campaign_influencer(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        influencer_id: &InfluencerId,
        draft: LinkDraft,
    ) -> Result<CampaignInfluencer>;

    /// Get a campaign-influencer link.
    async fn get_campaign_influencer(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
    ) -> Result<CampaignInfluencer>;

    /// Replace a link's terms.
    async fn update_campaign_influencer(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        draft: LinkDraft,
    ) -> Result<CampaignInfluencer>;

    /// Change a link's status.
    async fn set_campaign_influencer_status(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        status: &str,
    ) -> Result<CampaignInfluencer>;

    /// Remove a link and its content.
    async fn remove_campaign_influencer(&self, user_id: &UserId, link_id: &LinkId) -> Result<()>;

    /// List the influencer links of a campaign.
    async fn list_campaign_influencers(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
    ) -> Result<Vec<CampaignInfluencer>>;

    // =========================================================================
    // Content
    // =========================================================================

    /// Create a content item under a campaign-influencer link.
    async fn create_content(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        draft: ContentDraft,
    ) -> Result<Content>;

    /// Get a content item.
    async fn get_content(&self, user_id: &UserId, content_id: &ContentId) -> Result<Content>;

    /// Replace a content item's fields.
    async fn update_content(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        draft: ContentDraft,
    ) -> Result<Content>;

    /// Change a content item's status.
    async fn set_content_status(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        status: &str,
    ) -> Result<Content>;

    /// Delete a content item.
    async fn delete_content(&self, user_id: &UserId, content_id: &ContentId) -> Result<()>;

    /// The content calendar of the user's current organization, ordered by
    /// scheduled time with unscheduled items last.
    async fn list_content(&self, user_id: &UserId) -> Result<Vec<Content>>;

    /// List the content of one campaign-influencer link.
    async fn list_content_for_link(&self, user_id: &UserId, link_id: &LinkId)
        -> Result<Vec<Content>>;
}

/// The facade implementation over a store and an authorizer.
pub struct FacadeService<S: Store, A: Authorizer> {
    store: Arc<S>,
    authz: A,
}

impl<S: Store, A: Authorizer> FacadeService<S, A> {
    /// Create a new facade service.
    #[must_use]
    pub const fn new(store: Arc<S>, authz: A) -> Self {
        Self { store, authz }
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn require_role(&self, user_id: &UserId, organization_id: &OrganizationId) -> Result<Role> {
        self.authz
            .role_of(user_id, organization_id)?
            .ok_or_else(|| {
                FacadeError::Authorization(format!(
                    "user {user_id} is not a member of organization {organization_id}"
                ))
            })
    }

    fn require_access(&self, user_id: &UserId, organization_id: &OrganizationId) -> Result<()> {
        if self.authz.can_access(user_id, organization_id)? {
            Ok(())
        } else {
            Err(FacadeError::Authorization(format!(
                "user {user_id} is not a member of organization {organization_id}"
            )))
        }
    }

    fn require_manager(&self, user_id: &UserId, organization_id: &OrganizationId) -> Result<Role> {
        let role = self.require_role(user_id, organization_id)?;
        if !role.can_manage() {
            return Err(FacadeError::Authorization(format!(
                "managing organization {organization_id} requires owner or admin"
            )));
        }
        Ok(role)
    }

    /// The organization list operations are implicitly scoped to.
    fn current_organization(&self, user_id: &UserId) -> Result<OrganizationId> {
        let organization_id = self
            .store
            .get_profile(user_id)?
            .and_then(|p| p.organization_id)
            .ok_or_else(|| {
                FacadeError::Validation("no current organization selected".to_string())
            })?;

        self.require_access(user_id, &organization_id)?;
        Ok(organization_id)
    }

    fn load_organization(&self, organization_id: &OrganizationId) -> Result<Organization> {
        self.store
            .get_organization(organization_id)?
            .ok_or_else(|| FacadeError::not_found("organization", organization_id))
    }

    fn load_membership(
        &self,
        organization_id: &OrganizationId,
        member_id: &UserId,
    ) -> Result<Membership> {
        self.store
            .get_membership(organization_id, member_id)?
            .ok_or_else(|| {
                FacadeError::NotFound(format!(
                    "membership of {member_id} in organization {organization_id}"
                ))
            })
    }

    fn load_influencer(&self, user_id: &UserId, influencer_id: &InfluencerId) -> Result<Influencer> {
        let influencer = self
            .store
            .get_influencer(influencer_id)?
            .ok_or_else(|| FacadeError::not_found("influencer", influencer_id))?;
        self.require_access(user_id, &influencer.organization_id)?;
        Ok(influencer)
    }

    fn load_campaign(&self, user_id: &UserId, campaign_id: &CampaignId) -> Result<Campaign> {
        let campaign = self
            .store
            .get_campaign(campaign_id)?
            .ok_or_else(|| FacadeError::not_found("campaign", campaign_id))?;
        self.require_access(user_id, &campaign.organization_id)?;
        Ok(campaign)
    }

    fn load_link(&self, user_id: &UserId, link_id: &LinkId) -> Result<CampaignInfluencer> {
        let link = self
            .store
            .get_campaign_influencer(link_id)?
            .ok_or_else(|| FacadeError::not_found("campaign influencer", link_id))?;
        self.require_access(user_id, &link.organization_id)?;
        Ok(link)
    }

    fn load_content(&self, user_id: &UserId, content_id: &ContentId) -> Result<Content> {
        let content = self
            .store
            .get_content(content_id)?
            .ok_or_else(|| FacadeError::not_found("content", content_id))?;
        self.require_access(user_id, &content.organization_id)?;
        Ok(content)
    }
}

impl<S: Store> FacadeService<S, MembershipAuthorizer<S>> {
    /// Create a facade authorized by the store's own membership table.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        let authz = MembershipAuthorizer::new(store.clone());
        Self::new(store, authz)
    }
}

/// A row deleted between its load and its replacement reads as not found.
fn vanished(what: &'static str, id: impl Display) -> impl FnOnce(StoreError) -> FacadeError {
    move |err| match err {
        StoreError::NotFound => FacadeError::not_found(what, id),
        other => other.into(),
    }
}

fn apply_organization(organization: &mut Organization, request: NewOrganization) -> Result<()> {
    organization.name = types::name("name", &request.name)?;
    organization.logo_url = types::optional_text(request.logo_url);
    Ok(())
}

fn apply_influencer(influencer: &mut Influencer, draft: InfluencerDraft) -> Result<()> {
    influencer.name = types::name("name", &draft.name)?;
    influencer.email = types::optional_email("email", draft.email)?;
    influencer.phone = types::optional_text(draft.phone);
    influencer.social_handles = draft.social_handles;
    influencer.categories = draft.categories;
    influencer.audience_demographics = draft.audience_demographics;
    influencer.notes = types::optional_text(draft.notes);
    Ok(())
}

fn apply_campaign(campaign: &mut Campaign, draft: CampaignDraft) -> Result<()> {
    types::date_range(draft.start_date, draft.end_date)?;
    campaign.name = types::name("name", &draft.name)?;
    campaign.status = types::parse_or(draft.status.as_deref(), campaign.status)?;
    campaign.description = types::optional_text(draft.description);
    campaign.start_date = draft.start_date;
    campaign.end_date = draft.end_date;
    campaign.budget_cents = draft.budget_cents;
    campaign.goals = draft.goals;
    Ok(())
}

fn apply_link(link: &mut CampaignInfluencer, draft: LinkDraft) -> Result<()> {
    link.status = types::parse_or(draft.status.as_deref(), link.status)?;
    link.tracking_links = draft
        .tracking_links
        .iter()
        .map(|l| types::url("tracking link", l))
        .collect::<Result<_>>()?;
    link.deliverables = draft
        .deliverables
        .into_iter()
        .filter_map(|d| types::optional_text(Some(d)))
        .collect();
    link.compensation = draft.compensation;
    Ok(())
}

fn apply_content(content: &mut Content, draft: ContentDraft) -> Result<()> {
    content.platform = types::name("platform", &draft.platform)?;
    content.content_type = types::name("content type", &draft.content_type)?;
    content.url = types::optional_url("url", draft.url)?;
    content.status = types::parse_or(draft.status.as_deref(), content.status)?;
    content.scheduled_at = draft.scheduled_at;
    content.published_at = draft.published_at;
    content.metrics = draft.metrics;
    Ok(())
}

#[async_trait]
impl<S: Store + 'static, A: Authorizer + 'static> Facade for FacadeService<S, A> {
    // =========================================================================
    // Profile
    // =========================================================================

    async fn ensure_profile(&self, user_id: &UserId, email: &str) -> Result<Profile> {
        let email = types::email("email", email)?;
        Ok(self.store.ensure_profile(user_id, &email)?)
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Profile> {
        self.store
            .get_profile(user_id)?
            .ok_or_else(|| FacadeError::not_found("profile", user_id))
    }

    async fn switch_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Profile> {
        self.load_organization(organization_id)?;
        self.require_access(user_id, organization_id)?;

        let profile = self
            .store
            .set_current_organization(user_id, organization_id)
            .map_err(|err| match err {
                StoreError::MissingReference(_) => FacadeError::Authorization(format!(
                    "user {user_id} is not a member of organization {organization_id}"
                )),
                other => vanished("profile", user_id)(other),
            })?;

        tracing::info!(
            user_id = %user_id,
            organization_id = %organization_id,
            "Switched current organization"
        );

        Ok(profile)
    }

    // =========================================================================
    // Organizations
    // =========================================================================

    async fn create_organization(
        &self,
        user_id: &UserId,
        request: NewOrganization,
    ) -> Result<Organization> {
        let now = Utc::now();
        let mut organization = Organization {
            organization_id: OrganizationId::generate(),
            name: String::new(),
            logo_url: None,
            created_at: now,
            updated_at: now,
        };
        apply_organization(&mut organization, request)?;

        let owner = Membership {
            organization_id: organization.organization_id,
            user_id: *user_id,
            role: Role::Owner,
            created_at: now,
            updated_at: now,
        };

        self.store.create_organization(&organization, &owner)?;

        tracing::info!(
            organization_id = %organization.organization_id,
            user_id = %user_id,
            name = %organization.name,
            "Created organization"
        );

        Ok(organization)
    }

    async fn get_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Organization> {
        let organization = self.load_organization(organization_id)?;
        self.require_access(user_id, organization_id)?;
        Ok(organization)
    }

    async fn update_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        request: NewOrganization,
    ) -> Result<Organization> {
        let mut organization = self.load_organization(organization_id)?;
        self.require_manager(user_id, organization_id)?;

        apply_organization(&mut organization, request)?;
        organization.updated_at = Utc::now();
        self.store
            .update_organization(&organization)
            .map_err(vanished("organization", organization_id))?;

        tracing::info!(organization_id = %organization_id, "Updated organization");

        Ok(organization)
    }

    async fn delete_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<()> {
        self.load_organization(organization_id)?;
        if self.require_role(user_id, organization_id)? != Role::Owner {
            return Err(FacadeError::Authorization(format!(
                "deleting organization {organization_id} requires owner"
            )));
        }

        self.store.delete_organization(organization_id)?;

        tracing::info!(
            organization_id = %organization_id,
            user_id = %user_id,
            "Deleted organization"
        );

        Ok(())
    }

    async fn list_organizations(&self, user_id: &UserId) -> Result<Vec<Organization>> {
        let mut organizations = Vec::new();
        for membership in self.store.list_memberships_by_user(user_id)? {
            if let Some(org) = self.store.get_organization(&membership.organization_id)? {
                organizations.push(org);
            }
        }

        tracing::debug!(user_id = %user_id, count = organizations.len(), "Listed organizations");

        Ok(organizations)
    }

    // =========================================================================
    // Members
    // =========================================================================

    async fn add_member(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        member_id: &UserId,
        role: &str,
    ) -> Result<Membership> {
        let role: Role = role.parse()?;
        self.load_organization(organization_id)?;
        let actor = self.require_manager(user_id, organization_id)?;

        if role == Role::Owner && actor != Role::Owner {
            return Err(FacadeError::Authorization(
                "only owners may grant the owner role".to_string(),
            ));
        }
        if self
            .store
            .get_membership(organization_id, member_id)?
            .is_some()
        {
            return Err(FacadeError::Conflict(format!(
                "user {member_id} is already a member of organization {organization_id}"
            )));
        }

        let now = Utc::now();
        let membership = Membership {
            organization_id: *organization_id,
            user_id: *member_id,
            role,
            created_at: now,
            updated_at: now,
        };
        self.store.put_membership(&membership)?;

        tracing::info!(
            organization_id = %organization_id,
            member_id = %member_id,
            role = %role,
            "Added member"
        );

        Ok(membership)
    }

    async fn update_member_role(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        member_id: &UserId,
        role: &str,
    ) -> Result<Membership> {
        let role: Role = role.parse()?;
        let actor = self.require_manager(user_id, organization_id)?;
        let current = self.load_membership(organization_id, member_id)?;

        if actor != Role::Owner && (current.role == Role::Owner || role == Role::Owner) {
            return Err(FacadeError::Authorization(
                "only owners may change owner roles".to_string(),
            ));
        }

        let membership = self
            .store
            .update_membership_role(organization_id, member_id, role)
            .map_err(vanished("membership", member_id))?;

        tracing::info!(
            organization_id = %organization_id,
            member_id = %member_id,
            role = %role,
            "Changed member role"
        );

        Ok(membership)
    }

    async fn remove_member(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        member_id: &UserId,
    ) -> Result<()> {
        let actor = if user_id == member_id {
            self.require_role(user_id, organization_id)?
        } else {
            self.require_manager(user_id, organization_id)?
        };
        let membership = self.load_membership(organization_id, member_id)?;

        if user_id != member_id && actor != Role::Owner && membership.role == Role::Owner {
            return Err(FacadeError::Authorization(
                "only owners may remove owners".to_string(),
            ));
        }

        self.store
            .delete_membership(organization_id, member_id)
            .map_err(vanished("membership", member_id))?;

        tracing::info!(
            organization_id = %organization_id,
            member_id = %member_id,
            removed_by = %user_id,
            "Removed member"
        );

        Ok(())
    }

    async fn list_members(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Membership>> {
        self.require_access(user_id, organization_id)?;
        let members = self.store.list_memberships_by_organization(organization_id)?;
        tracing::debug!(organization_id = %organization_id, count = members.len(), "Listed members");
        Ok(members)
    }

    // =========================================================================
    // Influencers
    // =========================================================================

    async fn create_influencer(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        draft: InfluencerDraft,
    ) -> Result<Influencer> {
        self.require_access(user_id, organization_id)?;

        let now = Utc::now();
        let mut influencer = Influencer {
            influencer_id: InfluencerId::generate(),
            organization_id: *organization_id,
            name: String::new(),
            email: None,
            phone: None,
            social_handles: std::collections::BTreeMap::new(),
            categories: std::collections::BTreeSet::new(),
            audience_demographics: serde_json::Value::Null,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        apply_influencer(&mut influencer, draft)?;

        self.store.put_influencer(&influencer)?;

        tracing::info!(
            influencer_id = %influencer.influencer_id,
            organization_id = %organization_id,
            "Created influencer"
        );

        Ok(influencer)
    }

    async fn get_influencer(
        &self,
        user_id: &UserId,
        influencer_id: &InfluencerId,
    ) -> Result<Influencer> {
        let influencer = self.load_influencer(user_id, influencer_id)?;
        tracing::debug!(influencer_id = %influencer_id, "Fetched influencer");
        Ok(influencer)
    }

    async fn update_influencer(
        &self,
        user_id: &UserId,
        influencer_id: &InfluencerId,
        draft: InfluencerDraft,
    ) -> Result<Influencer> {
        let mut influencer = self.load_influencer(user_id, influencer_id)?;
        apply_influencer(&mut influencer, draft)?;
        influencer.updated_at = Utc::now();

        self.store
            .update_influencer(&influencer)
            .map_err(vanished("influencer", influencer_id))?;

        tracing::info!(influencer_id = %influencer_id, "Updated influencer");

        Ok(influencer)
    }

    async fn delete_influencer(
        &self,
        user_id: &UserId,
        influencer_id: &InfluencerId,
    ) -> Result<()> {
        self.load_influencer(user_id, influencer_id)?;
        self.store.delete_influencer(influencer_id)?;

        tracing::info!(influencer_id = %influencer_id, user_id = %user_id, "Deleted influencer");

        Ok(())
    }

    async fn list_influencers(&self, user_id: &UserId) -> Result<Vec<Influencer>> {
        let organization_id = self.current_organization(user_id)?;
        let influencers = self.store.list_influencers_by_organization(&organization_id)?;
        tracing::debug!(organization_id = %organization_id, count = influencers.len(), "Listed influencers");
        Ok(influencers)
    }

    // =========================================================================
    // Campaigns
    // =========================================================================

    async fn create_campaign(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
        draft: CampaignDraft,
    ) -> Result<Campaign> {
        self.require_access(user_id, organization_id)?;

        let now = Utc::now();
        let mut campaign = Campaign {
            campaign_id: CampaignId::generate(),
            organization_id: *organization_id,
            name: String::new(),
            description: None,
            start_date: None,
            end_date: None,
            budget_cents: None,
            status: CampaignStatus::default(),
            goals: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        };
        apply_campaign(&mut campaign, draft)?;

        self.store.put_campaign(&campaign)?;

        tracing::info!(
            campaign_id = %campaign.campaign_id,
            organization_id = %organization_id,
            name = %campaign.name,
            "Created campaign"
        );

        Ok(campaign)
    }

    async fn get_campaign(&self, user_id: &UserId, campaign_id: &CampaignId) -> Result<Campaign> {
        let campaign = self.load_campaign(user_id, campaign_id)?;
        tracing::debug!(campaign_id = %campaign_id, "Fetched campaign");
        Ok(campaign)
    }

    async fn update_campaign(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        draft: CampaignDraft,
    ) -> Result<Campaign> {
        let mut campaign = self.load_campaign(user_id, campaign_id)?;
        apply_campaign(&mut campaign, draft)?;
        campaign.updated_at = Utc::now();

        self.store
            .update_campaign(&campaign)
            .map_err(vanished("campaign", campaign_id))?;

        tracing::info!(campaign_id = %campaign_id, "Updated campaign");

        Ok(campaign)
    }

    async fn set_campaign_status(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        status: &str,
    ) -> Result<Campaign> {
        let status: CampaignStatus = status.parse()?;
        let mut campaign = self.load_campaign(user_id, campaign_id)?;
        let from = campaign.status;

        campaign.status = status;
        campaign.updated_at = Utc::now();
        self.store
            .update_campaign(&campaign)
            .map_err(vanished("campaign", campaign_id))?;

        tracing::info!(
            campaign_id = %campaign_id,
            from = %from,
            to = %status,
            "Changed campaign status"
        );

        Ok(campaign)
    }

    async fn delete_campaign(&self, user_id: &UserId, campaign_id: &CampaignId) -> Result<()> {
        self.load_campaign(user_id, campaign_id)?;
        self.store.delete_campaign(campaign_id)?;

        tracing::info!(campaign_id = %campaign_id, user_id = %user_id, "Deleted campaign");

        Ok(())
    }

    async fn list_campaigns(&self, user_id: &UserId) -> Result<Vec<Campaign>> {
        let organization_id = self.current_organization(user_id)?;
        let campaigns = self.store.list_campaigns_by_organization(&organization_id)?;
        tracing::debug!(organization_id = %organization_id, count = campaigns.len(), "Listed campaigns");
        Ok(campaigns)
    }

    // =========================================================================
    // Campaign influencers
    // =========================================================================

    async fn add_campaign_influencer(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
        influencer_id: &InfluencerId,
        draft: LinkDraft,
    ) -> Result<CampaignInfluencer> {
        let campaign = self.load_campaign(user_id, campaign_id)?;
        let influencer = self
            .store
            .get_influencer(influencer_id)?
            .ok_or_else(|| FacadeError::not_found("influencer", influencer_id))?;

        if influencer.organization_id != campaign.organization_id {
            // Don't reveal anything about an organization the user can't see
            self.require_access(user_id, &influencer.organization_id)?;
            return Err(FacadeError::Validation(format!(
                "influencer {influencer_id} and campaign {campaign_id} belong to different organizations"
            )));
        }

        let now = Utc::now();
        let mut link = CampaignInfluencer {
            link_id: LinkId::generate(),
            organization_id: campaign.organization_id,
            campaign_id: *campaign_id,
            influencer_id: *influencer_id,
            status: LinkStatus::default(),
            compensation: serde_json::Value::Null,
            deliverables: Vec::new(),
            tracking_links: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        apply_link(&mut link, draft)?;

        self.store.put_campaign_influencer(&link)?;

        tracing::info!(
            link_id = %link.link_id,
            campaign_id = %campaign_id,
            influencer_id = %influencer_id,
            "Linked influencer to campaign"
        );

        Ok(link)
    }

    async fn get_campaign_influencer(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
    ) -> Result<CampaignInfluencer> {
        let link = self.load_link(user_id, link_id)?;
        tracing::debug!(link_id = %link_id, "Fetched campaign influencer");
        Ok(link)
    }

    async fn update_campaign_influencer(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        draft: LinkDraft,
    ) -> Result<CampaignInfluencer> {
        let mut link = self.load_link(user_id, link_id)?;
        apply_link(&mut link, draft)?;
        link.updated_at = Utc::now();

        self.store
            .update_campaign_influencer(&link)
            .map_err(vanished("campaign influencer", link_id))?;

        tracing::info!(link_id = %link_id, "Updated campaign influencer");

        Ok(link)
    }

    async fn set_campaign_influencer_status(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        status: &str,
    ) -> Result<CampaignInfluencer> {
        let status: LinkStatus = status.parse()?;
        let mut link = self.load_link(user_id, link_id)?;
        let from = link.status;

        link.status = status;
        link.updated_at = Utc::now();
        self.store
            .update_campaign_influencer(&link)
            .map_err(vanished("campaign influencer", link_id))?;

        tracing::info!(
            link_id = %link_id,
            from = %from,
            to = %status,
            "Changed campaign influencer status"
        );

        Ok(link)
    }

    async fn remove_campaign_influencer(&self, user_id: &UserId, link_id: &LinkId) -> Result<()> {
        self.load_link(user_id, link_id)?;
        self.store.delete_campaign_influencer(link_id)?;

        tracing::info!(link_id = %link_id, user_id = %user_id, "Removed campaign influencer");

        Ok(())
    }

    async fn list_campaign_influencers(
        &self,
        user_id: &UserId,
        campaign_id: &CampaignId,
    ) -> Result<Vec<CampaignInfluencer>> {
        self.load_campaign(user_id, campaign_id)?;
        let links = self.store.list_campaign_influencers_by_campaign(campaign_id)?;
        tracing::debug!(campaign_id = %campaign_id, count = links.len(), "Listed campaign influencers");
        Ok(links)
    }

    // =========================================================================
    // Content
    // =========================================================================

    async fn create_content(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
        draft: ContentDraft,
    ) -> Result<Content> {
        let link = self.load_link(user_id, link_id)?;

        let now = Utc::now();
        let mut content = Content {
            content_id: ContentId::generate(),
            organization_id: link.organization_id,
            link_id: *link_id,
            platform: String::new(),
            content_type: String::new(),
            url: None,
            scheduled_at: None,
            published_at: None,
            status: ContentStatus::default(),
            metrics: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        };
        apply_content(&mut content, draft)?;

        self.store.put_content(&content)?;

        tracing::info!(
            content_id = %content.content_id,
            link_id = %link_id,
            platform = %content.platform,
            "Created content"
        );

        Ok(content)
    }

    async fn get_content(&self, user_id: &UserId, content_id: &ContentId) -> Result<Content> {
        let content = self.load_content(user_id, content_id)?;
        tracing::debug!(content_id = %content_id, "Fetched content");
        Ok(content)
    }

    async fn update_content(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        draft: ContentDraft,
    ) -> Result<Content> {
        let mut content = self.load_content(user_id, content_id)?;
        apply_content(&mut content, draft)?;
        content.updated_at = Utc::now();

        self.store
            .update_content(&content)
            .map_err(vanished("content", content_id))?;

        tracing::info!(content_id = %content_id, "Updated content");

        Ok(content)
    }

    async fn set_content_status(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
        status: &str,
    ) -> Result<Content> {
        let status: ContentStatus = status.parse()?;
        let mut content = self.load_content(user_id, content_id)?;
        let from = content.status;
        let now = Utc::now();

        content.status = status;
        if status == ContentStatus::Published && content.published_at.is_none() {
            content.published_at = Some(now);
        }
        content.updated_at = now;
        self.store
            .update_content(&content)
            .map_err(vanished("content", content_id))?;

        tracing::info!(
            content_id = %content_id,
            from = %from,
            to = %status,
            "Changed content status"
        );

        Ok(content)
    }

    async fn delete_content(&self, user_id: &UserId, content_id: &ContentId) -> Result<()> {
        self.load_content(user_id, content_id)?;
        self.store.delete_content(content_id)?;

        tracing::info!(content_id = %content_id, user_id = %user_id, "Deleted content");

        Ok(())
    }

    async fn list_content(&self, user_id: &UserId) -> Result<Vec<Content>> {
        let organization_id = self.current_organization(user_id)?;
        let mut content = self.store.list_content_by_organization(&organization_id)?;
        content.sort_by_key(|c| (c.scheduled_at.is_none(), c.scheduled_at, c.created_at));
        tracing::debug!(organization_id = %organization_id, count = content.len(), "Listed content calendar");
        Ok(content)
    }

    async fn list_content_for_link(
        &self,
        user_id: &UserId,
        link_id: &LinkId,
    ) -> Result<Vec<Content>> {
        self.load_link(user_id, link_id)?;
        let content = self.store.list_content_by_link(link_id)?;
        tracing::debug!(link_id = %link_id, count = content.len(), "Listed link content");
        Ok(content)
    }
}
