//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.
//! Writes that read before they write (unique-pair checks, reference checks,
//! cascades) run under a store-wide write lock so that the check and the
//! write batch are atomic with respect to other writers.

use std::path::Path;
use std::sync::Arc;

use amplify_core::{CampaignId, ContentId, InfluencerId, LinkId, OrganizationId, UserId};
use chrono::Utc;
use parking_lot::Mutex;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::types::{
    Campaign, CampaignInfluencer, Content, Influencer, Membership, Organization, Profile, Role,
};
use crate::Store;

type IndexEntry = (Box<[u8]>, Box<[u8]>);

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn exists(&self, cf_name: &str, key: &[u8]) -> Result<bool> {
        let cf = self.cf(cf_name)?;
        Ok(self.db.get_pinned_cf(&cf, key)?.is_some())
    }

    /// Collect every entry of a column family whose key starts with `prefix`.
    fn scan_prefix(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<IndexEntry>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item?;

            // Stop if we're past the prefix
            if !key.starts_with(prefix) {
                break;
            }

            entries.push((key, value));
        }

        Ok(entries)
    }

    /// Resolve the children of a `parent || child` index into primary records.
    fn load_indexed<T: DeserializeOwned>(
        &self,
        index_cf: &str,
        parent: &[u8],
        primary_cf: &str,
    ) -> Result<Vec<T>> {
        let mut records = Vec::new();
        for (key, _) in self.scan_prefix(index_cf, parent)? {
            let child = keys::child_bytes(&key)?;
            if let Some(record) = self.get(primary_cf, child)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn require(&self, cf_name: &str, key: &[u8], what: &'static str) -> Result<()> {
        if self.exists(cf_name, key)? {
            Ok(())
        } else {
            Err(StoreError::MissingReference(what))
        }
    }

    /// The row being replaced must still exist.
    fn require_present(&self, cf_name: &str, key: &[u8]) -> Result<()> {
        if self.exists(cf_name, key)? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    /// Fail if `membership` is the organization's only owner.
    fn keep_an_owner(&self, membership: &Membership) -> Result<()> {
        if membership.role != Role::Owner {
            return Ok(());
        }
        let owners = self
            .list_memberships_by_organization(&membership.organization_id)?
            .iter()
            .filter(|m| m.role == Role::Owner)
            .count();
        if owners <= 1 {
            return Err(StoreError::Conflict(format!(
                "organization {} must keep at least one owner",
                membership.organization_id
            )));
        }
        Ok(())
    }

    fn write_profile(&self, profile: &Profile) -> Result<()> {
        self.db.put_cf(
            &self.cf(cf::PROFILES)?,
            keys::id_key(&profile.user_id),
            Self::serialize(profile)?,
        )?;
        Ok(())
    }

    // =========================================================================
    // Unlocked writes; callers hold `write_lock`
    // =========================================================================

    fn write_organization(&self, organization: &Organization) -> Result<()> {
        self.db.put_cf(
            &self.cf(cf::ORGANIZATIONS)?,
            keys::id_key(&organization.organization_id),
            Self::serialize(organization)?,
        )?;
        Ok(())
    }

    fn write_influencer(&self, influencer: &Influencer) -> Result<()> {
        self.require(
            cf::ORGANIZATIONS,
            &keys::id_key(&influencer.organization_id),
            "organization",
        )?;

        let cf_by_org = self.cf(cf::INFLUENCERS_BY_ORG)?;
        let mut batch = WriteBatch::default();

        // Move the org index entry if the influencer changed hands
        if let Some(old) = self.get_influencer(&influencer.influencer_id)? {
            if old.organization_id != influencer.organization_id {
                batch.delete_cf(
                    &cf_by_org,
                    keys::composite_key(&old.organization_id, &old.influencer_id),
                );
            }
        }

        batch.put_cf(
            &self.cf(cf::INFLUENCERS)?,
            keys::id_key(&influencer.influencer_id),
            Self::serialize(influencer)?,
        );
        batch.put_cf(
            &cf_by_org,
            keys::composite_key(&influencer.organization_id, &influencer.influencer_id),
            [],
        );

        self.db.write(batch)?;
        Ok(())
    }

    fn write_campaign(&self, campaign: &Campaign) -> Result<()> {
        self.require(
            cf::ORGANIZATIONS,
            &keys::id_key(&campaign.organization_id),
            "organization",
        )?;

        let cf_by_org = self.cf(cf::CAMPAIGNS_BY_ORG)?;
        let mut batch = WriteBatch::default();

        if let Some(old) = self.get_campaign(&campaign.campaign_id)? {
            if old.organization_id != campaign.organization_id {
                batch.delete_cf(
                    &cf_by_org,
                    keys::composite_key(&old.organization_id, &old.campaign_id),
                );
            }
        }

        batch.put_cf(
            &self.cf(cf::CAMPAIGNS)?,
            keys::id_key(&campaign.campaign_id),
            Self::serialize(campaign)?,
        );
        batch.put_cf(
            &cf_by_org,
            keys::composite_key(&campaign.organization_id, &campaign.campaign_id),
            [],
        );

        self.db.write(batch)?;
        Ok(())
    }

    fn write_campaign_influencer(&self, link: &CampaignInfluencer) -> Result<()> {
        self.require(cf::CAMPAIGNS, &keys::id_key(&link.campaign_id), "campaign")?;
        self.require(
            cf::INFLUENCERS,
            &keys::id_key(&link.influencer_id),
            "influencer",
        )?;

        let cf_by_pair = self.cf(cf::LINKS_BY_PAIR)?;
        let pair_key = keys::composite_key(&link.campaign_id, &link.influencer_id);

        if let Some(existing) = self.db.get_cf(&cf_by_pair, &pair_key)? {
            if existing.as_slice() != link.link_id.as_bytes() {
                return Err(StoreError::Conflict(format!(
                    "influencer {} is already linked to campaign {}",
                    link.influencer_id, link.campaign_id
                )));
            }
        }

        let mut batch = WriteBatch::default();

        if let Some(old) = self.get_campaign_influencer(&link.link_id)? {
            if old.campaign_id != link.campaign_id || old.influencer_id != link.influencer_id {
                self.stage_link_index_delete(&mut batch, &old)?;
            }
        }

        batch.put_cf(
            &self.cf(cf::LINKS)?,
            keys::id_key(&link.link_id),
            Self::serialize(link)?,
        );
        batch.put_cf(
            &self.cf(cf::LINKS_BY_CAMPAIGN)?,
            keys::composite_key(&link.campaign_id, &link.link_id),
            [],
        );
        batch.put_cf(
            &self.cf(cf::LINKS_BY_INFLUENCER)?,
            keys::composite_key(&link.influencer_id, &link.link_id),
            [],
        );
        batch.put_cf(&cf_by_pair, &pair_key, link.link_id.as_bytes());

        self.db.write(batch)?;
        Ok(())
    }

    fn write_content(&self, content: &Content) -> Result<()> {
        self.require(cf::LINKS, &keys::id_key(&content.link_id), "campaign influencer")?;

        let mut batch = WriteBatch::default();

        if let Some(old) = self.get_content(&content.content_id)? {
            if old.link_id != content.link_id || old.organization_id != content.organization_id {
                self.stage_content_delete(&mut batch, &old)?;
            }
        }

        batch.put_cf(
            &self.cf(cf::CONTENT)?,
            keys::id_key(&content.content_id),
            Self::serialize(content)?,
        );
        batch.put_cf(
            &self.cf(cf::CONTENT_BY_LINK)?,
            keys::composite_key(&content.link_id, &content.content_id),
            [],
        );
        batch.put_cf(
            &self.cf(cf::CONTENT_BY_ORG)?,
            keys::composite_key(&content.organization_id, &content.content_id),
            [],
        );

        self.db.write(batch)?;
        Ok(())
    }

    // =========================================================================
    // Cascade staging
    // =========================================================================

    fn stage_membership_delete(&self, batch: &mut WriteBatch, membership: &Membership) -> Result<()> {
        batch.delete_cf(
            &self.cf(cf::MEMBERSHIPS)?,
            keys::composite_key(&membership.organization_id, &membership.user_id),
        );
        batch.delete_cf(
            &self.cf(cf::MEMBERSHIPS_BY_USER)?,
            keys::composite_key(&membership.user_id, &membership.organization_id),
        );

        // A profile may not keep pointing at an organization it left
        if let Some(mut profile) = self.get_profile(&membership.user_id)? {
            if profile.organization_id == Some(membership.organization_id) {
                profile.organization_id = None;
                profile.updated_at = Utc::now();
                batch.put_cf(
                    &self.cf(cf::PROFILES)?,
                    keys::id_key(&profile.user_id),
                    Self::serialize(&profile)?,
                );
            }
        }

        Ok(())
    }

    fn stage_content_delete(&self, batch: &mut WriteBatch, content: &Content) -> Result<()> {
        batch.delete_cf(&self.cf(cf::CONTENT)?, keys::id_key(&content.content_id));
        batch.delete_cf(
            &self.cf(cf::CONTENT_BY_LINK)?,
            keys::composite_key(&content.link_id, &content.content_id),
        );
        batch.delete_cf(
            &self.cf(cf::CONTENT_BY_ORG)?,
            keys::composite_key(&content.organization_id, &content.content_id),
        );
        Ok(())
    }

    fn stage_link_index_delete(&self, batch: &mut WriteBatch, link: &CampaignInfluencer) -> Result<()> {
        batch.delete_cf(
            &self.cf(cf::LINKS_BY_CAMPAIGN)?,
            keys::composite_key(&link.campaign_id, &link.link_id),
        );
        batch.delete_cf(
            &self.cf(cf::LINKS_BY_INFLUENCER)?,
            keys::composite_key(&link.influencer_id, &link.link_id),
        );
        batch.delete_cf(
            &self.cf(cf::LINKS_BY_PAIR)?,
            keys::composite_key(&link.campaign_id, &link.influencer_id),
        );
        Ok(())
    }

    /// Stage deletion of a link and every content item under it.
    fn stage_link_delete(&self, batch: &mut WriteBatch, link: &CampaignInfluencer) -> Result<usize> {
        batch.delete_cf(&self.cf(cf::LINKS)?, keys::id_key(&link.link_id));
        self.stage_link_index_delete(batch, link)?;

        let content = self.list_content_by_link(&link.link_id)?;
        for item in &content {
            self.stage_content_delete(batch, item)?;
        }
        Ok(content.len())
    }

    fn stage_influencer_delete(&self, batch: &mut WriteBatch, influencer: &Influencer) -> Result<()> {
        batch.delete_cf(&self.cf(cf::INFLUENCERS)?, keys::id_key(&influencer.influencer_id));
        batch.delete_cf(
            &self.cf(cf::INFLUENCERS_BY_ORG)?,
            keys::composite_key(&influencer.organization_id, &influencer.influencer_id),
        );

        let links = self.list_campaign_influencers_by_influencer(&influencer.influencer_id)?;
        let mut content = 0;
        for link in &links {
            content += self.stage_link_delete(batch, link)?;
        }

        tracing::debug!(
            influencer_id = %influencer.influencer_id,
            links = links.len(),
            content,
            "Staged influencer cascade"
        );
        Ok(())
    }

    fn stage_campaign_delete(&self, batch: &mut WriteBatch, campaign: &Campaign) -> Result<()> {
        batch.delete_cf(&self.cf(cf::CAMPAIGNS)?, keys::id_key(&campaign.campaign_id));
        batch.delete_cf(
            &self.cf(cf::CAMPAIGNS_BY_ORG)?,
            keys::composite_key(&campaign.organization_id, &campaign.campaign_id),
        );

        let links = self.list_campaign_influencers_by_campaign(&campaign.campaign_id)?;
        let mut content = 0;
        for link in &links {
            content += self.stage_link_delete(batch, link)?;
        }

        tracing::debug!(
            campaign_id = %campaign.campaign_id,
            links = links.len(),
            content,
            "Staged campaign cascade"
        );
        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Organization Operations
    // =========================================================================

    fn put_organization(&self, organization: &Organization) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write_organization(organization)
    }

    fn update_organization(&self, organization: &Organization) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.require_present(cf::ORGANIZATIONS, &keys::id_key(&organization.organization_id))?;
        self.write_organization(organization)
    }

    fn create_organization(&self, organization: &Organization, owner: &Membership) -> Result<()> {
        let _guard = self.write_lock.lock();

        let key = keys::id_key(&organization.organization_id);
        if self.exists(cf::ORGANIZATIONS, &key)? {
            return Err(StoreError::Conflict(format!(
                "organization {} already exists",
                organization.organization_id
            )));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(&self.cf(cf::ORGANIZATIONS)?, key, Self::serialize(organization)?);
        batch.put_cf(
            &self.cf(cf::MEMBERSHIPS)?,
            keys::composite_key(&organization.organization_id, &owner.user_id),
            Self::serialize(owner)?,
        );
        batch.put_cf(
            &self.cf(cf::MEMBERSHIPS_BY_USER)?,
            keys::composite_key(&owner.user_id, &organization.organization_id),
            [],
        );

        if let Some(mut profile) = self.get_profile(&owner.user_id)? {
            if profile.organization_id.is_none() {
                profile.organization_id = Some(organization.organization_id);
                profile.updated_at = organization.created_at;
                batch.put_cf(
                    &self.cf(cf::PROFILES)?,
                    keys::id_key(&profile.user_id),
                    Self::serialize(&profile)?,
                );
            }
        }

        self.db.write(batch)?;
        Ok(())
    }

    fn get_organization(&self, organization_id: &OrganizationId) -> Result<Option<Organization>> {
        self.get(cf::ORGANIZATIONS, &keys::id_key(organization_id))
    }

    fn delete_organization(&self, organization_id: &OrganizationId) -> Result<()> {
        let _guard = self.write_lock.lock();

        let key = keys::id_key(organization_id);
        if !self.exists(cf::ORGANIZATIONS, &key)? {
            return Err(StoreError::NotFound);
        }

        let mut batch = WriteBatch::default();
        batch.delete_cf(&self.cf(cf::ORGANIZATIONS)?, &key);

        for membership in self.list_memberships_by_organization(organization_id)? {
            self.stage_membership_delete(&mut batch, &membership)?;
        }
        for influencer in self.list_influencers_by_organization(organization_id)? {
            self.stage_influencer_delete(&mut batch, &influencer)?;
        }
        // Links shared with influencers above are deleted twice; batch deletes are idempotent
        for campaign in self.list_campaigns_by_organization(organization_id)? {
            self.stage_campaign_delete(&mut batch, &campaign)?;
        }

        self.db.write(batch)?;
        Ok(())
    }

    // =========================================================================
    // Membership Operations
    // =========================================================================

    fn put_membership(&self, membership: &Membership) -> Result<()> {
        let _guard = self.write_lock.lock();

        self.require(
            cf::ORGANIZATIONS,
            &keys::id_key(&membership.organization_id),
            "organization",
        )?;
        if self
            .get_membership(&membership.organization_id, &membership.user_id)?
            .is_some()
        {
            return Err(StoreError::Conflict(format!(
                "user {} is already a member of organization {}",
                membership.user_id, membership.organization_id
            )));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &self.cf(cf::MEMBERSHIPS)?,
            keys::composite_key(&membership.organization_id, &membership.user_id),
            Self::serialize(membership)?,
        );
        batch.put_cf(
            &self.cf(cf::MEMBERSHIPS_BY_USER)?,
            keys::composite_key(&membership.user_id, &membership.organization_id),
            [],
        );

        self.db.write(batch)?;
        Ok(())
    }

    fn update_membership_role(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Membership> {
        let _guard = self.write_lock.lock();

        let mut membership = self
            .get_membership(organization_id, user_id)?
            .ok_or(StoreError::NotFound)?;
        if role != Role::Owner {
            self.keep_an_owner(&membership)?;
        }

        membership.role = role;
        membership.updated_at = Utc::now();
        self.db.put_cf(
            &self.cf(cf::MEMBERSHIPS)?,
            keys::composite_key(organization_id, user_id),
            Self::serialize(&membership)?,
        )?;
        Ok(membership)
    }

    fn get_membership(
        &self,
        organization_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<Option<Membership>> {
        self.get(cf::MEMBERSHIPS, &keys::composite_key(organization_id, user_id))
    }

    fn delete_membership(&self, organization_id: &OrganizationId, user_id: &UserId) -> Result<()> {
        let _guard = self.write_lock.lock();

        let membership = self
            .get_membership(organization_id, user_id)?
            .ok_or(StoreError::NotFound)?;
        self.keep_an_owner(&membership)?;

        let mut batch = WriteBatch::default();
        self.stage_membership_delete(&mut batch, &membership)?;

        self.db.write(batch)?;
        Ok(())
    }

    fn list_memberships_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Membership>> {
        let mut memberships = self
            .scan_prefix(cf::MEMBERSHIPS, &keys::prefix(organization_id))?
            .into_iter()
            .map(|(_, value)| Self::deserialize::<Membership>(&value))
            .collect::<Result<Vec<_>>>()?;

        memberships.sort_by_key(|m| m.created_at);
        Ok(memberships)
    }

    fn list_memberships_by_user(&self, user_id: &UserId) -> Result<Vec<Membership>> {
        let mut memberships = Vec::new();
        for (key, _) in self.scan_prefix(cf::MEMBERSHIPS_BY_USER, &keys::prefix(user_id))? {
            let organization_id = OrganizationId::from_slice(keys::child_bytes(&key)?)?;
            if let Some(membership) = self.get_membership(&organization_id, user_id)? {
                memberships.push(membership);
            }
        }

        memberships.sort_by_key(|m| m.created_at);
        Ok(memberships)
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    fn put_profile(&self, profile: &Profile) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write_profile(profile)
    }

    fn ensure_profile(&self, user_id: &UserId, email: &str) -> Result<Profile> {
        let _guard = self.write_lock.lock();

        let now = Utc::now();
        let profile = match self.get_profile(user_id)? {
            Some(profile) if profile.email == email => return Ok(profile),
            Some(mut profile) => {
                profile.email = email.to_string();
                profile.updated_at = now;
                profile
            }
            None => {
                tracing::info!(user_id = %user_id, "Creating profile");
                Profile {
                    user_id: *user_id,
                    email: email.to_string(),
                    display_name: None,
                    organization_id: None,
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        self.write_profile(&profile)?;
        Ok(profile)
    }

    fn set_current_organization(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> Result<Profile> {
        let _guard = self.write_lock.lock();

        self.require(
            cf::MEMBERSHIPS,
            &keys::composite_key(organization_id, user_id),
            "membership",
        )?;
        let mut profile = self.get_profile(user_id)?.ok_or(StoreError::NotFound)?;

        profile.organization_id = Some(*organization_id);
        profile.updated_at = Utc::now();
        self.write_profile(&profile)?;
        Ok(profile)
    }

    fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>> {
        self.get(cf::PROFILES, &keys::id_key(user_id))
    }

    // =========================================================================
    // Influencer Operations
    // =========================================================================

    fn put_influencer(&self, influencer: &Influencer) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write_influencer(influencer)
    }

    fn update_influencer(&self, influencer: &Influencer) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.require_present(cf::INFLUENCERS, &keys::id_key(&influencer.influencer_id))?;
        self.write_influencer(influencer)
    }

    fn get_influencer(&self, influencer_id: &InfluencerId) -> Result<Option<Influencer>> {
        self.get(cf::INFLUENCERS, &keys::id_key(influencer_id))
    }

    fn delete_influencer(&self, influencer_id: &InfluencerId) -> Result<()> {
        let _guard = self.write_lock.lock();

        let influencer = self
            .get_influencer(influencer_id)?
            .ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        self.stage_influencer_delete(&mut batch, &influencer)?;

        self.db.write(batch)?;
        Ok(())
    }

    fn list_influencers_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Influencer>> {
        let mut influencers: Vec<Influencer> = self.load_indexed(
            cf::INFLUENCERS_BY_ORG,
            &keys::prefix(organization_id),
            cf::INFLUENCERS,
        )?;
        influencers.sort_by_key(|i| i.created_at);
        Ok(influencers)
    }

    // =========================================================================
    // Campaign Operations
    // =========================================================================

    fn put_campaign(&self, campaign: &Campaign) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write_campaign(campaign)
    }

    fn update_campaign(&self, campaign: &Campaign) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.require_present(cf::CAMPAIGNS, &keys::id_key(&campaign.campaign_id))?;
        self.write_campaign(campaign)
    }

    fn get_campaign(&self, campaign_id: &CampaignId) -> Result<Option<Campaign>> {
        self.get(cf::CAMPAIGNS, &keys::id_key(campaign_id))
    }

    fn delete_campaign(&self, campaign_id: &CampaignId) -> Result<()> {
        let _guard = self.write_lock.lock();

        let campaign = self.get_campaign(campaign_id)?.ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        self.stage_campaign_delete(&mut batch, &campaign)?;

        self.db.write(batch)?;
        Ok(())
    }

    fn list_campaigns_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Campaign>> {
        let mut campaigns: Vec<Campaign> = self.load_indexed(
            cf::CAMPAIGNS_BY_ORG,
            &keys::prefix(organization_id),
            cf::CAMPAIGNS,
        )?;
        campaigns.sort_by_key(|c| c.created_at);
        Ok(campaigns)
    }

    // =========================================================================
    // Campaign-Influencer Operations
    // =========================================================================

    fn put_campaign_influencer(&self, link: &CampaignInfluencer) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write_campaign_influencer(link)
    }

    fn update_campaign_influencer(&self, link: &CampaignInfluencer) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.require_present(cf::LINKS, &keys::id_key(&link.link_id))?;
        self.write_campaign_influencer(link)
    }

    fn get_campaign_influencer(&self, link_id: &LinkId) -> Result<Option<CampaignInfluencer>> {
        self.get(cf::LINKS, &keys::id_key(link_id))
    }

    fn find_campaign_influencer(
        &self,
        campaign_id: &CampaignId,
        influencer_id: &InfluencerId,
    ) -> Result<Option<CampaignInfluencer>> {
        let cf_by_pair = self.cf(cf::LINKS_BY_PAIR)?;
        let pair_key = keys::composite_key(campaign_id, influencer_id);

        match self.db.get_cf(&cf_by_pair, pair_key)? {
            Some(bytes) => {
                let link_id = LinkId::from_slice(&bytes)?;
                self.get_campaign_influencer(&link_id)
            }
            None => Ok(None),
        }
    }

    fn delete_campaign_influencer(&self, link_id: &LinkId) -> Result<()> {
        let _guard = self.write_lock.lock();

        let link = self
            .get_campaign_influencer(link_id)?
            .ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        self.stage_link_delete(&mut batch, &link)?;

        self.db.write(batch)?;
        Ok(())
    }

    fn list_campaign_influencers_by_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<CampaignInfluencer>> {
        let mut links: Vec<CampaignInfluencer> = self.load_indexed(
            cf::LINKS_BY_CAMPAIGN,
            &keys::prefix(campaign_id),
            cf::LINKS,
        )?;
        links.sort_by_key(|l| l.created_at);
        Ok(links)
    }

    fn list_campaign_influencers_by_influencer(
        &self,
        influencer_id: &InfluencerId,
    ) -> Result<Vec<CampaignInfluencer>> {
        let mut links: Vec<CampaignInfluencer> = self.load_indexed(
            cf::LINKS_BY_INFLUENCER,
            &keys::prefix(influencer_id),
            cf::LINKS,
        )?;
        links.sort_by_key(|l| l.created_at);
        Ok(links)
    }

    // =========================================================================
    // Content Operations
    // =========================================================================

    fn put_content(&self, content: &Content) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.write_content(content)
    }

    fn update_content(&self, content: &Content) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.require_present(cf::CONTENT, &keys::id_key(&content.content_id))?;
        self.write_content(content)
    }

    fn get_content(&self, content_id: &ContentId) -> Result<Option<Content>> {
        self.get(cf::CONTENT, &keys::id_key(content_id))
    }

    fn delete_content(&self, content_id: &ContentId) -> Result<()> {
        let _guard = self.write_lock.lock();

        let content = self.get_content(content_id)?.ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        self.stage_content_delete(&mut batch, &content)?;

        self.db.write(batch)?;
        Ok(())
    }

    fn list_content_by_link(&self, link_id: &LinkId) -> Result<Vec<Content>> {
        let mut content: Vec<Content> =
            self.load_indexed(cf::CONTENT_BY_LINK, &keys::prefix(link_id), cf::CONTENT)?;
        content.sort_by_key(|c| c.created_at);
        Ok(content)
    }

    fn list_content_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Content>> {
        let mut content: Vec<Content> = self.load_indexed(
            cf::CONTENT_BY_ORG,
            &keys::prefix(organization_id),
            cf::CONTENT,
        )?;
        content.sort_by_key(|c| c.created_at);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CampaignStatus, ContentStatus, LinkStatus, Role};
    use std::collections::{BTreeMap, BTreeSet};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn create_test_org(store: &RocksStore, name: &str) -> Organization {
        let now = Utc::now();
        let org = Organization {
            organization_id: OrganizationId::generate(),
            name: name.to_string(),
            logo_url: None,
            created_at: now,
            updated_at: now,
        };
        store.put_organization(&org).unwrap();
        org
    }

    fn create_test_influencer(store: &RocksStore, org: &OrganizationId, name: &str) -> Influencer {
        let now = Utc::now();
        let influencer = Influencer {
            influencer_id: InfluencerId::generate(),
            organization_id: *org,
            name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: None,
            social_handles: BTreeMap::from([("instagram".to_string(), format!("@{name}"))]),
            categories: BTreeSet::from(["fitness".to_string()]),
            audience_demographics: serde_json::json!({"age": {"18-24": 0.4}, "top_city": "Lagos"}),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        store.put_influencer(&influencer).unwrap();
        influencer
    }

    fn create_test_campaign(store: &RocksStore, org: &OrganizationId, name: &str) -> Campaign {
        let now = Utc::now();
        let campaign = Campaign {
            campaign_id: CampaignId::generate(),
            organization_id: *org,
            name: name.to_string(),
            description: None,
            start_date: None,
            end_date: None,
            budget_cents: Some(500_000),
            status: CampaignStatus::Draft,
            goals: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        };
        store.put_campaign(&campaign).unwrap();
        campaign
    }

    fn link(campaign: &Campaign, influencer: &Influencer) -> CampaignInfluencer {
        let now = Utc::now();
        CampaignInfluencer {
            link_id: LinkId::generate(),
            organization_id: campaign.organization_id,
            campaign_id: campaign.campaign_id,
            influencer_id: influencer.influencer_id,
            status: LinkStatus::Invited,
            compensation: serde_json::json!({"flat_fee_cents": 100_000}),
            deliverables: vec!["1 reel".to_string()],
            tracking_links: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn content_for(link: &CampaignInfluencer) -> Content {
        let now = Utc::now();
        Content {
            content_id: ContentId::generate(),
            organization_id: link.organization_id,
            link_id: link.link_id,
            platform: "instagram".to_string(),
            content_type: "reel".to_string(),
            url: None,
            scheduled_at: Some(now),
            published_at: None,
            status: ContentStatus::Scheduled,
            metrics: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    fn membership(org: &OrganizationId, user: &UserId, role: Role) -> Membership {
        let now = Utc::now();
        Membership {
            organization_id: *org,
            user_id: *user,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn organization_crud() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");

        let retrieved = store.get_organization(&org.organization_id).unwrap().unwrap();
        assert_eq!(retrieved, org);

        store.delete_organization(&org.organization_id).unwrap();
        assert!(store.get_organization(&org.organization_id).unwrap().is_none());

        let result = store.delete_organization(&org.organization_id);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn create_organization_with_owner() {
        let (store, _dir) = create_test_store();
        let user = UserId::generate();
        let now = Utc::now();
        store
            .put_profile(&Profile {
                user_id: user,
                email: "owner@example.com".to_string(),
                display_name: None,
                organization_id: None,
                created_at: now,
                updated_at: now,
            })
            .unwrap();

        let org = Organization {
            organization_id: OrganizationId::generate(),
            name: "Acme".to_string(),
            logo_url: None,
            created_at: now,
            updated_at: now,
        };
        let owner = membership(&org.organization_id, &user, Role::Owner);
        store.create_organization(&org, &owner).unwrap();

        assert_eq!(
            store
                .get_membership(&org.organization_id, &user)
                .unwrap()
                .unwrap()
                .role,
            Role::Owner
        );
        let profile = store.get_profile(&user).unwrap().unwrap();
        assert_eq!(profile.organization_id, Some(org.organization_id));

        // A second organization leaves the current one alone
        let second = Organization {
            organization_id: OrganizationId::generate(),
            ..org.clone()
        };
        store
            .create_organization(
                &second,
                &membership(&second.organization_id, &user, Role::Owner),
            )
            .unwrap();
        let profile = store.get_profile(&user).unwrap().unwrap();
        assert_eq!(profile.organization_id, Some(org.organization_id));

        assert!(matches!(
            store.create_organization(&org, &owner),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn memberships_indexed_both_ways() {
        let (store, _dir) = create_test_store();
        let org_a = create_test_org(&store, "A");
        let org_b = create_test_org(&store, "B");
        let alice = UserId::generate();
        let bob = UserId::generate();

        store
            .put_membership(&membership(&org_a.organization_id, &alice, Role::Owner))
            .unwrap();
        store
            .put_membership(&membership(&org_b.organization_id, &alice, Role::Member))
            .unwrap();
        store
            .put_membership(&membership(&org_a.organization_id, &bob, Role::Member))
            .unwrap();

        assert_eq!(
            store
                .list_memberships_by_organization(&org_a.organization_id)
                .unwrap()
                .len(),
            2
        );
        assert_eq!(store.list_memberships_by_user(&alice).unwrap().len(), 2);
        assert_eq!(store.list_memberships_by_user(&bob).unwrap().len(), 1);

        let m = store
            .get_membership(&org_b.organization_id, &alice)
            .unwrap()
            .unwrap();
        assert_eq!(m.role, Role::Member);
        assert!(store
            .get_membership(&org_b.organization_id, &bob)
            .unwrap()
            .is_none());
    }

    #[test]
    fn membership_requires_organization() {
        let (store, _dir) = create_test_store();
        let result = store.put_membership(&membership(
            &OrganizationId::generate(),
            &UserId::generate(),
            Role::Owner,
        ));
        assert!(matches!(
            result,
            Err(StoreError::MissingReference("organization"))
        ));
    }

    #[test]
    fn delete_membership_clears_current_organization() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let user = UserId::generate();
        store
            .put_membership(&membership(&org.organization_id, &user, Role::Member))
            .unwrap();

        let now = Utc::now();
        store
            .put_profile(&Profile {
                user_id: user,
                email: "u@example.com".to_string(),
                display_name: None,
                organization_id: Some(org.organization_id),
                created_at: now,
                updated_at: now,
            })
            .unwrap();

        store.delete_membership(&org.organization_id, &user).unwrap();

        assert!(store
            .get_membership(&org.organization_id, &user)
            .unwrap()
            .is_none());
        assert!(store.list_memberships_by_user(&user).unwrap().is_empty());
        let profile = store.get_profile(&user).unwrap().unwrap();
        assert!(profile.organization_id.is_none());
    }

    #[test]
    fn influencer_roundtrip_preserves_fields() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let influencer = create_test_influencer(&store, &org.organization_id, "Alice");

        let retrieved = store
            .get_influencer(&influencer.influencer_id)
            .unwrap()
            .unwrap();
        assert_eq!(retrieved, influencer);
    }

    #[test]
    fn influencers_listed_per_organization() {
        let (store, _dir) = create_test_store();
        let org_a = create_test_org(&store, "A");
        let org_b = create_test_org(&store, "B");

        create_test_influencer(&store, &org_a.organization_id, "Alice");
        create_test_influencer(&store, &org_a.organization_id, "Bola");
        create_test_influencer(&store, &org_b.organization_id, "Chen");

        let a = store
            .list_influencers_by_organization(&org_a.organization_id)
            .unwrap();
        assert_eq!(a.len(), 2);
        assert!(a.iter().all(|i| i.organization_id == org_a.organization_id));

        let b = store
            .list_influencers_by_organization(&org_b.organization_id)
            .unwrap();
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn influencer_requires_organization() {
        let (store, _dir) = create_test_store();
        let now = Utc::now();
        let influencer = Influencer {
            influencer_id: InfluencerId::generate(),
            organization_id: OrganizationId::generate(),
            name: "Ghost".to_string(),
            email: None,
            phone: None,
            social_handles: BTreeMap::new(),
            categories: BTreeSet::new(),
            audience_demographics: serde_json::Value::Null,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            store.put_influencer(&influencer),
            Err(StoreError::MissingReference("organization"))
        ));
    }

    #[test]
    fn duplicate_pair_conflicts() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let campaign = create_test_campaign(&store, &org.organization_id, "Launch");
        let influencer = create_test_influencer(&store, &org.organization_id, "Alice");

        let first = link(&campaign, &influencer);
        store.put_campaign_influencer(&first).unwrap();

        let second = link(&campaign, &influencer);
        let result = store.put_campaign_influencer(&second);
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        // Updating the existing link is not a conflict
        let mut updated = first.clone();
        updated.status = LinkStatus::Confirmed;
        store.put_campaign_influencer(&updated).unwrap();

        let found = store
            .find_campaign_influencer(&campaign.campaign_id, &influencer.influencer_id)
            .unwrap()
            .unwrap();
        assert_eq!(found.link_id, first.link_id);
        assert_eq!(found.status, LinkStatus::Confirmed);
        assert_eq!(
            store
                .list_campaign_influencers_by_campaign(&campaign.campaign_id)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn link_requires_campaign_and_influencer() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let campaign = create_test_campaign(&store, &org.organization_id, "Launch");
        let influencer = create_test_influencer(&store, &org.organization_id, "Alice");

        let mut orphan = link(&campaign, &influencer);
        orphan.campaign_id = CampaignId::generate();
        assert!(matches!(
            store.put_campaign_influencer(&orphan),
            Err(StoreError::MissingReference("campaign"))
        ));

        let mut orphan = link(&campaign, &influencer);
        orphan.influencer_id = InfluencerId::generate();
        assert!(matches!(
            store.put_campaign_influencer(&orphan),
            Err(StoreError::MissingReference("influencer"))
        ));
    }

    #[test]
    fn content_requires_link() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let campaign = create_test_campaign(&store, &org.organization_id, "Launch");
        let influencer = create_test_influencer(&store, &org.organization_id, "Alice");
        let never_stored = link(&campaign, &influencer);

        assert!(matches!(
            store.put_content(&content_for(&never_stored)),
            Err(StoreError::MissingReference("campaign influencer"))
        ));
    }

    #[test]
    fn delete_campaign_cascades() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let campaign = create_test_campaign(&store, &org.organization_id, "Launch");
        let other_campaign = create_test_campaign(&store, &org.organization_id, "Other");
        let alice = create_test_influencer(&store, &org.organization_id, "Alice");
        let bola = create_test_influencer(&store, &org.organization_id, "Bola");

        let l1 = link(&campaign, &alice);
        let l2 = link(&campaign, &bola);
        let kept = link(&other_campaign, &alice);
        for l in [&l1, &l2, &kept] {
            store.put_campaign_influencer(l).unwrap();
        }

        let c1 = content_for(&l1);
        let c2 = content_for(&l2);
        let c_kept = content_for(&kept);
        for c in [&c1, &c2, &c_kept] {
            store.put_content(c).unwrap();
        }

        store.delete_campaign(&campaign.campaign_id).unwrap();

        assert!(store.get_campaign(&campaign.campaign_id).unwrap().is_none());
        assert!(store.get_campaign_influencer(&l1.link_id).unwrap().is_none());
        assert!(store.get_campaign_influencer(&l2.link_id).unwrap().is_none());
        assert!(store.get_content(&c1.content_id).unwrap().is_none());
        assert!(store.get_content(&c2.content_id).unwrap().is_none());
        assert!(store
            .find_campaign_influencer(&campaign.campaign_id, &alice.influencer_id)
            .unwrap()
            .is_none());

        // Unrelated rows survive
        assert!(store.get_influencer(&alice.influencer_id).unwrap().is_some());
        assert!(store.get_campaign_influencer(&kept.link_id).unwrap().is_some());
        let remaining = store
            .list_content_by_organization(&org.organization_id)
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].content_id, c_kept.content_id);
        assert_eq!(
            store
                .list_campaign_influencers_by_influencer(&alice.influencer_id)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            store
                .list_campaigns_by_organization(&org.organization_id)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn delete_influencer_cascades() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let campaign = create_test_campaign(&store, &org.organization_id, "Launch");
        let alice = create_test_influencer(&store, &org.organization_id, "Alice");

        let l = link(&campaign, &alice);
        store.put_campaign_influencer(&l).unwrap();
        let c = content_for(&l);
        store.put_content(&c).unwrap();

        store.delete_influencer(&alice.influencer_id).unwrap();

        assert!(store.get_campaign_influencer(&l.link_id).unwrap().is_none());
        assert!(store.get_content(&c.content_id).unwrap().is_none());
        assert!(store
            .list_campaign_influencers_by_campaign(&campaign.campaign_id)
            .unwrap()
            .is_empty());
        assert!(store.get_campaign(&campaign.campaign_id).unwrap().is_some());

        // The pair is free again
        let again = create_test_influencer(&store, &org.organization_id, "Alice");
        store.put_campaign_influencer(&link(&campaign, &again)).unwrap();
    }

    #[test]
    fn delete_organization_cascades() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let other = create_test_org(&store, "Other");
        let user = UserId::generate();
        store
            .put_membership(&membership(&org.organization_id, &user, Role::Owner))
            .unwrap();
        store
            .put_membership(&membership(&other.organization_id, &user, Role::Member))
            .unwrap();

        let campaign = create_test_campaign(&store, &org.organization_id, "Launch");
        let alice = create_test_influencer(&store, &org.organization_id, "Alice");
        let survivor = create_test_influencer(&store, &other.organization_id, "Zed");
        let l = link(&campaign, &alice);
        store.put_campaign_influencer(&l).unwrap();
        let c = content_for(&l);
        store.put_content(&c).unwrap();

        store.delete_organization(&org.organization_id).unwrap();

        assert!(store.get_campaign(&campaign.campaign_id).unwrap().is_none());
        assert!(store.get_influencer(&alice.influencer_id).unwrap().is_none());
        assert!(store.get_campaign_influencer(&l.link_id).unwrap().is_none());
        assert!(store.get_content(&c.content_id).unwrap().is_none());
        assert!(store
            .get_membership(&org.organization_id, &user)
            .unwrap()
            .is_none());

        let memberships = store.list_memberships_by_user(&user).unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].organization_id, other.organization_id);
        assert!(store.get_influencer(&survivor.influencer_id).unwrap().is_some());
    }

    #[test]
    fn content_listing() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let campaign = create_test_campaign(&store, &org.organization_id, "Launch");
        let alice = create_test_influencer(&store, &org.organization_id, "Alice");
        let l = link(&campaign, &alice);
        store.put_campaign_influencer(&l).unwrap();

        for _ in 0..3 {
            store.put_content(&content_for(&l)).unwrap();
        }

        assert_eq!(store.list_content_by_link(&l.link_id).unwrap().len(), 3);
        assert_eq!(
            store
                .list_content_by_organization(&org.organization_id)
                .unwrap()
                .len(),
            3
        );

        let first = &store.list_content_by_link(&l.link_id).unwrap()[0];
        store.delete_content(&first.content_id).unwrap();
        assert_eq!(store.list_content_by_link(&l.link_id).unwrap().len(), 2);
        assert!(matches!(
            store.delete_content(&first.content_id),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn profile_crud() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let now = Utc::now();

        let profile = Profile {
            user_id,
            email: "test@example.com".to_string(),
            display_name: Some("Tess".to_string()),
            organization_id: None,
            created_at: now,
            updated_at: now,
        };

        store.put_profile(&profile).unwrap();
        assert_eq!(store.get_profile(&user_id).unwrap().unwrap(), profile);
        assert!(store.get_profile(&UserId::generate()).unwrap().is_none());
    }

    #[test]
    fn update_requires_existing_row() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let influencer = create_test_influencer(&store, &org.organization_id, "Ada");
        let campaign = create_test_campaign(&store, &org.organization_id, "Launch");
        let pair = link(&campaign, &influencer);
        store.put_campaign_influencer(&pair).unwrap();
        let content = content_for(&pair);
        store.put_content(&content).unwrap();

        let mut renamed = influencer.clone();
        renamed.name = "Ada L.".to_string();
        store.update_influencer(&renamed).unwrap();
        assert_eq!(
            store.get_influencer(&influencer.influencer_id).unwrap().unwrap().name,
            "Ada L."
        );

        store.delete_influencer(&influencer.influencer_id).unwrap();
        assert!(matches!(store.update_influencer(&renamed), Err(StoreError::NotFound)));
        assert!(matches!(store.update_campaign_influencer(&pair), Err(StoreError::NotFound)));
        assert!(matches!(store.update_content(&content), Err(StoreError::NotFound)));
        assert!(store.get_influencer(&influencer.influencer_id).unwrap().is_none());
        assert!(store.get_campaign_influencer(&pair.link_id).unwrap().is_none());
        assert!(store.get_content(&content.content_id).unwrap().is_none());

        store.delete_campaign(&campaign.campaign_id).unwrap();
        assert!(matches!(store.update_campaign(&campaign), Err(StoreError::NotFound)));

        store.delete_organization(&org.organization_id).unwrap();
        assert!(matches!(store.update_organization(&org), Err(StoreError::NotFound)));
        assert!(store.get_organization(&org.organization_id).unwrap().is_none());
    }

    #[test]
    fn duplicate_membership_conflicts() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let user = UserId::generate();
        store
            .put_membership(&membership(&org.organization_id, &user, Role::Member))
            .unwrap();

        let result = store.put_membership(&membership(&org.organization_id, &user, Role::Admin));
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        let kept = store.get_membership(&org.organization_id, &user).unwrap().unwrap();
        assert_eq!(kept.role, Role::Member);
    }

    #[test]
    fn last_owner_cannot_leave_or_step_down() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let owner = UserId::generate();
        store
            .put_membership(&membership(&org.organization_id, &owner, Role::Owner))
            .unwrap();

        let result = store.update_membership_role(&org.organization_id, &owner, Role::Admin);
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        let result = store.delete_membership(&org.organization_id, &owner);
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(
            store.get_membership(&org.organization_id, &owner).unwrap().unwrap().role,
            Role::Owner
        );

        let co_owner = UserId::generate();
        store
            .put_membership(&membership(&org.organization_id, &co_owner, Role::Owner))
            .unwrap();
        let demoted = store
            .update_membership_role(&org.organization_id, &owner, Role::Admin)
            .unwrap();
        assert_eq!(demoted.role, Role::Admin);
        assert_eq!(
            store.get_membership(&org.organization_id, &owner).unwrap().unwrap(),
            demoted
        );

        let result = store.update_membership_role(&org.organization_id, &UserId::generate(), Role::Admin);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn concurrent_owner_removals_keep_one_owner() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let first = UserId::generate();
        let second = UserId::generate();
        for user in [&first, &second] {
            store
                .put_membership(&membership(&org.organization_id, user, Role::Owner))
                .unwrap();
        }

        let barrier = std::sync::Barrier::new(2);
        let results: Vec<Result<()>> = std::thread::scope(|scope| {
            let handles: Vec<_> = [first, second]
                .into_iter()
                .map(|user| {
                    let (store, barrier, org) = (&store, &barrier, &org);
                    scope.spawn(move || {
                        barrier.wait();
                        store.delete_membership(&org.organization_id, &user)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(StoreError::Conflict(_)))));

        let remaining = store
            .list_memberships_by_organization(&org.organization_id)
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].role, Role::Owner);
    }

    #[test]
    fn concurrent_owner_demotions_keep_one_owner() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let first = UserId::generate();
        let second = UserId::generate();
        for user in [&first, &second] {
            store
                .put_membership(&membership(&org.organization_id, user, Role::Owner))
                .unwrap();
        }

        let barrier = std::sync::Barrier::new(2);
        let results: Vec<Result<Membership>> = std::thread::scope(|scope| {
            let handles: Vec<_> = [first, second]
                .into_iter()
                .map(|user| {
                    let (store, barrier, org) = (&store, &barrier, &org);
                    scope.spawn(move || {
                        barrier.wait();
                        store.update_membership_role(&org.organization_id, &user, Role::Member)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let owners = store
            .list_memberships_by_organization(&org.organization_id)
            .unwrap()
            .into_iter()
            .filter(|m| m.role == Role::Owner)
            .count();
        assert_eq!(owners, 1);
    }

    #[test]
    fn current_organization_needs_membership() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let user = UserId::generate();
        let created = store.ensure_profile(&user, "u@example.com").unwrap();

        let result = store.set_current_organization(&user, &org.organization_id);
        assert!(matches!(result, Err(StoreError::MissingReference("membership"))));
        assert_eq!(store.get_profile(&user).unwrap().unwrap(), created);

        store
            .put_membership(&membership(&org.organization_id, &user, Role::Member))
            .unwrap();
        let profile = store
            .set_current_organization(&user, &org.organization_id)
            .unwrap();
        assert_eq!(profile.organization_id, Some(org.organization_id));

        let result = store.set_current_organization(&UserId::generate(), &org.organization_id);
        assert!(matches!(result, Err(StoreError::MissingReference(_))));
    }

    #[test]
    fn ensure_profile_refreshes_email_only() {
        let (store, _dir) = create_test_store();
        let org = create_test_org(&store, "Acme");
        let user = UserId::generate();

        let created = store.ensure_profile(&user, "u@example.com").unwrap();
        assert!(created.organization_id.is_none());
        assert_eq!(store.ensure_profile(&user, "u@example.com").unwrap(), created);

        store
            .put_membership(&membership(&org.organization_id, &user, Role::Member))
            .unwrap();
        store
            .set_current_organization(&user, &org.organization_id)
            .unwrap();
        store.delete_membership(&org.organization_id, &user).unwrap();

        let refreshed = store.ensure_profile(&user, "new@example.com").unwrap();
        assert_eq!(refreshed.email, "new@example.com");
        assert!(refreshed.organization_id.is_none());
        assert_eq!(refreshed.created_at, created.created_at);
        assert_eq!(store.get_profile(&user).unwrap().unwrap(), refreshed);
    }
}
