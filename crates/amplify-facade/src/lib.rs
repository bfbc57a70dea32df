//! Query and command facade for amplify.
//!
//! Every read and write against tenant-scoped data goes through the
//! [`Facade`] trait. Before touching the store, the facade validates the
//! input and asks an [`Authorizer`] whether the acting user belongs to the
//! organization that owns the addressed row.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Gateway (HTTP)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      FacadeService                          │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │ Validation  │ │ Authorizer  │ │  Orgs / Members /   │    │
//! │  │  (drafts)   │ │ (membership)│ │  Tenant entities    │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                       ┌──────────────┐
//!                       │    Store     │
//!                       │  (RocksDB)   │
//!                       └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use amplify_facade::{Facade, FacadeService, InfluencerDraft, NewOrganization};
//! use amplify_store::RocksStore;
//! use amplify_core::UserId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/amplify")?);
//! let facade = FacadeService::with_defaults(store);
//!
//! let user_id = UserId::generate();
//! facade.ensure_profile(&user_id, "ada@example.com").await?;
//! let org = facade
//!     .create_organization(&user_id, NewOrganization::new("Acme"))
//!     .await?;
//!
//! let influencer = facade
//!     .create_influencer(&user_id, &org.organization_id, InfluencerDraft::new("Ada"))
//!     .await?;
//! println!("Created influencer: {}", influencer.influencer_id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod authz;
pub mod error;
pub mod service;
pub mod types;

pub use authz::{Authorizer, MembershipAuthorizer};
pub use error::{FacadeError, Result};
pub use service::{Facade, FacadeService};
pub use types::{CampaignDraft, ContentDraft, InfluencerDraft, LinkDraft, NewOrganization};

// Re-export commonly used types from dependencies for convenience
pub use amplify_core::{CampaignId, ContentId, InfluencerId, LinkId, OrganizationId, UserId};
pub use amplify_store::{
    Campaign, CampaignInfluencer, CampaignStatus, Content, ContentStatus, Influencer, LinkStatus,
    Membership, Organization, Profile, Role,
};
