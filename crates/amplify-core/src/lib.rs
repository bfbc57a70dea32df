//! Core types and utilities for amplify.
//!
//! This crate provides the foundational types used throughout the amplify workspace:
//!
//! - **Identifiers**: Strongly-typed UUID identifiers for users, organizations,
//!   influencers, campaigns, campaign-influencer links, and content items
//! - **Error types**: Identifier parsing errors shared across crates
//!
//! # Example
//!
//! ```
//! use amplify_core::{CampaignId, OrganizationId, UserId};
//!
//! // Parse a user ID from the `sub` claim of an identity token
//! let user_id: UserId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
//!
//! // Generate fresh row identifiers
//! let organization_id = OrganizationId::generate();
//! let campaign_id = CampaignId::generate();
//! assert_ne!(organization_id.as_uuid(), campaign_id.as_uuid());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;

pub use error::IdError;
pub use ids::{CampaignId, ContentId, InfluencerId, LinkId, OrganizationId, UserId};
