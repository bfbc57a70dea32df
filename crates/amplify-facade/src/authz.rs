//! Tenant authorization.
//!
//! Access to every tenant-scoped row is decided by a single predicate: the
//! acting user must hold a membership in the row's organization.

use std::sync::Arc;

use amplify_core::{OrganizationId, UserId};
use amplify_store::{Role, Store};

/// Decides whether a user may act within an organization.
///
/// Implementations must be free of side effects. The `Result` only carries
/// storage failures.
pub trait Authorizer: Send + Sync {
    /// Return the user's role in the organization, if they hold one.
    ///
    /// # Errors
    ///
    /// Returns an error if the membership lookup fails.
    fn role_of(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> amplify_store::Result<Option<Role>>;

    /// Whether the user may read and write the organization's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the membership lookup fails.
    fn can_access(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> amplify_store::Result<bool> {
        Ok(self.role_of(user_id, organization_id)?.is_some())
    }
}

/// Authorizer backed by the membership table.
pub struct MembershipAuthorizer<S: Store> {
    store: Arc<S>,
}

impl<S: Store> MembershipAuthorizer<S> {
    /// Create an authorizer reading memberships from the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: Store> Authorizer for MembershipAuthorizer<S> {
    fn role_of(
        &self,
        user_id: &UserId,
        organization_id: &OrganizationId,
    ) -> amplify_store::Result<Option<Role>> {
        Ok(self
            .store
            .get_membership(organization_id, user_id)?
            .map(|m| m.role))
    }
}
