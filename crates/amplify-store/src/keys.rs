//! Key encoding utilities for `RocksDB`.
//!
//! All identifiers are 16 bytes, so a composite key is always 32 bytes:
//! the parent ID followed by the child ID. Prefix scans over the parent ID
//! enumerate every child.

use amplify_core::ids::ID_LEN;

use crate::error::Result;

/// Encode a primary key (just the ID bytes).
#[must_use]
pub fn id_key(id: &impl AsRef<[u8]>) -> Vec<u8> {
    id.as_ref().to_vec()
}

/// Encode a composite index key: `parent || child`.
#[must_use]
pub fn composite_key(parent: &impl AsRef<[u8]>, child: &impl AsRef<[u8]>) -> Vec<u8> {
    let parent = parent.as_ref();
    let child = child.as_ref();
    let mut key = Vec::with_capacity(parent.len() + child.len());
    key.extend_from_slice(parent);
    key.extend_from_slice(child);
    key
}

/// Encode a parent prefix for scanning all children of an index.
#[must_use]
pub fn prefix(parent: &impl AsRef<[u8]>) -> Vec<u8> {
    parent.as_ref().to_vec()
}

/// Return the child half of a composite key.
///
/// # Errors
///
/// Returns `StoreError::CorruptKey` if the key is not exactly two IDs long.
pub fn child_bytes(key: &[u8]) -> Result<&[u8]> {
    if key.len() != 2 * ID_LEN {
        return Err(amplify_core::IdError::InvalidLength {
            expected: 2 * ID_LEN,
            got: key.len(),
        }
        .into());
    }
    Ok(&key[ID_LEN..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use amplify_core::{CampaignId, LinkId, OrganizationId};

    #[test]
    fn composite_key_layout() {
        let campaign_id = CampaignId::generate();
        let link_id = LinkId::generate();

        let key = composite_key(&campaign_id, &link_id);
        assert_eq!(key.len(), 32);
        assert!(key.starts_with(&prefix(&campaign_id)));

        let child = LinkId::from_slice(child_bytes(&key).unwrap()).unwrap();
        assert_eq!(child, link_id);
    }

    #[test]
    fn child_bytes_rejects_short_keys() {
        let org = OrganizationId::generate();
        assert!(child_bytes(&id_key(&org)).is_err());
    }

    #[test]
    fn prefixes_do_not_overlap() {
        let org_a = OrganizationId::generate();
        let org_b = OrganizationId::generate();
        let key = composite_key(&org_a, &CampaignId::generate());
        assert!(!key.starts_with(&prefix(&org_b)));
    }
}
