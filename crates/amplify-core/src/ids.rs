//! Core identifier types for amplify.
//!
//! Every table row is addressed by a 16-byte UUID wrapped in its own newtype so
//! that a campaign ID can never be passed where an influencer ID is expected.
//! The raw bytes are used directly as `RocksDB` key material.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdError;

/// Length in bytes of every identifier.
pub const ID_LEN: usize = 16;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Create an identifier from a UUID.
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Create an identifier from its raw bytes.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
                Self(uuid::Uuid::from_bytes(bytes))
            }

            /// Read an identifier from a byte slice.
            ///
            /// # Errors
            ///
            /// Returns an error if the slice is not exactly 16 bytes long.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
                let arr: [u8; ID_LEN] = bytes.try_into().map_err(|_| IdError::InvalidLength {
                    expected: ID_LEN,
                    got: bytes.len(),
                })?;
                Ok(Self::from_bytes(arr))
            }

            /// Return the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Return the bytes of the UUID.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; ID_LEN] {
                self.0.as_bytes()
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = uuid::Uuid::parse_str(s)
                    .map_err(|_| IdError::InvalidUuid(s.to_string()))?;
                Ok(Self(uuid))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_bytes()
            }
        }
    };
}

uuid_id! {
    /// Identity of an authenticated user.
    ///
    /// Taken verbatim from the `sub` claim of the identity token, so the same
    /// person always maps to the same profile.
    UserId
}

uuid_id! {
    /// Identifier of an organization, the unit of tenant isolation.
    OrganizationId
}

uuid_id! {
    /// Identifier of an influencer record.
    InfluencerId
}

uuid_id! {
    /// Identifier of a campaign.
    CampaignId
}

uuid_id! {
    /// Identifier of a campaign-influencer link.
    LinkId
}

uuid_id! {
    /// Identifier of a content item.
    ContentId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_roundtrip() {
        let uuid = uuid::Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        let parsed = UserId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn invalid_uuid_rejected() {
        let result = OrganizationId::from_str("not-a-uuid");
        assert_eq!(result, Err(IdError::InvalidUuid("not-a-uuid".to_string())));
    }

    #[test]
    fn from_slice_checks_length() {
        let id = CampaignId::generate();
        assert_eq!(CampaignId::from_slice(id.as_bytes()).unwrap(), id);

        let result = CampaignId::from_slice(&[1, 2, 3]);
        assert!(matches!(
            result,
            Err(IdError::InvalidLength {
                expected: 16,
                got: 3
            })
        ));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(LinkId::generate(), LinkId::generate());
    }

    #[test]
    fn serde_uses_hyphenated_string() {
        let id = InfluencerId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));

        let parsed: InfluencerId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serde_rejects_garbage() {
        let result: Result<ContentId, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }

    #[test]
    fn debug_names_the_type() {
        let uuid = uuid::Uuid::nil();
        let id = OrganizationId::from_uuid(uuid);
        assert_eq!(
            format!("{id:?}"),
            "OrganizationId(00000000-0000-0000-0000-000000000000)"
        );
    }
}
