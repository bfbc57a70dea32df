//! HTTP request handlers.
//!
//! Handlers are thin: parse path ids, hand the body to the facade, wrap
//! the result. All checks happen behind [`Facade`](amplify_facade::Facade).

use std::str::FromStr;

use serde::Deserialize;

use crate::error::ApiError;

pub mod campaigns;
pub mod content;
pub mod health;
pub mod influencers;
pub mod links;
pub mod me;
pub mod members;
pub mod organizations;

/// Body for the `.../status` endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    /// The new status value.
    pub status: String,
}

/// Parse a path segment into a typed id.
pub(crate) fn parse_id<T: FromStr>(kind: &str, s: &str) -> Result<T, ApiError> {
    s.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid {kind} ID: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use amplify_core::CampaignId;

    #[test]
    fn parse_id_accepts_uuid() {
        let id = CampaignId::generate();
        let parsed: CampaignId = parse_id("campaign", &id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id::<CampaignId>("campaign", "nope").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "invalid campaign ID: nope"));
    }
}
