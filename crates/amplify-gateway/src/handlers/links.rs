//! Campaign-influencer link endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use amplify_auth::JwtValidator;
use amplify_core::{CampaignId, InfluencerId, LinkId};
use amplify_facade::{CampaignInfluencer, Facade, LinkDraft};

use super::{parse_id, StatusBody};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for link list.
#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    /// Influencer links of the campaign.
    pub influencers: Vec<CampaignInfluencer>,
}

/// Request to link an influencer to a campaign.
#[derive(Debug, Deserialize)]
pub struct AddLinkBody {
    /// The influencer to link.
    pub influencer_id: String,
    /// Terms of the link.
    #[serde(flatten)]
    pub draft: LinkDraft,
}

/// List the influencer links of a campaign.
///
/// # Errors
///
/// Returns `404` if the campaign does not exist.
pub async fn list_links<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(campaign_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let campaign_id: CampaignId = parse_id("campaign", &campaign_id)?;
    let influencers = state
        .facade
        .list_campaign_influencers(&user.user_id, &campaign_id)
        .await?;

    Ok(Json(ListLinksResponse { influencers }))
}

/// Link an influencer to a campaign.
///
/// # Errors
///
/// Returns `409` if the pair is already linked.
pub async fn add_link<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(campaign_id): Path<String>,
    body: Result<Json<AddLinkBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let campaign_id: CampaignId = parse_id("campaign", &campaign_id)?;
    let Json(body) = body?;
    let influencer_id: InfluencerId = parse_id("influencer", &body.influencer_id)?;

    let link = state
        .facade
        .add_campaign_influencer(&user.user_id, &campaign_id, &influencer_id, body.draft)
        .await?;

    Ok((StatusCode::CREATED, Json(link)))
}

/// Get a link.
///
/// # Errors
///
/// Returns `404` if it does not exist.
pub async fn get_link<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(link_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let link_id: LinkId = parse_id("link", &link_id)?;
    let link = state
        .facade
        .get_campaign_influencer(&user.user_id, &link_id)
        .await?;

    Ok(Json(link))
}

/// Replace a link's terms.
///
/// # Errors
///
/// Returns `400` if the status is invalid.
pub async fn update_link<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(link_id): Path<String>,
    body: Result<Json<LinkDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let link_id: LinkId = parse_id("link", &link_id)?;
    let Json(draft) = body?;

    let link = state
        .facade
        .update_campaign_influencer(&user.user_id, &link_id, draft)
        .await?;

    Ok(Json(link))
}

/// Change a link's status.
///
/// # Errors
///
/// Returns `400` if the status is not one of the link statuses.
pub async fn set_link_status<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(link_id): Path<String>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let link_id: LinkId = parse_id("link", &link_id)?;
    let Json(body) = body?;

    let link = state
        .facade
        .set_campaign_influencer_status(&user.user_id, &link_id, &body.status)
        .await?;

    Ok(Json(link))
}

/// Remove a link and its content.
///
/// # Errors
///
/// Returns `404` if it does not exist.
pub async fn remove_link<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(link_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let link_id: LinkId = parse_id("link", &link_id)?;
    state
        .facade
        .remove_campaign_influencer(&user.user_id, &link_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
