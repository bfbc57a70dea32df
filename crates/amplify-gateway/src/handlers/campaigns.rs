//! Campaign endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use amplify_auth::JwtValidator;
use amplify_core::{CampaignId, OrganizationId};
use amplify_facade::{Campaign, CampaignDraft, Facade};

use super::{parse_id, StatusBody};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for campaign list.
#[derive(Debug, Serialize)]
pub struct ListCampaignsResponse {
    /// Campaigns of the current organization.
    pub campaigns: Vec<Campaign>,
}

/// List the campaigns of the caller's current organization.
///
/// # Errors
///
/// Returns `400` if the caller has no current organization.
pub async fn list_campaigns<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let campaigns = state.facade.list_campaigns(&user.user_id).await?;
    Ok(Json(ListCampaignsResponse { campaigns }))
}

/// Create a campaign in an organization.
///
/// # Errors
///
/// Returns `400` if the draft is invalid, `403` if the caller is not a member.
pub async fn create_campaign<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(organization_id): Path<String>,
    body: Result<Json<CampaignDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    let Json(draft) = body?;

    let campaign = state
        .facade
        .create_campaign(&user.user_id, &organization_id, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(campaign)))
}

/// Get a campaign.
///
/// # Errors
///
/// Returns `404` if it does not exist, `403` if it belongs to another organization.
pub async fn get_campaign<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(campaign_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let campaign_id: CampaignId = parse_id("campaign", &campaign_id)?;
    let campaign = state
        .facade
        .get_campaign(&user.user_id, &campaign_id)
        .await?;

    Ok(Json(campaign))
}

/// Replace a campaign's fields.
///
/// # Errors
///
/// Returns `400` if the draft is invalid.
pub async fn update_campaign<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(campaign_id): Path<String>,
    body: Result<Json<CampaignDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let campaign_id: CampaignId = parse_id("campaign", &campaign_id)?;
    let Json(draft) = body?;

    let campaign = state
        .facade
        .update_campaign(&user.user_id, &campaign_id, draft)
        .await?;

    Ok(Json(campaign))
}

/// Change a campaign's status.
///
/// # Errors
///
/// Returns `400` if the status is not one of the campaign statuses.
pub async fn set_campaign_status<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(campaign_id): Path<String>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let campaign_id: CampaignId = parse_id("campaign", &campaign_id)?;
    let Json(body) = body?;

    let campaign = state
        .facade
        .set_campaign_status(&user.user_id, &campaign_id, &body.status)
        .await?;

    Ok(Json(campaign))
}

/// Delete a campaign with its influencer links and their content.
///
/// # Errors
///
/// Returns `404` if it does not exist.
pub async fn delete_campaign<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(campaign_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let campaign_id: CampaignId = parse_id("campaign", &campaign_id)?;
    state
        .facade
        .delete_campaign(&user.user_id, &campaign_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
