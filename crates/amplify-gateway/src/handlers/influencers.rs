//! Influencer endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use amplify_auth::JwtValidator;
use amplify_core::{InfluencerId, OrganizationId};
use amplify_facade::{Facade, Influencer, InfluencerDraft};

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for influencer list.
#[derive(Debug, Serialize)]
pub struct ListInfluencersResponse {
    /// Influencers of the current organization.
    pub influencers: Vec<Influencer>,
}

/// List the influencers of the caller's current organization.
///
/// # Errors
///
/// Returns `400` if the caller has no current organization.
pub async fn list_influencers<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let influencers = state.facade.list_influencers(&user.user_id).await?;
    Ok(Json(ListInfluencersResponse { influencers }))
}

/// Create an influencer in an organization.
///
/// # Errors
///
/// Returns `400` if the draft is invalid, `403` if the caller is not a member.
pub async fn create_influencer<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(organization_id): Path<String>,
    body: Result<Json<InfluencerDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    let Json(draft) = body?;

    let influencer = state
        .facade
        .create_influencer(&user.user_id, &organization_id, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(influencer)))
}

/// Get an influencer.
///
/// # Errors
///
/// Returns `404` if it does not exist, `403` if it belongs to another organization.
pub async fn get_influencer<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(influencer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let influencer_id: InfluencerId = parse_id("influencer", &influencer_id)?;
    let influencer = state
        .facade
        .get_influencer(&user.user_id, &influencer_id)
        .await?;

    Ok(Json(influencer))
}

/// Replace an influencer's fields.
///
/// # Errors
///
/// Returns `400` if the draft is invalid.
pub async fn update_influencer<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(influencer_id): Path<String>,
    body: Result<Json<InfluencerDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let influencer_id: InfluencerId = parse_id("influencer", &influencer_id)?;
    let Json(draft) = body?;

    let influencer = state
        .facade
        .update_influencer(&user.user_id, &influencer_id, draft)
        .await?;

    Ok(Json(influencer))
}

/// Delete an influencer with its campaign links and their content.
///
/// # Errors
///
/// Returns `404` if it does not exist.
pub async fn delete_influencer<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(influencer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let influencer_id: InfluencerId = parse_id("influencer", &influencer_id)?;
    state
        .facade
        .delete_influencer(&user.user_id, &influencer_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
