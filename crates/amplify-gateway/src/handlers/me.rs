//! Endpoints about the calling user.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use amplify_auth::JwtValidator;
use amplify_core::OrganizationId;
use amplify_facade::Facade;

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Request to switch the current organization.
#[derive(Debug, Deserialize)]
pub struct SwitchOrganizationBody {
    /// The organization to make current.
    pub organization_id: String,
}

/// Get the caller's profile.
///
/// # Errors
///
/// Returns an error if the profile cannot be loaded.
pub async fn get_me<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let profile = state.facade.get_profile(&user.user_id).await?;
    Ok(Json(profile))
}

/// Switch the caller's current organization.
///
/// # Errors
///
/// Returns `403` if the caller is not a member of the organization.
pub async fn switch_organization<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    body: Result<Json<SwitchOrganizationBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let Json(body) = body?;
    let organization_id: OrganizationId = parse_id("organization", &body.organization_id)?;

    let profile = state
        .facade
        .switch_organization(&user.user_id, &organization_id)
        .await?;

    tracing::debug!(user_id = %user.user_id, organization_id = %organization_id, "Switched organization");
    Ok(Json(profile))
}
