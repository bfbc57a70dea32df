//! Organization endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use amplify_auth::JwtValidator;
use amplify_core::OrganizationId;
use amplify_facade::{Facade, NewOrganization, Organization};

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for organization list.
#[derive(Debug, Serialize)]
pub struct ListOrganizationsResponse {
    /// Organizations the caller belongs to.
    pub organizations: Vec<Organization>,
}

/// List the caller's organizations.
///
/// # Errors
///
/// Returns an error if the facade operation fails.
pub async fn list_organizations<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organizations = state.facade.list_organizations(&user.user_id).await?;
    Ok(Json(ListOrganizationsResponse { organizations }))
}

/// Create an organization owned by the caller.
///
/// # Errors
///
/// Returns `400` if the name is invalid.
pub async fn create_organization<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    body: Result<Json<NewOrganization>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let Json(body) = body?;
    let organization = state
        .facade
        .create_organization(&user.user_id, body)
        .await?;

    Ok((StatusCode::CREATED, Json(organization)))
}

/// Get an organization.
///
/// # Errors
///
/// Returns `403` if the caller is not a member.
pub async fn get_organization<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(organization_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    let organization = state
        .facade
        .get_organization(&user.user_id, &organization_id)
        .await?;

    Ok(Json(organization))
}

/// Rename an organization or change its logo.
///
/// # Errors
///
/// Returns `403` unless the caller is an owner or admin.
pub async fn update_organization<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(organization_id): Path<String>,
    body: Result<Json<NewOrganization>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    let Json(body) = body?;
    let organization = state
        .facade
        .update_organization(&user.user_id, &organization_id, body)
        .await?;

    Ok(Json(organization))
}

/// Delete an organization and all its data.
///
/// # Errors
///
/// Returns `403` unless the caller is an owner.
pub async fn delete_organization<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(organization_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    state
        .facade
        .delete_organization(&user.user_id, &organization_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
