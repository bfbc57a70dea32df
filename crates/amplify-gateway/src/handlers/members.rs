//! Organization membership endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use amplify_auth::JwtValidator;
use amplify_core::{OrganizationId, UserId};
use amplify_facade::{Facade, Membership};

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for member list.
#[derive(Debug, Serialize)]
pub struct ListMembersResponse {
    /// Memberships of the organization.
    pub members: Vec<Membership>,
}

/// Request to add a member.
#[derive(Debug, Deserialize)]
pub struct AddMemberBody {
    /// The user to add.
    pub user_id: String,
    /// One of `owner`, `admin`, `member`.
    pub role: String,
}

/// Request to change a member's role.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberBody {
    /// One of `owner`, `admin`, `member`.
    pub role: String,
}

/// List the members of an organization.
///
/// # Errors
///
/// Returns `403` if the caller is not a member.
pub async fn list_members<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(organization_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    let members = state
        .facade
        .list_members(&user.user_id, &organization_id)
        .await?;

    Ok(Json(ListMembersResponse { members }))
}

/// Add a member to an organization.
///
/// # Errors
///
/// Returns `409` if the user is already a member.
pub async fn add_member<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(organization_id): Path<String>,
    body: Result<Json<AddMemberBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    let Json(body) = body?;
    let member_id: UserId = parse_id("user", &body.user_id)?;

    let membership = state
        .facade
        .add_member(&user.user_id, &organization_id, &member_id, &body.role)
        .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Change a member's role.
///
/// # Errors
///
/// Returns `409` when demoting the last owner.
pub async fn update_member<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path((organization_id, member_id)): Path<(String, String)>,
    body: Result<Json<UpdateMemberBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    let member_id: UserId = parse_id("user", &member_id)?;
    let Json(body) = body?;

    let membership = state
        .facade
        .update_member_role(&user.user_id, &organization_id, &member_id, &body.role)
        .await?;

    Ok(Json(membership))
}

/// Remove a member from an organization.
///
/// # Errors
///
/// Returns `409` when removing the last owner.
pub async fn remove_member<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path((organization_id, member_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let organization_id: OrganizationId = parse_id("organization", &organization_id)?;
    let member_id: UserId = parse_id("user", &member_id)?;

    state
        .facade
        .remove_member(&user.user_id, &organization_id, &member_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
