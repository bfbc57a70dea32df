//! Content calendar endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use amplify_auth::JwtValidator;
use amplify_core::{ContentId, LinkId};
use amplify_facade::{Content, ContentDraft, Facade};

use super::{parse_id, StatusBody};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for content list.
#[derive(Debug, Serialize)]
pub struct ListContentResponse {
    /// Content items, ordered by scheduled time.
    pub content: Vec<Content>,
}

/// The content calendar of the caller's current organization.
///
/// # Errors
///
/// Returns `400` if the caller has no current organization.
pub async fn list_content<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let content = state.facade.list_content(&user.user_id).await?;
    Ok(Json(ListContentResponse { content }))
}

/// List the content of one link.
///
/// # Errors
///
/// Returns `404` if the link does not exist.
pub async fn list_link_content<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(link_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let link_id: LinkId = parse_id("link", &link_id)?;
    let content = state
        .facade
        .list_content_for_link(&user.user_id, &link_id)
        .await?;

    Ok(Json(ListContentResponse { content }))
}

/// Create a content item under a link.
///
/// # Errors
///
/// Returns `400` if the draft is invalid, `404` if the link does not exist.
pub async fn create_content<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(link_id): Path<String>,
    body: Result<Json<ContentDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let link_id: LinkId = parse_id("link", &link_id)?;
    let Json(draft) = body?;

    let content = state
        .facade
        .create_content(&user.user_id, &link_id, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(content)))
}

/// Get a content item.
///
/// # Errors
///
/// Returns `404` if it does not exist.
pub async fn get_content<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(content_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let content_id: ContentId = parse_id("content", &content_id)?;
    let content = state
        .facade
        .get_content(&user.user_id, &content_id)
        .await?;

    Ok(Json(content))
}

/// Replace a content item's fields.
///
/// # Errors
///
/// Returns `400` if the draft is invalid.
pub async fn update_content<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(content_id): Path<String>,
    body: Result<Json<ContentDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let content_id: ContentId = parse_id("content", &content_id)?;
    let Json(draft) = body?;

    let content = state
        .facade
        .update_content(&user.user_id, &content_id, draft)
        .await?;

    Ok(Json(content))
}

/// Change a content item's status.
///
/// # Errors
///
/// Returns `400` if the status is not one of the content statuses.
pub async fn set_content_status<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(content_id): Path<String>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let content_id: ContentId = parse_id("content", &content_id)?;
    let Json(body) = body?;

    let content = state
        .facade
        .set_content_status(&user.user_id, &content_id, &body.status)
        .await?;

    Ok(Json(content))
}

/// Delete a content item.
///
/// # Errors
///
/// Returns `404` if it does not exist.
pub async fn delete_content<F, V>(
    State(state): State<Arc<GatewayState<F, V>>>,
    user: AuthUser,
    Path(content_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let content_id: ContentId = parse_id("content", &content_id)?;
    state
        .facade
        .delete_content(&user.user_id, &content_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
