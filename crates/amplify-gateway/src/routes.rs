//! Router configuration.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use amplify_auth::JwtValidator;
use amplify_facade::Facade;

use crate::handlers::{
    campaigns, content, health, influencers, links, me, members, organizations,
};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Caller
/// - `GET /v1/me` - Profile
/// - `POST /v1/me/organization` - Switch current organization
///
/// ## Organizations
/// - `GET|POST /v1/organizations`
/// - `GET|PATCH|DELETE /v1/organizations/:organization_id`
/// - `GET|POST /v1/organizations/:organization_id/members`
/// - `PATCH|DELETE /v1/organizations/:organization_id/members/:user_id`
/// - `POST /v1/organizations/:organization_id/influencers`
/// - `POST /v1/organizations/:organization_id/campaigns`
///
/// ## Influencers and campaigns (current organization)
/// - `GET /v1/influencers`, `GET|PUT|DELETE /v1/influencers/:influencer_id`
/// - `GET /v1/campaigns`, `GET|PUT|DELETE /v1/campaigns/:campaign_id`
/// - `POST /v1/campaigns/:campaign_id/status`
///
/// ## Campaign influencers
/// - `GET|POST /v1/campaigns/:campaign_id/influencers`
/// - `GET|PUT|DELETE /v1/campaign-influencers/:link_id`
/// - `POST /v1/campaign-influencers/:link_id/status`
///
/// ## Content
/// - `GET /v1/content`
/// - `GET|POST /v1/campaign-influencers/:link_id/content`
/// - `GET|PUT|DELETE /v1/content/:content_id`
/// - `POST /v1/content/:content_id/status`
pub fn create_router<F, V>(state: GatewayState<F, V>) -> Router
where
    F: Facade + 'static,
    V: JwtValidator + 'static,
{
    let cors = build_cors_layer(&state.config.cors_origins);
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(TimeoutLayer::new(state.config.request_timeout()));

    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health::health))
        // Caller
        .route("/v1/me", get(me::get_me::<F, V>))
        .route(
            "/v1/me/organization",
            post(me::switch_organization::<F, V>),
        )
        // Organizations
        .route(
            "/v1/organizations",
            get(organizations::list_organizations::<F, V>)
                .post(organizations::create_organization::<F, V>),
        )
        .route(
            "/v1/organizations/:organization_id",
            get(organizations::get_organization::<F, V>)
                .patch(organizations::update_organization::<F, V>)
                .delete(organizations::delete_organization::<F, V>),
        )
        .route(
            "/v1/organizations/:organization_id/members",
            get(members::list_members::<F, V>).post(members::add_member::<F, V>),
        )
        .route(
            "/v1/organizations/:organization_id/members/:user_id",
            patch(members::update_member::<F, V>)
                .delete(members::remove_member::<F, V>),
        )
        .route(
            "/v1/organizations/:organization_id/influencers",
            post(influencers::create_influencer::<F, V>),
        )
        .route(
            "/v1/organizations/:organization_id/campaigns",
            post(campaigns::create_campaign::<F, V>),
        )
        // Influencers
        .route(
            "/v1/influencers",
            get(influencers::list_influencers::<F, V>),
        )
        .route(
            "/v1/influencers/:influencer_id",
            get(influencers::get_influencer::<F, V>)
                .put(influencers::update_influencer::<F, V>)
                .delete(influencers::delete_influencer::<F, V>),
        )
        // Campaigns
        .route("/v1/campaigns", get(campaigns::list_campaigns::<F, V>))
        .route(
            "/v1/campaigns/:campaign_id",
            get(campaigns::get_campaign::<F, V>)
                .put(campaigns::update_campaign::<F, V>)
                .delete(campaigns::delete_campaign::<F, V>),
        )
        .route(
            "/v1/campaigns/:campaign_id/status",
            post(campaigns::set_campaign_status::<F, V>),
        )
        // Campaign influencers
        .route(
            "/v1/campaigns/:campaign_id/influencers",
            get(links::list_links::<F, V>).post(links::add_link::<F, V>),
        )
        .route(
            "/v1/campaign-influencers/:link_id",
            get(links::get_link::<F, V>)
                .put(links::update_link::<F, V>)
                .delete(links::remove_link::<F, V>),
        )
        .route(
            "/v1/campaign-influencers/:link_id/status",
            post(links::set_link_status::<F, V>),
        )
        // Content
        .route("/v1/content", get(content::list_content::<F, V>))
        .route(
            "/v1/campaign-influencers/:link_id/content",
            get(content::list_link_content::<F, V>).post(content::create_content::<F, V>),
        )
        .route(
            "/v1/content/:content_id",
            get(content::get_content::<F, V>)
                .put(content::update_content::<F, V>)
                .delete(content::delete_content::<F, V>),
        )
        .route(
            "/v1/content/:content_id/status",
            post(content::set_content_status::<F, V>),
        )
        .layer(middleware)
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
