//! HTTP client for the gateway REST API.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{
    ApiErrorResponse, Campaign, CampaignInfluencer, Content, Influencer, ListCampaignsResponse,
    ListContentResponse, ListInfluencersResponse, ListLinksResponse, ListOrganizationsResponse,
    Organization, Profile, SwitchOrganizationRequest,
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error envelope.
        message: String,
    },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The token cannot be sent as a header.
    #[error("token contains characters not allowed in a header")]
    InvalidToken,
}

/// Client for the gateway REST API.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GatewayClient {
    /// Create a new gateway client.
    ///
    /// `base_url` is the gateway root (e.g. "http://localhost:8080").
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Build headers for authenticated requests.
    fn auth_headers(&self) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ClientError::InvalidToken)?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Handle API error responses.
    async fn handle_error(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let message = match response.json::<ApiErrorResponse>().await {
            Ok(err) => err.error.message,
            Err(_) => "Unknown error".to_string(),
        };
        ClientError::Api { status, message }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(Self::handle_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await?;

        Self::parse(response).await
    }

    // =========================================================================
    // Caller
    // =========================================================================

    /// Get the caller's profile.
    pub async fn me(&self) -> Result<Profile, ClientError> {
        self.get("/v1/me").await
    }

    /// Switch the caller's current organization.
    pub async fn switch_organization(&self, organization_id: &str) -> Result<Profile, ClientError> {
        let request = SwitchOrganizationRequest {
            organization_id: organization_id.to_string(),
        };
        self.post("/v1/me/organization", &request).await
    }

    // =========================================================================
    // Lists
    // =========================================================================

    /// List the caller's organizations.
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, ClientError> {
        let body: ListOrganizationsResponse = self.get("/v1/organizations").await?;
        Ok(body.organizations)
    }

    /// List the influencers of the current organization.
    pub async fn list_influencers(&self) -> Result<Vec<Influencer>, ClientError> {
        let body: ListInfluencersResponse = self.get("/v1/influencers").await?;
        Ok(body.influencers)
    }

    /// List the campaigns of the current organization.
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, ClientError> {
        let body: ListCampaignsResponse = self.get("/v1/campaigns").await?;
        Ok(body.campaigns)
    }

    /// List the influencer links of a campaign.
    pub async fn list_links(&self, campaign_id: &str) -> Result<Vec<CampaignInfluencer>, ClientError> {
        let body: ListLinksResponse = self
            .get(&format!("/v1/campaigns/{campaign_id}/influencers"))
            .await?;
        Ok(body.influencers)
    }

    /// The content calendar, or the content of one link.
    pub async fn list_content(&self, link_id: Option<&str>) -> Result<Vec<Content>, ClientError> {
        let path = match link_id {
            Some(link_id) => format!("/v1/campaign-influencers/{link_id}/content"),
            None => "/v1/content".to_string(),
        };
        let body: ListContentResponse = self.get(&path).await?;
        Ok(body.content)
    }
}
