//! Amplify gateway binary.
//!
//! # Dev Mode
//!
//! Build with `--features dev-mode` to use a mock JWT validator that never
//! contacts the identity provider. Tokens look like
//! `test-token:<user-uuid>:<email>`.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(not(feature = "dev-mode"))]
use amplify_auth::{AuthConfig, JwksValidator};
#[cfg(feature = "dev-mode")]
use amplify_auth::MockJwtValidator;
use amplify_facade::FacadeService;
use amplify_gateway::{create_router, GatewayConfig, GatewayState};
use amplify_store::RocksStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,amplify=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Amplify gateway");

    let gateway_config = GatewayConfig::from_env();

    tracing::info!(
        listen_addr = %gateway_config.listen_addr,
        data_dir = %gateway_config.data_dir,
        cors_origins = ?gateway_config.cors_origins,
        "Gateway configuration loaded"
    );

    tracing::info!(path = %gateway_config.data_dir, "Opening RocksDB store");
    let store = Arc::new(RocksStore::open(&gateway_config.data_dir)?);
    let facade = Arc::new(FacadeService::with_defaults(store));

    #[cfg(feature = "dev-mode")]
    let jwt_validator = {
        tracing::warn!("DEV MODE ENABLED - using mock JWT validator");
        tracing::warn!("Use tokens in format: test-token:<user-uuid>:<email>");
        Arc::new(MockJwtValidator)
    };

    #[cfg(not(feature = "dev-mode"))]
    let jwt_validator = {
        let auth_config = AuthConfig::from_env();
        tracing::info!(
            auth_issuer = %auth_config.issuer(),
            auth_audience = %auth_config.audience,
            jwks_refresh_seconds = auth_config.jwks_refresh_seconds,
            "Identity provider configuration loaded"
        );
        Arc::new(JwksValidator::new(auth_config)?)
    };
    tracing::info!("JWT validator initialized");

    let listen_addr = gateway_config.listen_addr.clone();
    let state = GatewayState::new(facade, jwt_validator, gateway_config);
    let app = create_router(state);

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
