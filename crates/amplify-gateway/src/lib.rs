//! HTTP gateway for amplify.
//!
//! Serves the [`Facade`](amplify_facade::Facade) as a JSON API under `/v1`.
//! A request passes through these stages:
//!
//! ```text
//! request
//!   -> tower layers (trace, CORS, body limit, timeout)
//!   -> AuthUser extractor (bearer token -> ValidatedClaims -> ensure_profile)
//!   -> handler (path ids and JSON body parsed, facade call)
//!   -> JSON body, or ApiError envelope {"error": {"code", "message"}}
//! ```
//!
//! Only `/health` is reachable without a token. Tenant checks happen inside
//! the facade; handlers never filter rows themselves.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use amplify_auth::{AuthConfig, JwksValidator};
//! use amplify_facade::FacadeService;
//! use amplify_gateway::{create_router, GatewayConfig, GatewayState};
//! use amplify_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::from_env();
//! let store = Arc::new(RocksStore::open(&config.data_dir)?);
//! let validator = Arc::new(JwksValidator::new(AuthConfig::from_env())?);
//!
//! let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
//! let facade = Arc::new(FacadeService::with_defaults(store));
//! let app = create_router(GatewayState::new(facade, validator, config));
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::AuthUser;
pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
