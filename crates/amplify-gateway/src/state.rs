//! Gateway application state.

use std::sync::Arc;

use amplify_auth::JwtValidator;
use amplify_facade::Facade;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// Handlers receive it as `State<Arc<GatewayState<F, V>>>`.
pub struct GatewayState<F, V>
where
    F: Facade,
    V: JwtValidator,
{
    /// The facade every handler goes through.
    pub facade: Arc<F>,
    /// The JWT validator for authentication.
    pub jwt_validator: Arc<V>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<F, V> GatewayState<F, V>
where
    F: Facade,
    V: JwtValidator,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(facade: Arc<F>, jwt_validator: Arc<V>, config: GatewayConfig) -> Self {
        Self {
            facade,
            jwt_validator,
            config,
        }
    }
}

impl<F, V> Clone for GatewayState<F, V>
where
    F: Facade,
    V: JwtValidator,
{
    fn clone(&self) -> Self {
        Self {
            facade: Arc::clone(&self.facade),
            jwt_validator: Arc::clone(&self.jwt_validator),
            config: self.config.clone(),
        }
    }
}
