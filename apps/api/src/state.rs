use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::gateway::Upstream;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream services. Default: `GatewayClient`; tests swap in a fake.
    pub upstream: Arc<dyn Upstream>,
    /// Verifies inbound bearer tokens for the `CurrentUser` extractor.
    pub jwt: Arc<JwtVerifier>,
}
