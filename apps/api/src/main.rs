mod applications;
mod auth;
mod config;
mod errors;
mod gateway;
mod models;
mod profile;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::m2m::M2mClient;
use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::gateway::GatewayClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gigs API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by the token exchange and every upstream call
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let tokens = Arc::new(M2mClient::new(http.clone(), config.auth0.clone()));
    let gateway = GatewayClient::new(
        http,
        &config.api_v5_url,
        &config.recruit_api_url,
        tokens,
    )
    .context("API_V5_URL and RECRUIT_API_URL must be absolute URLs")?;
    info!(
        "Upstream gateway initialized (v5: {}, recruit: {})",
        config.api_v5_url, config.recruit_api_url
    );

    if config.valid_issuers.is_empty() {
        warn!("VALID_ISSUERS is empty; token issuers will not be checked");
    }
    let jwt = Arc::new(JwtVerifier::new(&config.auth_secret, &config.valid_issuers));

    // Build app state
    let state = AppState {
        config: config.clone(),
        upstream: Arc::new(gateway),
        jwt,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr} under {}", config.api_base_path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
