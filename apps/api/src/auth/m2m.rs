//! Client-credentials exchange for service-to-service calls.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Auth0Config;
use crate::errors::AppError;
use crate::gateway::response::upstream_error;

/// Issues machine tokens. Carried by the gateway as `Arc<dyn TokenProvider>`
/// so tests can swap in a fixed token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn machine_token(&self) -> Result<String, AppError>;
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
    auth0_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Performs a fresh exchange on every call; nothing is cached.
#[derive(Clone)]
pub struct M2mClient {
    http: Client,
    config: Auth0Config,
}

impl M2mClient {
    pub fn new(http: Client, config: Auth0Config) -> Self {
        Self { http, config }
    }

    fn token_url(&self) -> &str {
        self.config
            .proxy_server_url
            .as_deref()
            .unwrap_or(self.config.url.as_str())
    }
}

#[async_trait]
impl TokenProvider for M2mClient {
    async fn machine_token(&self) -> Result<String, AppError> {
        let body = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            audience: &self.config.audience,
            auth0_url: &self.config.url,
        };

        let response = self.http.post(self.token_url()).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(upstream_error(status, &text));
        }

        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Unreadable token response: {e}")))?;

        debug!("Obtained machine token");
        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Upstream {
                status: 500,
                message: Some("Unable to get a machine token".to_string()),
            })
    }
}
