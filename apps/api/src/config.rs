use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Mount point of the inbound routes, e.g. `/api/my-gigs`.
    pub api_base_path: String,
    pub api_v5_url: String,
    pub recruit_api_url: String,
    pub auth0: Auth0Config,
    /// HS256 secret used to verify inbound bearer tokens.
    pub auth_secret: String,
    pub valid_issuers: Vec<String>,
    pub upstream_timeout_secs: u64,
}

/// Client-credentials settings for the machine token exchange.
#[derive(Debug, Clone)]
pub struct Auth0Config {
    pub url: String,
    pub audience: String,
    pub client_id: String,
    pub client_secret: String,
    pub proxy_server_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8512".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            api_base_path: optional_env("API_BASE_PATH")
                .map(|p| normalize_base_path(&p))
                .unwrap_or_else(|| "/api/my-gigs".to_string()),
            api_v5_url: optional_env("API_V5_URL")
                .unwrap_or_else(|| "https://api.topcoder.com/v5".to_string())
                .trim_end_matches('/')
                .to_string(),
            recruit_api_url: optional_env("RECRUIT_API_URL")
                .unwrap_or_else(|| "https://www.topcoder.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            auth0: Auth0Config {
                url: require_env("AUTH0_URL")?,
                audience: require_env("AUTH0_AUDIENCE")?,
                client_id: require_env("AUTH0_CLIENT_ID")?,
                client_secret: require_env("AUTH0_CLIENT_SECRET")?,
                proxy_server_url: optional_env("AUTH0_PROXY_SERVER_URL"),
            },
            auth_secret: require_env("AUTH_SECRET")?,
            valid_issuers: parse_issuers(&optional_env("VALID_ISSUERS").unwrap_or_default())
                .context("VALID_ISSUERS must be a JSON array or a comma separated list")?,
            upstream_timeout_secs: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Accepts `["a","b"]` as well as `a,b`.
fn parse_issuers(raw: &str) -> Result<Vec<String>> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        return Ok(serde_json::from_str(raw)?);
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
