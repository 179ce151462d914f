//! Inbound authentication.
//!
//! Handlers take a [`CurrentUser`] argument; the extractor verifies the
//! bearer token and tells end users apart from machine (client-credentials)
//! callers.

pub mod m2m;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

const MACHINE_GRANT_TYPE: &str = "client-credentials";

/// The authenticated caller of an inbound request.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser {
    /// Raw bearer token, forwarded upstream by update operations.
    pub token: String,
    pub is_machine: bool,
    pub user_id: Option<String>,
    pub handle: Option<String>,
}

impl CurrentUser {
    /// `Authorization` header value carrying the caller's own token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn from_claims(token: &str, claims: &Map<String, Value>) -> Self {
        let is_machine = claims.get("gty").and_then(Value::as_str) == Some(MACHINE_GRANT_TYPE);

        // User claims are namespaced, e.g. `https://topcoder.com/claims/handle`.
        let user_id = namespaced_claim(claims, "userId").and_then(scalar_to_string);
        let handle = namespaced_claim(claims, "handle").and_then(scalar_to_string);

        Self {
            token: token.to_string(),
            is_machine,
            user_id,
            handle,
        }
    }
}

fn namespaced_claim<'a>(claims: &'a Map<String, Value>, suffix: &str) -> Option<&'a Value> {
    claims
        .iter()
        .find(|(key, _)| key.as_str() == suffix || key.ends_with(&format!("/{suffix}")))
        .map(|(_, value)| value)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Verifies HS256 bearer tokens against the configured secret and issuers.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, valid_issuers: &[String]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        if !valid_issuers.is_empty() {
            validation.set_issuer(valid_issuers);
        }
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<CurrentUser, AppError> {
        let data = decode::<Map<String, Value>>(token, &self.key, &self.validation).map_err(|e| {
            debug!("Rejected bearer token: {e}");
            AppError::Unauthorized("Invalid Token.".to_string())
        })?;
        Ok(CurrentUser::from_claims(token, &data.claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("No token provided.".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("No token provided.".to_string()))?;

        state.jwt.verify(token)
    }
}
