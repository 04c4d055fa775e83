//! OAuth2 access-token minting via the JWT-bearer grant.
//!
//! A [`TokenProvider`] is scoped to one OAuth scope. It signs an RS256
//! assertion with the service-account key, exchanges it at the token
//! endpoint, and caches the result until shortly before expiry. Cloning
//! is cheap; clones share the cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{GcpError, ServiceAccountKey};

/// Assertion lifetime requested from the token endpoint.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the cached token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// HTTP timeout for the token exchange request.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// JWT-bearer grant type, per RFC 7523.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime in seconds.
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_at: std::time::Instant,
}

// ---------------------------------------------------------------------------
// TokenProvider
// ---------------------------------------------------------------------------

/// Mints and caches OAuth2 access tokens for one scope.
#[derive(Clone)]
pub struct TokenProvider {
    key: Arc<ServiceAccountKey>,
    scope: String,
    http: reqwest::Client,
    cache: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenProvider {
    /// Create a provider for the given key and OAuth scope.
    pub fn new(key: Arc<ServiceAccountKey>, scope: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(EXCHANGE_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            key,
            scope: scope.into(),
            http,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a valid access token, minting a fresh one if the cached token
    /// is absent or within the expiry margin.
    pub async fn access_token(&self) -> Result<String, GcpError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.expires_at.saturating_duration_since(std::time::Instant::now())
                > EXPIRY_MARGIN
            {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.mint().await?;
        let token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(token)
    }

    /// Sign an assertion and exchange it for an access token.
    async fn mint(&self) -> Result<CachedToken, GcpError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let assertion = encode(
            &Header::new(jsonwebtoken::Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?,
        )?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GcpError::ExchangeStatus {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(scope = %self.scope, expires_in = token.expires_in, "Minted access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: std::time::Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}
