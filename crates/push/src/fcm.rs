//! FCM HTTP v1 implementation of [`PushDelivery`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sprig_gcp::TokenProvider;

use crate::error::{CODE_INVALID_TOKEN, CODE_TOKEN_NOT_REGISTERED, CODE_UNKNOWN};
use crate::{PushDelivery, PushError, PushMessage};

/// OAuth scope required for FCM sends.
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Production REST endpoint; overridable for tests.
const DEFAULT_BASE_URL: &str = "https://fcm.googleapis.com/v1";

/// HTTP timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// FCM v1 error code meaning the registration no longer exists.
const FCM_UNREGISTERED: &str = "UNREGISTERED";

/// FCM v1 error code covering malformed tokens (among other argument
/// problems; for a single-token send the token is the argument).
const FCM_INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";

// ---------------------------------------------------------------------------
// FcmDelivery
// ---------------------------------------------------------------------------

/// Sends push messages through Firebase Cloud Messaging.
pub struct FcmDelivery {
    http: reqwest::Client,
    auth: TokenProvider,
    base_url: String,
    project_id: String,
}

impl FcmDelivery {
    /// Create a delivery client for the given project.
    pub fn new(project_id: impl Into<String>, auth: TokenProvider) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            http,
            auth,
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: project_id.into(),
        }
    }

    /// Override the endpoint base URL (test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PushDelivery for FcmDelivery {
    async fn send(&self, message: &PushMessage) -> Result<(), PushError> {
        let url = format!(
            "{}/projects/{}/messages:send",
            self.base_url, self.project_id
        );
        let token = self.auth.access_token().await?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&message.to_fcm_v1())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let (code, provider_message) = classify_fcm_error(&body);
        Err(PushError::Rejected {
            code,
            message: provider_message,
        })
    }
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Map an FCM v1 error body to a canonical code and message.
///
/// The v1 surface reports the interesting code in
/// `error.details[].errorCode` (type `FcmError`); `error.status` is the
/// generic RPC status. Anything unrecognizable keeps whatever code string
/// is present, falling back to the `unknown` sentinel.
fn classify_fcm_error(body: &str) -> (String, String) {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(body)
        .to_string();

    let fcm_code = error
        .and_then(|e| e.get("details"))
        .and_then(Value::as_array)
        .and_then(|details| {
            details
                .iter()
                .find_map(|d| d.get("errorCode").and_then(Value::as_str))
        })
        .or_else(|| {
            error
                .and_then(|e| e.get("status"))
                .and_then(Value::as_str)
        });

    let code = match fcm_code {
        Some(FCM_UNREGISTERED) => CODE_TOKEN_NOT_REGISTERED.to_string(),
        Some(FCM_INVALID_ARGUMENT) => CODE_INVALID_TOKEN.to_string(),
        Some(other) => other.to_string(),
        None => CODE_UNKNOWN.to_string(),
    };

    (code, message)
}
