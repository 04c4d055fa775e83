//! Firestore REST implementation of [`DocumentStore`].
//!
//! All traffic goes through the v1 JSON surface: paged `documents` listing
//! for the plant scan, single-document reads for users, `:runQuery` for the
//! email lookup, and `documents:commit` field transforms for the token
//! array mutations and the admin-mirror merge upsert (the server stamps
//! `updatedAt` via a `REQUEST_TIME` transform).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use sprig_core::claims::CLAIM_ADMIN;
use sprig_gcp::TokenProvider;

use crate::models::{AdminMirror, PlantRecord, UserRecord};
use crate::value;
use crate::{DocumentStore, StoreError};

/// OAuth scope required for Firestore access.
pub const FIRESTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Production REST endpoint; overridable for tests and emulators.
const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Page size for the plant enumeration.
const LIST_PAGE_SIZE: usize = 300;

/// HTTP timeout for a single store request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const COLLECTION_PLANTS: &str = "plants";
const COLLECTION_USERS: &str = "users";
const COLLECTION_ADMINS: &str = "admins";

// ---------------------------------------------------------------------------
// FirestoreStore
// ---------------------------------------------------------------------------

/// Firestore-backed document store.
pub struct FirestoreStore {
    http: reqwest::Client,
    auth: TokenProvider,
    base_url: String,
    project_id: String,
}

impl FirestoreStore {
    /// Create a store client for the given project.
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

    /// Override the endpoint base URL (emulator / test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `projects/{p}/databases/(default)` under the base URL.
    fn database_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)",
            self.base_url, self.project_id
        )
    }

    /// Fully-qualified document resource name (no base URL).
    fn document_name(&self, collection: &str, id: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}/{}",
            self.project_id, collection, id
        )
    }

    /// Attach a bearer token and send.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, StoreError> {
        let token = self.auth.access_token().await?;
        Ok(builder.bearer_auth(token).send().await?)
    }

    /// Reject non-success statuses, otherwise parse the JSON body.
    async fn check(response: reqwest::Response) -> Result<Value, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status.as_u16(), &body));
        }
        Ok(response.json().await?)
    }

    /// One `documents:commit` call with a single write.
    async fn commit(&self, write: Value) -> Result<(), StoreError> {
        let url = format!("{}/documents:commit", self.database_url());
        let body = json!({ "writes": [write] });
        let response = self.send(self.http.post(url).json(&body)).await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Apply an array field transform (`appendMissingElements` /
    /// `removeAllFromArray`) to a user's `tokens` field.
    async fn token_array_transform(
        &self,
        user_id: &str,
        token: &str,
        op: &str,
    ) -> Result<(), StoreError> {
        let mut field_transform = json!({ "fieldPath": "tokens" });
        field_transform[op] = json!({ "values": [value::string_value(token)] });

        self.commit(json!({
            "transform": {
                "document": self.document_name(COLLECTION_USERS, user_id),
                "fieldTransforms": [field_transform],
            }
        }))
        .await
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list_plants(&self) -> Result<Vec<PlantRecord>, StoreError> {
        let mut plants = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/documents/{}?pageSize={}",
                self.database_url(),
                COLLECTION_PLANTS,
                LIST_PAGE_SIZE
            );
            if let Some(token) = &page_token {
                url.push_str("&pageToken=");
                url.push_str(token);
            }

            let response = self.send(self.http.get(url)).await?;
            let body = Self::check(response).await?;

            if let Some(documents) = body.get("documents").and_then(Value::as_array) {
                for doc in documents {
                    match decode_plant(doc) {
                        Ok(plant) => plants.push(plant),
                        Err(e) => tracing::warn!(error = %e, "Skipping undecodable plant document"),
                    }
                }
            }

            match body.get("nextPageToken").and_then(Value::as_str) {
                Some(token) if !token.is_empty() => page_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(plants)
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let url = format!(
            "{}/{}",
            self.base_url,
            self.document_name(COLLECTION_USERS, id)
        );
        let response = self.send(self.http.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = Self::check(response).await?;
        Ok(Some(decode_user(&body)?))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let url = format!("{}/documents:runQuery", self.database_url());
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": COLLECTION_USERS }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "email" },
                        "op": "EQUAL",
                        "value": value::string_value(email),
                    }
                },
                "limit": 1,
            }
        });

        let response = self.send(self.http.post(url).json(&query)).await?;
        let body = Self::check(response).await?;

        // runQuery returns a JSON array; rows without a `document` key are
        // bookkeeping entries (read time only).
        let document = body
            .as_array()
            .and_then(|rows| rows.iter().find_map(|row| row.get("document")));

        match document {
            Some(doc) => Ok(Some(decode_user(doc)?)),
            None => Ok(None),
        }
    }

    async fn add_token(&self, user_id: &str, token: &str) -> Result<(), StoreError> {
        self.token_array_transform(user_id, token, "appendMissingElements")
            .await
    }

    async fn remove_token(&self, user_id: &str, token: &str) -> Result<(), StoreError> {
        self.token_array_transform(user_id, token, "removeAllFromArray")
            .await
    }

    async fn set_admin_claim(&self, user_id: &str, admin: bool) -> Result<(), StoreError> {
        let url = format!(
            "{}/{}?updateMask.fieldPaths={}",
            self.base_url,
            self.document_name(COLLECTION_USERS, user_id),
            CLAIM_ADMIN
        );
        let mut fields = Map::new();
        fields.insert(CLAIM_ADMIN.to_string(), value::bool_value(admin));
        let body = json!({ "fields": Value::Object(fields) });

        let response = self.send(self.http.patch(url).json(&body)).await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upsert_admin_mirror(&self, mirror: &AdminMirror) -> Result<(), StoreError> {
        let mut fields = Map::new();
        fields.insert("uid".to_string(), value::string_value(&mirror.uid));
        if let Some(email) = &mirror.email {
            fields.insert("email".to_string(), value::string_value(email));
        }
        fields.insert(CLAIM_ADMIN.to_string(), value::bool_value(mirror.admin));
        fields.insert(
            "updatedBy".to_string(),
            value::string_value(&mirror.updated_by),
        );
        let field_paths: Vec<String> = fields.keys().cloned().collect();

        self.commit(json!({
            "update": {
                "name": self.document_name(COLLECTION_ADMINS, &mirror.uid),
                "fields": Value::Object(fields),
            },
            "updateMask": { "fieldPaths": field_paths },
            "updateTransforms": [{
                "fieldPath": "updatedAt",
                "setToServerValue": "REQUEST_TIME",
            }],
        }))
        .await
    }
}

// ---------------------------------------------------------------------------
// Document decoding
// ---------------------------------------------------------------------------

/// Extract the document id from the full resource name.
fn document_id(doc: &Value) -> Result<String, StoreError> {
    doc.get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .map(String::from)
        .ok_or_else(|| StoreError::Decode("document has no resource name".into()))
}

fn document_fields(doc: &Value) -> value::Fields {
    doc.get("fields")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn decode_plant(doc: &Value) -> Result<PlantRecord, StoreError> {
    let id = document_id(doc)?;
    let fields = document_fields(doc);
    Ok(PlantRecord {
        id,
        owner_id: value::string_field(&fields, "ownerId"),
        name: value::string_field(&fields, "name"),
        last_watered_at: value::instant_field(&fields, "lastWateredAt"),
    })
}

fn decode_user(doc: &Value) -> Result<UserRecord, StoreError> {
    let id = document_id(doc)?;
    let fields = document_fields(doc);
    Ok(UserRecord {
        id,
        email: value::string_field(&fields, "email"),
        tokens: value::string_array_field(&fields, "tokens"),
        legacy_token: value::string_field(&fields, "fcmToken"),
        admin: value::bool_field(&fields, CLAIM_ADMIN).unwrap_or(false),
    })
}

/// Build a [`StoreError::Status`] from a Google error envelope, falling
/// back to the raw body when the envelope shape is absent.
fn error_from_response(status: u16, body: &str) -> StoreError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string());
    StoreError::Status { status, message }
}
