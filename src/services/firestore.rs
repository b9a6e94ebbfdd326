use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;

use super::store::{DocumentStore, StoreError};
use crate::models::{Listing, Profile, ProfileUpdate};

pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com/v1";

/// Collection names in Firestore
#[derive(Debug, Clone)]
pub struct FirestoreCollections {
    pub users: String,
    pub listings: String,
}

impl Default for FirestoreCollections {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            listings: "listings".to_string(),
        }
    }
}

/// Firestore REST (v1) client
///
/// Handles all communication with the document database:
/// - Fetching single profiles
/// - Listing the candidate pool and housing listings page by page
/// - Merging profile edits with a field mask
pub struct FirestoreClient {
    base_url: String,
    project_id: String,
    database_id: String,
    access_token: Option<String>,
    api_key: Option<String>,
    page_size: u32,
    client: Client,
    collections: FirestoreCollections,
}

impl FirestoreClient {
    /// Create a new Firestore client
    pub fn new(
        base_url: String,
        project_id: String,
        database_id: String,
        collections: FirestoreCollections,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            project_id,
            database_id,
            access_token: None,
            api_key: None,
            page_size: 300,
            client,
            collections,
        })
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database_id,
            collection
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), urlencoding::encode(id))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        };
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn non-success statuses into [`StoreError`]s
    async fn check(response: Response, action: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Failed to {}: {} - {}", action, status, body);

        Err(StoreError::Api {
            status: status.as_u16(),
            message: format!("Failed to {}", action),
        })
    }

    /// Fetch every document in a collection, following `nextPageToken`
    async fn list_documents(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", self.page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = self.authorize(request).send().await?;
            let response = Self::check(response, &format!("list {}", collection)).await?;
            let mut page: Value = response.json().await?;

            if let Some(Value::Array(batch)) = page.get_mut("documents").map(Value::take) {
                documents.extend(batch);
            }

            page_token = page
                .get("nextPageToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);

            if page_token.is_none() {
                break;
            }
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), collection);
        Ok(documents)
    }
}

/// Decode a list of documents, skipping the ones that don't fit `T`
fn decode_all<T>(documents: Vec<Value>, collection: &str) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    documents
        .iter()
        .filter_map(|doc| match decode_document(doc) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Skipping document in {}: {}", collection, e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let url = self.document_url(&self.collections.users, user_id);
        tracing::debug!("Fetching profile for user: {}", user_id);

        let response = self.authorize(self.client.get(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check(response, "fetch profile").await?;
        let doc: Value = response.json().await?;
        decode_document(&doc).map(Some)
    }

    async fn list_profiles(&self, excluding: Option<&str>) -> Result<Vec<Profile>, StoreError> {
        let documents = self.list_documents(&self.collections.users).await?;
        let profiles: Vec<Profile> = decode_all(documents, &self.collections.users);

        Ok(profiles
            .into_iter()
            .filter(|profile| Some(profile.id.as_str()) != excluding)
            .collect())
    }

    async fn save_profile(&self, update: &ProfileUpdate) -> Result<(), StoreError> {
        let url = self.document_url(&self.collections.users, &update.id);

        // Only the fields the update sets are serialized, so they form the mask
        let fields = match serde_json::to_value(update) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(StoreError::InvalidResponse("Profile update is not an object".into())),
            Err(e) => return Err(StoreError::InvalidResponse(e.to_string())),
        };
        // A PATCH without a mask would replace the whole document
        if fields.is_empty() {
            return Ok(());
        }

        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.as_str()))
            .collect();
        let body = serde_json::json!({ "fields": encode_fields(&fields) });

        let request = self.client.patch(&url).query(&mask).json(&body);
        let response = self.authorize(request).send().await?;
        Self::check(response, "save profile").await?;

        tracing::debug!("Saved profile {} ({} fields)", update.id, mask.len());
        Ok(())
    }

    async fn list_listings(&self) -> Result<Vec<Listing>, StoreError> {
        let documents = self.list_documents(&self.collections.listings).await?;
        Ok(decode_all(documents, &self.collections.listings))
    }
}

/// Decode a Firestore document into `T`, filling `id` from the document name
pub fn decode_document<T>(doc: &Value) -> Result<T, StoreError>
where
    T: serde::de::DeserializeOwned,
{
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::InvalidResponse("Missing document name".into()))?;
    let id = name.rsplit('/').next().unwrap_or(name);

    let mut object = match doc.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields)?,
        Some(_) => return Err(StoreError::InvalidResponse("Fields must be a map".into())),
        None => Map::new(),
    };
    object
        .entry("id")
        .or_insert_with(|| Value::String(id.to_string()));

    serde_json::from_value(Value::Object(object))
        .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse document {}: {}", id, e)))
}

fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
    fields
        .iter()
        .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
        .collect()
}

/// Convert a Firestore typed value (`{"stringValue": "..."}`) into plain JSON
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let invalid = || StoreError::InvalidResponse(format!("Unsupported Firestore value: {}", value));

    let (kind, inner) = value
        .as_object()
        .and_then(|obj| obj.iter().next())
        .ok_or_else(invalid)?;

    let decoded = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().ok_or_else(invalid)?),
        // 64-bit integers travel as strings
        "integerValue" => {
            let n = match inner {
                Value::String(s) => s.parse::<i64>().map_err(|_| invalid())?,
                Value::Number(n) => n.as_i64().ok_or_else(invalid)?,
                _ => return Err(invalid()),
            };
            Value::from(n)
        }
        "doubleValue" => match inner {
            Value::Number(_) => inner.clone(),
            Value::String(s) => Value::from(s.parse::<f64>().map_err(|_| invalid())?),
            _ => return Err(invalid()),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => {
            Value::String(inner.as_str().ok_or_else(invalid)?.to_string())
        }
        "geoPointValue" => inner.clone(),
        "arrayValue" => {
            let values: Vec<Value> = match inner.get("values") {
                Some(Value::Array(values)) => values.iter().map(decode_value).collect::<Result<_, _>>()?,
                _ => Vec::new(),
            };
            Value::Array(values)
        }
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Value::Object(decode_fields(fields)?),
            _ => Value::Object(Map::new()),
        },
        _ => return Err(invalid()),
    };

    Ok(decoded)
}

fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Convert plain JSON into a Firestore typed value
pub fn encode_value(value: &Value) -> Value {
    use serde_json::json;

    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => {
            let values: Vec<Value> = values.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}
