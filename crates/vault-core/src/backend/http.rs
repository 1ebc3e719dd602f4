//! HTTP backend client for the hosted vault collaborator.
//!
//! Auth operations mint owner sessions; document operations run against the
//! owner-scoped collection path. The live feed is a polling loop over the
//! list endpoint, pushed through the same feed shape the in-memory backend
//! produces.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::watch;

use super::{CollectionPath, DocumentFeed, SubscriptionGuard, VaultBackend};
use crate::config::VaultConfig;
use crate::error::{Error, Result};
use crate::models::{Item, ItemId, NewItem, OwnerId, OwnerSession};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// `reqwest`-based client for the hosted backend
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    api_key: String,
    client: Client,
    poll_interval: Duration,
    /// Bearer token of the active session; set on sign-in/resume
    access_token: Arc<RwLock<Option<String>>>,
}

impl HttpBackend {
    pub fn new(config: &VaultConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.backend_url.clone(),
            api_key: config.api_key.clone(),
            client: Client::builder().build()?,
            poll_interval: DEFAULT_POLL_INTERVAL,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Override how often the live feed re-reads the collection
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Read the full collection once
    pub async fn list_documents(&self, path: &CollectionPath) -> Result<Vec<Item>> {
        let request = self.authorized_request(self.client.get(self.collection_url(path)));
        let response = send_checked(request).await?;
        let payload = response.json::<ListPayload>().await?;
        Ok(payload.documents)
    }

    fn collection_url(&self, path: &CollectionPath) -> String {
        let encoded: Vec<String> = path
            .segments()
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/v1/{}", self.base_url, encoded.join("/"))
    }

    fn document_url(&self, path: &CollectionPath, id: &ItemId) -> String {
        format!(
            "{}/{}",
            self.collection_url(path),
            urlencoding::encode(id.as_str())
        )
    }

    fn authorized_request(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("apikey", &self.api_key);
        let token = self
            .access_token
            .read()
            .expect("access token lock poisoned")
            .clone();
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn adopt_token(&self, token: &str) {
        *self
            .access_token
            .write()
            .expect("access token lock poisoned") = Some(token.to_string());
    }

    async fn send_sign_in(&self, request: RequestBuilder) -> Result<OwnerSession> {
        let response = send_checked(request.header("apikey", &self.api_key)).await?;
        let payload = response.json::<SessionPayload>().await?;
        let session = OwnerSession {
            owner_id: OwnerId::from(payload.owner_id),
            access_token: payload.access_token,
            expires_at: payload.expires_at,
        };
        self.adopt_token(&session.access_token);
        Ok(session)
    }
}

impl VaultBackend for HttpBackend {
    async fn sign_in_anonymous(&self) -> Result<OwnerSession> {
        let request = self
            .client
            .post(format!("{}/v1/auth/anonymous", self.base_url));
        self.send_sign_in(request).await
    }

    async fn sign_in_with_token(&self, token: &str) -> Result<OwnerSession> {
        if token.trim().is_empty() {
            return Err(Error::Auth("Bootstrap token must not be empty".to_string()));
        }
        let payload = serde_json::json!({ "token": token });
        let request = self
            .client
            .post(format!("{}/v1/auth/token", self.base_url))
            .json(&payload);
        self.send_sign_in(request).await
    }

    async fn resume_session(&self, session: &OwnerSession) -> Result<OwnerId> {
        self.adopt_token(&session.access_token);
        Ok(session.owner_id.clone())
    }

    async fn create_document(&self, path: &CollectionPath, document: &NewItem) -> Result<ItemId> {
        let request = self
            .authorized_request(self.client.post(self.collection_url(path)))
            .json(document);
        let response = send_checked(request).await?;
        let payload = response.json::<CreatedPayload>().await?;
        Ok(ItemId::from(payload.id))
    }

    async fn delete_document(&self, path: &CollectionPath, id: &ItemId) -> Result<()> {
        let request = self.authorized_request(self.client.delete(self.document_url(path, id)));
        send_checked(request).await?;
        Ok(())
    }

    async fn subscribe(&self, path: &CollectionPath) -> Result<DocumentFeed> {
        let initial = self.list_documents(path).await?;
        let (sender, receiver) = watch::channel(initial);

        let backend = self.clone();
        let path = path.clone();
        let task = tokio::spawn(async move {
            let mut last = sender.borrow().clone();
            loop {
                tokio::time::sleep(backend.poll_interval).await;
                match backend.list_documents(&path).await {
                    Ok(documents) => {
                        if documents != last {
                            last = documents.clone();
                            if sender.send(documents).is_err() {
                                // All receivers dropped; subscription torn down
                                break;
                            }
                        }
                    }
                    Err(error) => {
                        tracing::error!(%path, "Collection feed stopped: {error}");
                        break;
                    }
                }
            }
        });

        Ok(DocumentFeed::new(
            receiver,
            SubscriptionGuard::from_task(task),
        ))
    }
}

async fn send_checked(request: RequestBuilder) -> Result<reqwest::Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_api_error(status, &body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(Error::Auth(message))
    } else if status == StatusCode::NOT_FOUND {
        Err(Error::NotFound(message))
    } else {
        Err(Error::Backend(message))
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        #[serde(alias = "message", alias = "error")]
        detail: Option<String>,
    }

    let detail = serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|error| error.detail)
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail}")
    }
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    owner_id: String,
    access_token: String,
    expires_at: i64,
}

#[derive(Debug, Deserialize)]
struct CreatedPayload {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ListPayload {
    documents: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn backend() -> HttpBackend {
        let config = VaultConfig::new("demo-app", "https://vault.example.com", "public-key")
            .expect("valid test config");
        HttpBackend::new(&config).expect("client builds")
    }

    #[test]
    fn collection_url_encodes_path_segments() {
        let path = CollectionPath::for_owner("demo app", &OwnerId::from("user/../etc"));
        assert_eq!(
            backend().collection_url(&path),
            "https://vault.example.com/v1/artifacts/demo%20app/users/user%2F..%2Fetc/files"
        );
    }

    #[test]
    fn document_url_appends_encoded_id() {
        let path = CollectionPath::for_owner("app", &OwnerId::from("alice"));
        assert_eq!(
            backend().document_url(&path, &ItemId::from("doc 1")),
            "https://vault.example.com/v1/artifacts/app/users/alice/files/doc%201"
        );
    }

    #[test]
    fn parse_api_error_prefers_json_detail() {
        let message = parse_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"message": "invalid document"}"#,
        );
        assert_eq!(message, "HTTP 400 Bad Request: invalid document");
    }

    #[test]
    fn parse_api_error_falls_back_to_raw_body() {
        let message = parse_api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(message, "HTTP 502 Bad Gateway: upstream down");

        let empty = parse_api_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(empty, "HTTP 502 Bad Gateway");
    }

    #[test]
    fn list_payload_deserializes_documents() {
        let payload: ListPayload = serde_json::from_str(
            r#"{
                "documents": [{
                    "id": "d1",
                    "kind": "text",
                    "filename": "Notes",
                    "content": "hello",
                    "mime_type": "text/plain",
                    "owner_id": "alice",
                    "created_at": 1700000000000
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(payload.documents.len(), 1);
        assert_eq!(payload.documents[0].filename, "Notes");
    }
}
