use reqwest::{Client, Response};

use crate::error::ClientError;
use crate::models::message::{ErrorBody, MessageDraft, MessageEnvelope, MessageId, PastorMessage};
use crate::services::auth::Session;

/// HTTP client for the backend's `/pastor-messages` resource.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct PastorMessageApi {
    client: Client,
    base_url: String,
}

impl PastorMessageApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/pastor-messages{}", self.base_url, path)
    }

    /// GET /pastor-messages: the full collection, no auth.
    pub async fn list(&self) -> Result<Vec<PastorMessage>, ClientError> {
        tracing::debug!("Fetching pastor messages from {}", self.base_url);
        let response = self.client.get(self.url("")).send().await?;
        let messages = check(response).await?.json().await?;
        Ok(messages)
    }

    /// GET /pastor-messages/active. Any non-2xx answer means "no active message".
    pub async fn active(&self) -> Result<Option<PastorMessage>, ClientError> {
        let response = self.client.get(self.url("/active")).send().await?;
        if !response.status().is_success() {
            tracing::debug!("No active pastor message ({})", response.status());
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    /// POST /pastor-messages
    pub async fn create(
        &self,
        session: &Session,
        draft: &MessageDraft,
    ) -> Result<Option<PastorMessage>, ClientError> {
        let token = session.bearer()?;
        let response = self
            .client
            .post(self.url(""))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?;
        saved(check(response).await?).await
    }

    /// PUT /pastor-messages/:id
    pub async fn update(
        &self,
        session: &Session,
        id: MessageId,
        draft: &MessageDraft,
    ) -> Result<Option<PastorMessage>, ClientError> {
        let token = session.bearer()?;
        let response = self
            .client
            .put(self.url(&format!("/{id}")))
            .bearer_auth(token)
            .json(draft)
            .send()
            .await?;
        saved(check(response).await?).await
    }

    /// DELETE /pastor-messages/:id
    pub async fn delete(&self, session: &Session, id: MessageId) -> Result<(), ClientError> {
        let token = session.bearer()?;
        let response = self
            .client
            .delete(self.url(&format!("/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// PATCH /pastor-messages/:id/activate. Deactivating the others is the backend's job.
    pub async fn activate(&self, session: &Session, id: MessageId) -> Result<(), ClientError> {
        let token = session.bearer()?;
        let response = self
            .client
            .patch(self.url(&format!("/{id}/activate")))
            .bearer_auth(token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Any 2xx counts as saved. The record comes back only when the body carries one.
async fn saved(response: Response) -> Result<Option<PastorMessage>, ClientError> {
    let body = response.bytes().await?;
    let saved = serde_json::from_slice::<MessageEnvelope>(&body)
        .ok()
        .map(MessageEnvelope::into_message);
    if saved.is_none() {
        tracing::debug!("Save acknowledged without a message record");
    }
    Ok(saved)
}

/// Pass 2xx responses through; turn anything else into `ClientError::Server`.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);
    tracing::warn!("Backend error {}: {}", status, body);
    Err(ClientError::Server { status, message })
}
