use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;

use crate::core::moderation::{
    ModerationAction, ModerationClient, ModerationConfig, ModerationError, ModerationRequest,
};

/// HTTP client for the events admin API. Only the moderate-content call is exposed.
pub struct ModerationApiClient {
    client: Client,
    endpoint: String,
}

impl ModerationApiClient {
    pub fn new(endpoint: impl Into<String>, admin_password: &str) -> Result<Self, ModerationError> {
        Self::with_builder(endpoint, admin_password, Client::builder())
    }

    fn with_builder(
        endpoint: impl Into<String>,
        admin_password: &str,
        builder: ClientBuilder,
    ) -> Result<Self, ModerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-admin-password",
            HeaderValue::from_str(admin_password)
                .map_err(|e| ModerationError::InvalidRequest(e.to_string()))?,
        );

        let client = builder
            .default_headers(headers)
            .build()
            .map_err(|e| ModerationError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &ModerationConfig) -> Result<Self, ModerationError> {
        Self::new(config.endpoint(), &config.admin_password)
    }

    /// A body counts as success only if it carries a boolean `success: true`.
    fn reports_success(body: &Value) -> bool {
        body.get("success").and_then(Value::as_bool).unwrap_or(false)
    }
}

#[async_trait]
impl ModerationClient for ModerationApiClient {
    async fn moderate(
        &self,
        event_id: &str,
        action: ModerationAction,
    ) -> Result<bool, ModerationError> {
        let payload = ModerationRequest { action, event_id };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ModerationError::Transport(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ModerationError::InvalidResponse(e.to_string()))?;

        Ok(Self::reports_success(&body))
    }
}
