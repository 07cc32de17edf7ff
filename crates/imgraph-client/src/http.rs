//! HTTP implementation of [`GraphBackend`]

use crate::backend::GraphBackend;
use crate::config::ClientConfig;
use crate::error::BackendError;
use crate::wire::{
    endpoints, ChatRequest, ChatResponse, FullGraphResponse, HealthResponse, UploadRequest,
};
use async_trait::async_trait;
use imgraph_model::{EditPayload, Graph};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Backend reached over HTTP with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create client from configuration
    ///
    /// # Errors
    /// Returns [`BackendError::InvalidConfig`] if the configuration does not
    /// validate or the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint path
    #[inline]
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, BackendError> {
        tracing::debug!("GET {}", endpoint);
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| BackendError::transport(endpoint, e.to_string()))?;
        read_response(endpoint, response).await
    }

    async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", endpoint);
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::transport(endpoint, e.to_string()))?;
        read_response(endpoint, response).await
    }
}

async fn read_response<T: DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| BackendError::transport(endpoint, e.to_string()))?;

    if !status.is_success() {
        tracing::warn!("{} answered {}", endpoint, status);
        return Err(BackendError::Status {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    decode_body(endpoint, &body)
}

/// Decode a success body, failing fast on missing fields
pub(crate) fn decode_body<T: DeserializeOwned>(
    endpoint: &'static str,
    body: &str,
) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|source| {
        tracing::error!("Malformed {} response: {}", endpoint, source);
        BackendError::Decode { endpoint, source }
    })
}

#[async_trait]
impl GraphBackend for HttpBackend {
    async fn upload(&self, request: &UploadRequest) -> Result<Graph, BackendError> {
        tracing::info!("Uploading {} image(s)", request.image_name_array.len());
        let response: FullGraphResponse = self.post(endpoints::UPLOAD, request).await?;
        Ok(response.full_graph)
    }

    async fn full_graph(&self) -> Result<Graph, BackendError> {
        let response: FullGraphResponse = self.get(endpoints::FULL_GRAPH).await?;
        Ok(response.full_graph)
    }

    async fn edit_graph(&self, payload: &EditPayload) -> Result<Graph, BackendError> {
        let response: FullGraphResponse = self.post(endpoints::EDIT_GRAPH, payload).await?;
        Ok(response.full_graph)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.post(endpoints::QUERY, request).await
    }

    async fn health(&self) -> Result<HealthResponse, BackendError> {
        self.get(endpoints::HEALTH).await
    }
}
