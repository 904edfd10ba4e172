use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::debug;

use super::endpoint::Endpoint;
use super::types::CatalogPayload;
use crate::config::CatalogConfig;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Catalog returned HTTP {0}")]
    Status(u16),
    #[error("Malformed catalog response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to set up catalog client: {0}")]
    Client(String),
}

#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<CatalogPayload, CatalogError>;
}

#[derive(Debug)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig, token: &str) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| CatalogError::Client(format!("invalid token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MovieCatalog for CatalogClient {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<CatalogPayload, CatalogError> {
        let url = endpoint.url(&self.base_url);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let payload: CatalogPayload = serde_json::from_slice(&body)?;

        debug!(
            "Catalog answered {} with {} results",
            status,
            payload.results.as_ref().map_or(0, |r| r.len())
        );

        Ok(payload)
    }
}
