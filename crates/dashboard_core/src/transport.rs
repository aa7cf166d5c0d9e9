//! Transport seam between a collection view and the remote API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{domain::ResourceKind, error::ApiError, protocol::CollectionPage};
use tracing::debug;

use crate::{codec::Descriptor, error::FetchError};

#[async_trait]
pub trait CollectionTransport<R>: Send + Sync {
    async fn fetch_collection(
        &self,
        resource: ResourceKind,
        descriptor: &Descriptor,
    ) -> std::result::Result<CollectionPage<R>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransportOptions {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub request_timeout: Duration,
}

impl HttpTransportOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Lists collections via `GET {base_url}/api/{resource}?{descriptor}`.
#[derive(Debug, Clone)]
pub struct HttpCollectionTransport {
    http: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpCollectionTransport {
    pub fn new(options: HttpTransportOptions) -> Result<Self> {
        let http = Client::builder()
            .timeout(options.request_timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            bearer_token: options.bearer_token.filter(|token| !token.is_empty()),
        })
    }

    pub fn collection_url(&self, resource: ResourceKind) -> String {
        format!("{}/api/{}", self.base_url, resource.path())
    }
}

#[async_trait]
impl<R> CollectionTransport<R> for HttpCollectionTransport
where
    R: DeserializeOwned + Send + 'static,
{
    async fn fetch_collection(
        &self,
        resource: ResourceKind,
        descriptor: &Descriptor,
    ) -> std::result::Result<CollectionPage<R>, FetchError> {
        let url = self.collection_url(resource);
        debug!(%resource, query = %descriptor.to_query_string(), "fetching collection");

        let mut request = self.http.get(&url).query(descriptor.pairs());
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let res = request
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;
        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(http_error(status, &body));
        }

        serde_json::from_slice::<CollectionPage<R>>(&body)
            .map_err(|err| FetchError::Decode(err.to_string()))
    }
}

fn http_error(status: StatusCode, body: &[u8]) -> FetchError {
    let message = match serde_json::from_slice::<ApiError>(body) {
        Ok(api_error) => format!("{:?}: {}", api_error.code, api_error.message),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    FetchError::Http {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
