//! HTTP client for communicating with outletd.

use async_trait::async_trait;
use outlet_common::{ErrorBody, Outlet, QueryRequest, QueryResponse};
use reqwest::Response;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API connection error: {0}")]
    Connection(String),

    #[error("{detail} (HTTP {status})")]
    Api { status: u16, detail: String },

    #[error("Invalid response from outletd: {0}")]
    InvalidResponse(String),
}

/// The two calls the presentation side makes against the catalog service
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_outlets(&self) -> Result<Vec<Outlet>, ClientError>;

    async fn ask(&self, question: &str) -> Result<String, ClientError>;
}

/// Client for outletd's HTTP API
pub struct CatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Turn a non-2xx response into `ClientError::Api`, preferring the JSON detail
async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.detail)
        .unwrap_or(text);
    ClientError::Api { status, detail }
}

fn connection(e: reqwest::Error) -> ClientError {
    ClientError::Connection(e.to_string())
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn fetch_outlets(&self) -> Result<Vec<Outlet>, ClientError> {
        let response = self
            .http
            .get(format!("{}/outlets", self.base_url))
            .send()
            .await
            .map_err(connection)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn ask(&self, question: &str) -> Result<String, ClientError> {
        let request = QueryRequest {
            question: question.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/query", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(connection)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = CatalogClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 404,
            detail: "No outlets found".to_string(),
        };
        assert_eq!(err.to_string(), "No outlets found (HTTP 404)");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = CatalogClient::new("http://127.0.0.1:9");
        let err = client.ask("hello").await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }
}
