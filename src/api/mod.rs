//! HTTP client for the SciPaper discovery service.
//!
//! All requests against the service go through [`ApiClient::call`], which is
//! the only place responses and failures are turned into [`ApiError`]s. The
//! typed wrappers [`ApiClient::get`] and [`ApiClient::post`] decode the JSON
//! value into response models on top of the same mapping.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Result alias for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors produced by the API client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, body read)
    #[error("Network error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    ///
    /// Carries the `detail` string from the error body when the service
    /// provided one, otherwise a fixed generic message.
    #[error("{0}")]
    Api(String),

    /// The service answered 2xx with a body that does not decode
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The configured base URL is not a valid URL
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Thin async client over the discovery service's JSON API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Arc<Client>,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client: Arc::new(client),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// The base URL this client targets, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one request and map the outcome
    ///
    /// `path` must start with `/`; `query` values are percent-encoded when
    /// the URL is composed. Exactly three failure shapes come out of here:
    /// `Transport` when no response arrived, `Api` for a non-2xx status
    /// (with the body's `detail` string when present), and
    /// `MalformedResponse` for a 2xx body that is not valid JSON.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Value> {
        let url = self.endpoint_url(path, query);
        tracing::debug!(%method, %url, "calling discovery service");

        let response = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, %url, "service returned an error status");
            return Err(ApiError::Api(error_detail(response).await));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    /// GET `path` and decode the response into `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let value = self.call(Method::GET, path, query).await?;
        serde_json::from_value(value).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    /// POST to `path` and decode the response into `T`
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let value = self.call(Method::POST, path, query).await?;
        serde_json::from_value(value).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let pairs: Vec<String> = query
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }
}

/// Extract the `detail` string from an error body, or the generic message
///
/// Mirrors the service's error convention: FastAPI wraps failures as
/// `{"detail": "..."}`. Anything else (empty body, HTML error page,
/// non-string detail) degrades to the fixed fallback.
async fn error_detail(response: reqwest::Response) -> String {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .unwrap_or_else(|| "An API error occurred".to_string())
}

// ===== SciPaper API Types =====

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_url_without_query() {
        let api = client("http://127.0.0.1:8000");
        assert_eq!(
            api.endpoint_url("/api/v1/search/", &[]),
            "http://127.0.0.1:8000/api/v1/search/"
        );
    }

    #[test]
    fn test_endpoint_url_percent_encodes_values() {
        let api = client("http://127.0.0.1:8000");
        let url = api.endpoint_url(
            "/api/v1/search/",
            &[("query", "gene editing & CRISPR".to_string())],
        );
        assert_eq!(
            url,
            "http://127.0.0.1:8000/api/v1/search/?query=gene%20editing%20%26%20CRISPR"
        );
    }

    #[test]
    fn test_endpoint_url_joins_multiple_pairs() {
        let api = client("http://127.0.0.1:8000");
        let url = api.endpoint_url(
            "/api/v1/ingest/",
            &[
                ("query", "crispr".to_string()),
                ("source", "arxiv".to_string()),
                ("max_results", "10".to_string()),
            ],
        );
        assert_eq!(
            url,
            "http://127.0.0.1:8000/api/v1/ingest/?query=crispr&source=arxiv&max_results=10"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let api = client("http://127.0.0.1:8000/");
        assert_eq!(api.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            api.endpoint_url("/api/v1/search/", &[]),
            "http://127.0.0.1:8000/api/v1/search/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = ApiClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_api_error_displays_bare_message() {
        let err = ApiError::Api("Paper not found".to_string());
        assert_eq!(err.to_string(), "Paper not found");

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");

        let err = ApiError::MalformedResponse("expected value at line 1".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed response: expected value at line 1"
        );
    }
}
