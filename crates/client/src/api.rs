//! REST client for the invoicing back office API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use dian_auth::BearerToken;

use crate::envelope::{ApiResponse, ErrorBody};
use crate::error::ApiError;
use crate::interceptor::{AuthInterceptor, AuthRejection};
use crate::storage::CredentialStore;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout. Ignored on wasm32, where the browser owns it.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client; every request goes through the shared [`AuthInterceptor`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    interceptor: Arc<AuthInterceptor>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, credentials: CredentialStore) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();

        #[cfg(not(target_arch = "wasm32"))]
        let builder = match config.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };

        let http = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interceptor: Arc::new(AuthInterceptor::new(credentials)),
        })
    }

    pub fn interceptor(&self) -> &Arc<AuthInterceptor> {
        &self.interceptor
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request::<(), T>(Method::GET, path, None, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::POST, path, body, None).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::PUT, path, Some(body), None).await
    }

    /// Issue a request through the interceptor and decode the envelope.
    ///
    /// `token` overrides the stored credential for this request only.
    pub async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        token: Option<&BearerToken>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.interceptor.authorize(request, token);

        tracing::debug!(%method, path, "sending API request");
        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(response).await;
            self.interceptor.reject(AuthRejection {
                status: status.as_u16(),
                path: path.to_string(),
                message: message.clone(),
            });
            return Err(ApiError::Unauthorized { message });
        }

        if !status.is_success() {
            let message = error_message(response).await;
            tracing::debug!(status = status.as_u16(), path, "API request failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

async fn error_message(response: reqwest::Response) -> Option<String> {
    let text = response.text().await.ok()?;
    serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let client = ApiClient::new(
            ClientConfig::new("http://localhost:8000/api/"),
            CredentialStore::in_memory(),
        )
        .unwrap();

        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/auth/login"), "http://localhost:8000/api/auth/login");
        assert_eq!(client.url("users/currentUser"), "http://localhost:8000/api/users/currentUser");
    }

    #[test]
    fn default_config_points_at_local_api() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
