//! HTTP access to the media-control service
//!
//! `POST /login` and `GET /media` are one-shot request/response calls. Both
//! are exposed as traits so the session gate and the dashboard can be
//! exercised without a server.

use async_trait::async_trait;
use mcc_common::config::ConsoleConfig;
use mcc_common::models::{LoginRequest, LoginResponse, MediaItem};
use mcc_common::{Error, Result};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;

const USER_AGENT: &str = concat!("mcc-ui/", env!("CARGO_PKG_VERSION"));

/// Credential exchange with the authentication endpoint
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest<'_>) -> Result<LoginResponse>;
}

/// Read-only access to the media listing endpoint
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    async fn list_media(&self) -> Result<Vec<MediaItem>>;
}

/// reqwest-backed client for both endpoints
#[derive(Clone)]
pub struct HttpApi {
    http_client: reqwest::Client,
    config: ConsoleConfig,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            config: config.clone(),
            token: None,
        })
    }

    /// Attach a session token as bearer credential to listing requests
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Http(format!("invalid response body: {}", e)))
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, request: &LoginRequest<'_>) -> Result<LoginResponse> {
        let url = self.config.api_endpoint("login");
        debug!(url = %url, username = %request.username, "Submitting login");
        self.send_json(self.http_client.post(&url).json(request)).await
    }
}

#[async_trait]
impl MediaLibrary for HttpApi {
    async fn list_media(&self) -> Result<Vec<MediaItem>> {
        let url = self.config.api_endpoint("media");
        debug!(url = %url, authorized = self.token.is_some(), "Fetching media list");
        self.send_json(self.authorize(self.http_client.get(&url))).await
    }
}
