//! Tally HTTP clients
//!
//! [`PublicClient`] talks to unauthenticated endpoints (login, refresh,
//! password recovery). [`SessionClient`] covers everything behind
//! authentication: it reads the credential store on every request,
//! refreshes a near-expiry token before sending, and retries exactly once
//! after a 401.

pub mod auth;
pub mod balance;
pub mod categories;
pub mod products;
pub mod purchases;
pub mod transactions;
pub mod users;

use crate::error::ClientError;
use crate::refresh::TokenRefresher;
use reqwest::{Client, ClientBuilder as ReqwestBuilder, StatusCode, header};
use std::sync::Arc;
use std::time::Duration;
use tally_core::SessionStore;

const DEFAULT_USER_AGENT: &str = concat!("tally-client/", env!("CARGO_PKG_VERSION"));

/// Client for public endpoints that don't require authentication
#[derive(Clone)]
pub struct PublicClient {
    client: Client,
    base_url: String,
}

impl PublicClient {
    /// Create a new public client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        ClientBuilder::new().base_url(base_url).build_public()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        read_json(response).await
    }
}

/// Session-aware client for authenticated endpoints.
///
/// Cheap to clone; all clones share the same credential store and refresh
/// guard.
#[derive(Clone)]
pub struct SessionClient {
    client: Client,
    base_url: String,
    store: Arc<SessionStore>,
    refresher: Arc<TokenRefresher>,
}

impl SessionClient {
    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared credential store backing this client
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Create a request builder. The bearer token is attached at send
    /// time, not here, so a retried request picks up a refreshed token.
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// A public client sharing this client's connection pool, for the
    /// unauthenticated endpoints.
    pub fn to_public(&self) -> PublicClient {
        PublicClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        }
    }

    /// Execute a request and deserialize the JSON response.
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        read_json(response).await
    }

    /// Execute a request expecting a JSON array; a 204 No Content response
    /// yields an empty list.
    pub async fn execute_list<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, ClientError> {
        let response = self.send(request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        read_json(response).await
    }

    /// Execute a request whose response body is irrelevant.
    pub async fn execute_unit(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(), ClientError> {
        let response = self.send(request).await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }

    /// Send with the session lifecycle applied: refresh up front when the
    /// token is near expiry, attach the current bearer token, and on a 401
    /// refresh once and retry the original request exactly once. A second
    /// 401 surfaces to the caller.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        self.refresher.ensure_fresh().await?;

        // Bodies that cannot be cloned (streams) are sent without a retry.
        let retry = request.try_clone();
        let response = self.send_authorized(request).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(retry_request) = retry {
                tracing::debug!("request rejected with 401, refreshing and retrying once");
                self.refresher.refresh().await?;
                return self.send_authorized(retry_request).await;
            }
        }

        Ok(response)
    }

    async fn send_authorized(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let request = match self.store.get() {
            Some(session) if session.is_usable() => {
                request.header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", session.access_token),
                )
            }
            _ => request,
        };
        Ok(request.send().await?)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let message = response.text().await.unwrap_or_else(|_| status.to_string());
        Err(ClientError::from_status(status, message))
    }
}

/// Builder for both client flavours
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    refresh_skew_secs: Option<i64>,
}

impl ClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Seconds before expiry at which a token counts as stale
    pub fn refresh_skew_secs(mut self, skew: i64) -> Self {
        self.refresh_skew_secs = Some(skew);
        self
    }

    /// Build a public client
    pub fn build_public(self) -> Result<PublicClient, ClientError> {
        let (client, base_url) = self.build_inner()?;
        Ok(PublicClient { client, base_url })
    }

    /// Build a session client backed by the given credential store
    pub fn build_session(self, store: Arc<SessionStore>) -> Result<SessionClient, ClientError> {
        let skew = self.refresh_skew_secs.unwrap_or(60);
        let (client, base_url) = self.build_inner()?;

        let public = PublicClient {
            client: client.clone(),
            base_url: base_url.clone(),
        };
        let refresher = Arc::new(TokenRefresher::new(public, store.clone(), skew));

        Ok(SessionClient {
            client,
            base_url,
            store,
            refresher,
        })
    }

    fn build_inner(self) -> Result<(Client, String), ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut builder = ReqwestBuilder::new()
            .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.into()));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok((builder.build()?, base_url))
    }
}
