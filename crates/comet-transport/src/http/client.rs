//! HTTP client trait and the reqwest-backed implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::request::HttpRequest;
use super::response::HttpResponse;
use crate::error::{Result, TransportError};

/// The HTTP execution engine the transport posts through.
///
/// The client is an externally-owned capability injected at transport
/// construction. The transport shares it by reference across all operations
/// and never owns or releases it.
///
/// Implementations should map caller-initiated request cancellation to
/// [`TransportError::Cancelled`] so the transport can treat it as a benign
/// terminal state rather than a failure.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a POST request and return the fully-read response.
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Configuration for the reqwest-backed HTTP client.
#[derive(Clone, Debug)]
pub struct ReqwestClientConfig {
    /// Request timeout.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Default user agent.
    pub user_agent: Option<String>,
}

impl Default for ReqwestClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some(format!("CometTransport/{} (Rust)", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// Builder for creating a [`ReqwestClient`] with custom configuration.
pub struct ReqwestClientBuilder {
    config: ReqwestClientConfig,
}

impl Default for ReqwestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClientBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReqwestClientConfig::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ReqwestClient> {
        let mut builder = reqwest::Client::builder().cookie_store(true);

        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(ref ua) = self.config.user_agent {
            builder = builder.user_agent(ua);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(ReqwestClient {
            inner: Arc::new(ReqwestClientInner {
                client,
                config: self.config,
            }),
        })
    }
}

/// Internal state for the reqwest-backed client.
struct ReqwestClientInner {
    client: reqwest::Client,
    config: ReqwestClientConfig,
}

/// A [`reqwest`]-backed implementation of [`HttpClient`].
///
/// The client is cheaply cloneable and thread-safe. Clones share the same
/// underlying connection pool and configuration.
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClient {
    /// Create a new client with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the default TLS backend cannot be initialized. Use
    /// [`ReqwestClient::builder`] to handle the error instead.
    pub fn new() -> Self {
        ReqwestClientBuilder::new()
            .build()
            .expect("failed to create HTTP client with default configuration")
    }

    /// Create a builder for configuring a new client.
    pub fn builder() -> ReqwestClientBuilder {
        ReqwestClientBuilder::new()
    }

    /// Get the client's configuration.
    pub fn config(&self) -> &ReqwestClientConfig {
        &self.inner.config
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = url::Url::parse(&request.url)?;

        let mut req_builder = self.inner.client.post(url);

        for (name, value) in request.headers.iter() {
            req_builder = req_builder.header(name, value);
        }

        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            req_builder = req_builder
                .header(
                    http::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(body);
        }

        let response = req_builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, headers, body))
    }
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
