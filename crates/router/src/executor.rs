//! The transport the router hands rewritten requests to.

use crate::{GraphQLResponse, OutgoingRequest, Result, RouterError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for a request (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Sends a request body to a GraphQL server.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, request: &OutgoingRequest) -> Result<GraphQLResponse>;
}

#[async_trait]
impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    async fn execute(&self, request: &OutgoingRequest) -> Result<GraphQLResponse> {
        (**self).execute(request).await
    }
}

/// Posts requests as JSON to a fixed endpoint.
///
/// # Examples
///
/// ```no_run
/// use graphql_persist_router::HttpExecutor;
/// use std::time::Duration;
///
/// let executor = HttpExecutor::new("https://api.example.com/graphql")
///     .with_header("Authorization", "Bearer my-token")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    uri: String,
    headers: HashMap<String, String>,
    timeout: Duration,
    connect_timeout: Duration,
}

impl HttpExecutor {
    /// Creates an executor for `uri` with a 30 second request timeout, a 10
    /// second connection timeout and no custom headers.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            headers: HashMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Adds an HTTP header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Sets the maximum time for the whole request (connection + transfer).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[async_trait]
impl QueryExecutor for HttpExecutor {
    #[tracing::instrument(skip(self, request), fields(uri = %self.uri, id = request.id()))]
    async fn execute(&self, request: &OutgoingRequest) -> Result<GraphQLResponse> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| RouterError::Network(format!("Failed to create HTTP client: {e}")))?;

        let mut builder = client
            .post(&self.uri)
            .header("Content-Type", "application/json");
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        tracing::debug!("Sending request");
        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| RouterError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %error_body, "HTTP error response");
            return Err(RouterError::Http(status.as_u16(), error_body));
        }

        response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse GraphQL response");
            RouterError::Parse(e.to_string())
        })
    }
}
