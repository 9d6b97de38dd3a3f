//! [`HttpBaseClient`]: the `reqwest` implementation of [`BaseClient`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Method, Request};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use replication::{action_body, BaseClient, ClientError, RequestHeaders, ResourceBody};

use crate::config::HttpClientConfig;
use crate::response::{self, REQUEST_ID_HEADERS};

/// Header carrying the pre-issued auth token.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Sends replication requests to one service endpoint over HTTP.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpBaseClient {
    http: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl HttpBaseClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Configuration`] if the endpoint or timeout is invalid or
    /// the underlying HTTP client cannot be constructed.
    pub fn new(config: HttpClientConfig) -> Result<Self, ClientError> {
        let endpoint = config.validated_endpoint()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Configuration(format!("HTTP client error: {e}")))?;
        Ok(Self {
            http,
            endpoint,
            auth_token: config.auth_token,
        })
    }

    /// The endpoint every relative URL is appended to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds (but does not send) a request for `url` relative to the endpoint.
    pub fn build_request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &RequestHeaders,
    ) -> Result<Request, ClientError> {
        let mut header_map = HeaderMap::new();
        header_map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.auth_token {
            header_map.insert(AUTH_TOKEN_HEADER, header_value(AUTH_TOKEN_HEADER, token)?);
        }
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::Configuration(format!("invalid header name '{name}': {e}"))
            })?;
            let value = header_value(name.as_str(), value)?;
            header_map.insert(name, value);
        }

        let mut builder = self
            .http
            .request(method, format!("{}{url}", self.endpoint))
            .headers(header_map);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
            .build()
            .map_err(|e| ClientError::Transport(Box::new(e)))
    }

    /// Sends `request` and returns the parsed JSON body (if any).
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn send(&self, request: Request) -> Result<Option<Value>, ClientError> {
        let response = self.http.execute(request).await.map_err(|e| {
            warn!(error = %e, "request failed");
            transport_error(e)
        })?;

        let status = response.status();
        let request_id = REQUEST_ID_HEADERS
            .iter()
            .find_map(|name| response.headers().get(*name))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await.map_err(|e| {
            warn!(error = %e, "failed to read response body");
            transport_error(e)
        })?;
        debug!(status = status.as_u16(), request_id = ?request_id, "response received");

        if !status.is_success() {
            let err = response::error_from_response(
                status.as_u16(),
                status.canonical_reason(),
                request_id,
                &text,
            );
            warn!(error = %err, "service returned an error");
            return Err(err);
        }
        response::parse_body(&text)
    }

    async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &RequestHeaders,
    ) -> Result<Option<Value>, ClientError> {
        let request = self.build_request(method, url, body, headers)?;
        self.send(request).await
    }
}

impl std::fmt::Debug for HttpBaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBaseClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BaseClient for HttpBaseClient {
    async fn create(
        &self,
        url: &str,
        body: Value,
        response_key: &str,
    ) -> Result<ResourceBody, ClientError> {
        let response = self
            .call(Method::POST, url, Some(&body), &RequestHeaders::new())
            .await?;
        response::unwrap_object(response, response_key)
    }

    async fn list(&self, url: &str, response_key: &str) -> Result<Vec<ResourceBody>, ClientError> {
        let response = self
            .call(Method::GET, url, None, &RequestHeaders::new())
            .await?;
        response::unwrap_list(response, response_key)
    }

    async fn update(
        &self,
        url: &str,
        body: Value,
        response_key: &str,
    ) -> Result<ResourceBody, ClientError> {
        let response = self
            .call(Method::PUT, url, Some(&body), &RequestHeaders::new())
            .await?;
        response::unwrap_object(response, response_key)
    }

    async fn delete(&self, url: &str) -> Result<(), ClientError> {
        self.call(Method::DELETE, url, None, &RequestHeaders::new())
            .await?;
        Ok(())
    }

    async fn get(
        &self,
        url: &str,
        response_key: &str,
        headers: &RequestHeaders,
    ) -> Result<ResourceBody, ClientError> {
        let response = self.call(Method::GET, url, None, headers).await?;
        response::unwrap_object(response, response_key)
    }

    async fn action(
        &self,
        action: &str,
        url: &str,
        action_data: Option<Value>,
        response_key: &str,
    ) -> Result<ResourceBody, ClientError> {
        let body = action_body(action, action_data);
        let response = self
            .call(Method::POST, url, Some(&body), &RequestHeaders::new())
            .await?;
        response::unwrap_object(response, response_key)
    }
}

/// Maps a reqwest failure to [`ClientError::Timeout`] when any error in its
/// source chain is a timeout, otherwise to [`ClientError::Transport`].
fn transport_error(e: reqwest::Error) -> ClientError {
    if is_timeout(&e) {
        ClientError::Timeout
    } else {
        ClientError::Transport(Box::new(e))
    }
}

// Body-read timeouts arrive wrapped (decode -> body -> timed out).
fn is_timeout(e: &reqwest::Error) -> bool {
    if e.is_timeout() {
        return true;
    }
    let mut source = std::error::Error::source(e);
    while let Some(err) = source {
        if let Some(inner) = err.downcast_ref::<reqwest::Error>() {
            if inner.is_timeout() {
                return true;
            }
        }
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = err.source();
    }
    false
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::Configuration(format!("invalid value for header '{name}': {e}")))
}
