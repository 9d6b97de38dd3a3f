//! HTTP client configuration.

use std::time::Duration;

use reqwest::Url;

use replication::ClientError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("sgsclient-rs/", env!("CARGO_PKG_VERSION"));

/// Configuration for [`crate::HttpBaseClient`].
#[derive(Clone)]
pub struct HttpClientConfig {
    /// Versioned service endpoint, e.g. `http://sgs.example.com:8975/v1/<project>`.
    /// Resource paths such as `/replications` are appended to it.
    pub endpoint: String,

    /// Pre-issued token sent as `X-Auth-Token`. Obtaining it is the caller's job.
    pub auth_token: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    pub user_agent: String,
}

impl HttpClientConfig {
    /// Create a configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks that the endpoint is an absolute `http`/`https` URL and returns
    /// it without a trailing slash.
    pub fn validated_endpoint(&self) -> Result<String, ClientError> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            ClientError::Configuration(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "endpoint '{}' must use http or https",
                self.endpoint
            )));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Configuration("timeout must be non-zero".into()));
        }
        Ok(self.endpoint.trim_end_matches('/').to_string())
    }
}

impl std::fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("endpoint", &self.endpoint)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::new("http://localhost:8975/v1/demo");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.auth_token, None);
        assert!(config.user_agent.starts_with("sgsclient-rs/"));
    }

    #[test]
    fn test_config_builder() {
        let config = HttpClientConfig::new("https://sgs.example.com/v1/p1")
            .with_auth_token("tok")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("ops-tool/2");

        assert_eq!(config.auth_token.as_deref(), Some("tok"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "ops-tool/2");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = HttpClientConfig::new("http://localhost:8975/v1/demo/");
        assert_eq!(
            config.validated_endpoint().unwrap(),
            "http://localhost:8975/v1/demo"
        );
    }

    #[test]
    fn relative_or_non_http_endpoints_are_rejected() {
        for endpoint in ["/v1/demo", "ftp://host/v1", "not a url"] {
            let err = HttpClientConfig::new(endpoint).validated_endpoint().unwrap_err();
            assert!(matches!(err, ClientError::Configuration(_)), "{endpoint}");
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = HttpClientConfig::new("http://localhost/v1")
            .with_timeout(Duration::ZERO)
            .validated_endpoint()
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let config = HttpClientConfig::new("http://localhost/v1").with_auth_token("secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
