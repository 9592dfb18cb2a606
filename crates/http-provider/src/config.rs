use std::time::Duration;

/// How long a request may take before it fails with a network error.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`HttpConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpConfigBuilder {
    endpoint: String,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpConfigBuilder {
    /// Creates a builder that posts requests to the given URL.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout: None,
            user_agent: None,
        }
    }

    /// Sets the per-request timeout.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets a custom `User-Agent` header.
    #[inline]
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpConfig {
        HttpConfig {
            endpoint: self.endpoint,
            request_timeout: self
                .request_timeout
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            user_agent: self.user_agent.unwrap_or_else(|| {
                concat!("support-chat/", env!("CARGO_PKG_VERSION")).to_owned()
            }),
        }
    }
}

/// Configuration for the HTTP reply provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpConfig {
    pub(crate) endpoint: String,
    pub(crate) request_timeout: Duration,
    pub(crate) user_agent: String,
}

impl HttpConfig {
    /// Returns the URL requests are posted to.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the per-request timeout.
    #[inline]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}
