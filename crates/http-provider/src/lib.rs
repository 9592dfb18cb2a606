//! A reply provider that talks to the support chat endpoint over HTTP.
//!
//! The endpoint accepts `POST {message, history}` and answers with
//! `{success, data: {reply}}`. Responses are plain JSON; there is no
//! streaming and no authentication.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;

use mime::Mime;
use reqwest::{Client, header};
use support_chat_model::{
    ErrorKind, Reply, ReplyProvider, ReplyProviderError, ReplyRequest,
};

pub use config::{DEFAULT_REQUEST_TIMEOUT, HttpConfig, HttpConfigBuilder};

/// Error type for [`HttpProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_status() {
            ErrorKind::Status
        } else if err.is_decode() {
            ErrorKind::Malformed
        } else {
            ErrorKind::Network
        };
        Self::new(format!("{err}"), kind)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ReplyProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// HTTP reply provider.
#[derive(Clone, Debug)]
pub struct HttpProvider {
    client: Client,
    config: Arc<HttpConfig>,
}

impl HttpProvider {
    /// Creates a new `HttpProvider` with the given configuration.
    ///
    /// Fails if the underlying HTTP client cannot be initialized.
    pub fn new(config: HttpConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| {
                Error::new(
                    format!("cannot create HTTP client: {err}"),
                    ErrorKind::Other,
                )
            })?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Returns the configuration of this provider.
    #[inline]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl ReplyProvider for HttpProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ReplyRequest,
    ) -> impl Future<Output = Result<Reply, Self::Error>> + Send + 'static {
        let body = proto::create_request(req);
        let resp_fut = self
            .client
            .post(&self.config.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send();

        async move {
            let resp = resp_fut.await?.error_for_status()?;

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let is_json = content_type
                .as_deref()
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| {
                    m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON)
                })
                .unwrap_or(false);
            if !is_json {
                return Err(Error::new(
                    format!("unexpected content type: {content_type:?}"),
                    ErrorKind::Malformed,
                ));
            }

            let body = resp.bytes().await?;
            trace!("got a response body of {} bytes", body.len());
            proto::parse_response(&body)
        }
    }

    #[inline]
    fn service_timeout(&self) -> Option<Duration> {
        Some(self.config.request_timeout)
    }
}
