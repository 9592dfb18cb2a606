//! Coordinator configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// How long to wait for a reply before giving up on it.
pub const DEFAULT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(15);

/// How many earlier turns are sent along with a new message.
pub const DEFAULT_HISTORY_LIMIT: usize = 6;

/// The most earlier turns the reply service accepts with one message.
pub const MAX_HISTORY_LIMIT: usize = 6;

/// The message that opens every conversation.
pub const DEFAULT_GREETING: &str =
    "Hi! I'm here to help with your account, content and billing. \
     What can I do for you?";

/// Shown when the reply service reports an error.
pub const DEFAULT_ERROR_TEXT: &str =
    "Sorry, something went wrong on our side. Please try again.";

/// Shown when no reply arrived in time.
pub const DEFAULT_TIMEOUT_TEXT: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";

/// Builder for [`CoordinatorConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CoordinatorConfigBuilder {
    fallback_timeout: Option<Duration>,
    history_limit: Option<usize>,
    greeting: Option<String>,
    error_text: Option<String>,
    timeout_text: Option<String>,
}

impl CoordinatorConfigBuilder {
    /// Creates a builder with every option at its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long a request may stay unanswered before the
    /// conversation gives up on it.
    #[inline]
    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = Some(timeout);
        self
    }

    /// Sets how many earlier turns are sent as context.
    #[inline]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Sets the opening message.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Sets the text shown when the service reports an error.
    #[inline]
    pub fn with_error_text<S: Into<String>>(mut self, text: S) -> Self {
        self.error_text = Some(text.into());
        self
    }

    /// Sets the text shown when no reply arrived in time.
    #[inline]
    pub fn with_timeout_text<S: Into<String>>(mut self, text: S) -> Self {
        self.timeout_text = Some(text.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> CoordinatorConfig {
        CoordinatorConfig {
            fallback_timeout: self
                .fallback_timeout
                .unwrap_or(DEFAULT_FALLBACK_TIMEOUT),
            history_limit: self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
            greeting: self
                .greeting
                .unwrap_or_else(|| DEFAULT_GREETING.to_owned()),
            error_text: self
                .error_text
                .unwrap_or_else(|| DEFAULT_ERROR_TEXT.to_owned()),
            timeout_text: self
                .timeout_text
                .unwrap_or_else(|| DEFAULT_TIMEOUT_TEXT.to_owned()),
        }
    }
}

/// Configuration for a [`crate::Coordinator`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoordinatorConfig {
    pub(crate) fallback_timeout: Duration,
    pub(crate) history_limit: usize,
    pub(crate) greeting: String,
    pub(crate) error_text: String,
    pub(crate) timeout_text: String,
}

impl CoordinatorConfig {
    /// Returns the fallback timeout.
    #[inline]
    pub fn fallback_timeout(&self) -> Duration {
        self.fallback_timeout
    }

    /// Returns how many earlier turns are sent as context.
    #[inline]
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Returns the opening message.
    #[inline]
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Checks this configuration against the reply service's own timeout.
    ///
    /// The fallback must fire strictly after the service would have
    /// reported a timeout by itself, otherwise users get the generic
    /// "trouble connecting" text in place of the service's error. Every
    /// text that may end up in the transcript must be non-blank.
    pub fn validate(
        &self,
        service_timeout: Option<Duration>,
    ) -> Result<(), ConfigError> {
        if self.fallback_timeout.is_zero() {
            return Err(ConfigError::ZeroFallbackTimeout);
        }
        if self.history_limit > MAX_HISTORY_LIMIT {
            return Err(ConfigError::HistoryLimitTooLarge {
                limit: self.history_limit,
                max: MAX_HISTORY_LIMIT,
            });
        }
        let texts = [
            ("greeting", &self.greeting),
            ("error text", &self.error_text),
            ("timeout text", &self.timeout_text),
        ];
        for (field, text) in texts {
            if text.trim().is_empty() {
                return Err(ConfigError::EmptyText(field));
            }
        }
        match service_timeout {
            Some(service) if self.fallback_timeout <= service => {
                Err(ConfigError::FallbackNotAfterServiceTimeout {
                    fallback: self.fallback_timeout,
                    service,
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for CoordinatorConfig {
    #[inline]
    fn default() -> Self {
        CoordinatorConfigBuilder::new().build()
    }
}
