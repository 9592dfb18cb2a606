//! Error types.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use support_chat_actor::ActorDeadError;

/// Why a message was not submitted.
///
/// A rejected submission leaves the conversation untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitError {
    /// The message is empty or only whitespace.
    EmptyInput,
    /// An earlier message is still waiting for its reply.
    Busy,
    /// The conversation has been closed.
    Closed,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyInput => "the message is empty".fmt(f),
            SubmitError::Busy => "still waiting for the previous reply".fmt(f),
            SubmitError::Closed => "the conversation has been closed".fmt(f),
        }
    }
}

impl Error for SubmitError {}

impl From<ActorDeadError> for SubmitError {
    #[inline]
    fn from(_: ActorDeadError) -> Self {
        SubmitError::Closed
    }
}

/// An invalid coordinator configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigError {
    /// The fallback timeout is zero.
    ZeroFallbackTimeout,
    /// The fallback timeout would fire before the reply service gives up
    /// by itself.
    FallbackNotAfterServiceTimeout {
        /// The configured fallback timeout.
        fallback: Duration,
        /// The timeout advertised by the reply service.
        service: Duration,
    },
    /// More earlier turns were requested than the reply service accepts.
    HistoryLimitTooLarge {
        /// The configured history limit.
        limit: usize,
        /// The largest accepted limit.
        max: usize,
    },
    /// A text shown in the transcript is blank. Carries the option name.
    EmptyText(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroFallbackTimeout => {
                "the fallback timeout must not be zero".fmt(f)
            }
            ConfigError::FallbackNotAfterServiceTimeout {
                fallback,
                service,
            } => write!(
                f,
                "the fallback timeout ({fallback:?}) must be longer than \
                 the service timeout ({service:?})"
            ),
            ConfigError::HistoryLimitTooLarge { limit, max } => {
                write!(f, "the history limit {limit} exceeds {max}")
            }
            ConfigError::EmptyText(field) => {
                write!(f, "the {field} must not be blank")
            }
        }
    }
}

impl Error for ConfigError {}
