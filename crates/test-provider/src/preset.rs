use std::time::Duration;

use serde::{Deserialize, Serialize};
use support_chat_model::ErrorKind;

/// What a preset reply resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    #[serde(rename = "reply")]
    Reply(String),
    #[serde(rename = "failure")]
    Failure(PresetErrorKind),
}

/// Serializable mirror of [`ErrorKind`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PresetErrorKind {
    Network,
    Status,
    Rejected,
    Malformed,
    Other,
}

impl From<PresetErrorKind> for ErrorKind {
    #[inline]
    fn from(kind: PresetErrorKind) -> Self {
        match kind {
            PresetErrorKind::Network => ErrorKind::Network,
            PresetErrorKind::Status => ErrorKind::Status,
            PresetErrorKind::Rejected => ErrorKind::Rejected,
            PresetErrorKind::Malformed => ErrorKind::Malformed,
            PresetErrorKind::Other => ErrorKind::Other,
        }
    }
}

/// The preset answer to one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// How the request resolves.
    pub outcome: PresetOutcome,
    /// How long the request takes. Defaults to 1ms when unset.
    pub delay: Option<Duration>,
}

impl PresetReply {
    /// Creates a successful reply with the given text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            outcome: PresetOutcome::Reply(text.into()),
            delay: None,
        }
    }

    /// Creates a failed reply of the given kind.
    #[inline]
    pub fn with_failure(kind: PresetErrorKind) -> Self {
        Self {
            outcome: PresetOutcome::Failure(kind),
            delay: None,
        }
    }

    /// Sets how long the request takes before it resolves.
    #[inline]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}
