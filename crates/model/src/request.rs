use serde::{Deserialize, Serialize};

/// Who authored a turn in the conversation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user.
    Requester,
    /// The remote reply service.
    Responder,
}

/// A prior turn sent along with a request to give it context.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The author of the turn.
    pub role: Role,
    /// The text of the turn.
    pub text: String,
}

impl HistoryEntry {
    /// Creates a history entry.
    #[inline]
    pub fn new<S: Into<String>>(role: Role, text: S) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// A request to be sent to the reply provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyRequest {
    /// The message the user just sent.
    pub message: String,
    /// Earlier turns, oldest first. Never includes `message` itself.
    pub history: Vec<HistoryEntry>,
}
