use serde::{Deserialize, Serialize};

/// A complete reply from the provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reply {
    /// The text to show to the user.
    pub text: String,
}

impl Reply {
    /// Creates a reply with the given text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
