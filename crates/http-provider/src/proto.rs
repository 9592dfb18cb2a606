use serde::{Deserialize, Serialize};
use support_chat_model::{ErrorKind, Reply, ReplyRequest, Role};

use crate::Error;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ReplyEnvelope {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ReplyData>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ReplyData {
    pub reply: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Turn<'a> {
    role: Role,
    text: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplyRequestBody<'a> {
    message: &'a str,
    history: Vec<Turn<'a>>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ReplyRequest) -> ReplyRequestBody<'_> {
    ReplyRequestBody {
        message: &req.message,
        history: req
            .history
            .iter()
            .map(|entry| Turn {
                role: entry.role,
                text: &entry.text,
            })
            .collect(),
    }
}

/// Parses a response body into a reply.
///
/// Anything but `{"success": true, "data": {"reply": "<non-empty>"}}` is
/// an error.
pub fn parse_response(body: &[u8]) -> Result<Reply, Error> {
    let envelope: ReplyEnvelope = serde_json::from_slice(body).map_err(|err| {
        Error::new(format!("invalid response body: {err}"), ErrorKind::Malformed)
    })?;

    if !envelope.success {
        return Err(Error::new(
            "the service reported an unsuccessful request",
            ErrorKind::Rejected,
        ));
    }

    match envelope.data.and_then(|data| data.reply) {
        Some(reply) if !reply.trim().is_empty() => Ok(Reply::new(reply)),
        Some(_) => Err(Error::new("the reply is empty", ErrorKind::Malformed)),
        None => Err(Error::new(
            "the response has no reply",
            ErrorKind::Malformed,
        )),
    }
}
