use std::fmt::{self, Display, Formatter};

/// The kind of error that occurred while asking for a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never got a response (connection refused, DNS, the
    /// request timed out, etc.).
    Network,
    /// The service answered with a non-success HTTP status.
    Status,
    /// The service answered, but flagged the request as unsuccessful.
    Rejected,
    /// The response could not be understood, or it has no reply in it.
    Malformed,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Network => "network failure",
            ErrorKind::Status => "unsuccessful status",
            ErrorKind::Rejected => "rejected by service",
            ErrorKind::Malformed => "malformed response",
            ErrorKind::Other => "other error",
        };
        f.write_str(s)
    }
}
