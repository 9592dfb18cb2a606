use std::error::Error;
use std::time::Duration;

use crate::error::ErrorKind;
use crate::request::ReplyRequest;
use crate::response::Reply;

/// The error type for a reply provider.
pub trait ReplyProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a remote reply service.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the provider should be prepared for being dropped anytime.
pub trait ReplyProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ReplyProviderError;

    /// Sends a request and resolves to the complete reply.
    ///
    /// The returned future must be independent of `self`. Callers may
    /// stop caring about the result at any time, but they will not
    /// necessarily drop the future.
    fn send_request(
        &self,
        req: &ReplyRequest,
    ) -> impl Future<Output = Result<Reply, Self::Error>> + Send + 'static;

    /// Returns the longest time a request may take before the provider
    /// reports an error by itself, if the provider has such a limit.
    ///
    /// Callers racing their own deadline against this provider should
    /// pick one that is strictly longer, so that a real error is
    /// observed before the caller gives up.
    fn service_timeout(&self) -> Option<Duration> {
        None
    }
}
