use std::error::Error;
use std::fmt::{self, Display};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use support_chat_model::{
    ErrorKind, Reply, ReplyProvider, ReplyProviderError, ReplyRequest,
};
use tracing::Instrument;

pub(crate) type SendRequestResult = Result<Reply, Box<dyn ReplyProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ReplyRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a reply provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ReplyClient {
    handler_fn: HandlerFn,
    service_timeout: Option<Duration>,
}

impl ReplyClient {
    #[inline]
    pub fn new<P: ReplyProvider + 'static>(provider: P) -> Self {
        let service_timeout = provider.service_timeout();
        // We have to erase the type `P`, since `ReplyClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req: ReplyRequest| {
            let fut = provider.send_request(&req);
            let boxed: BoxedSendRequestFuture = Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    handle_response::<P>(fut.await)
                }
                .instrument(trace_span!("reply client req")),
            );
            boxed
        });
        Self {
            handler_fn,
            service_timeout,
        }
    }

    /// Sends a request and returns the reply.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe as long as the provider's future is.
    #[inline]
    pub async fn send_request(&self, req: ReplyRequest) -> SendRequestResult {
        (self.handler_fn)(req).await
    }

    /// Returns the provider's own timeout, if it has one.
    #[inline]
    pub fn service_timeout(&self) -> Option<Duration> {
        self.service_timeout
    }
}

fn handle_response<P: ReplyProvider + 'static>(
    resp_or_err: Result<Reply, P::Error>,
) -> SendRequestResult {
    match resp_or_err {
        Ok(reply) if reply.text.trim().is_empty() => {
            warn!("got an empty reply");
            Err(Box::new(EmptyReplyError))
        }
        Ok(reply) => {
            trace!("finished a request");
            Ok(reply)
        }
        Err(err) => {
            error!("got an error: {err:?}");
            Err(Box::new(err))
        }
    }
}

/// A reply with nothing to show counts as a malformed response.
#[derive(Debug)]
struct EmptyReplyError;

impl Display for EmptyReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the reply is empty".fmt(f)
    }
}

impl Error for EmptyReplyError {}

impl ReplyProviderError for EmptyReplyError {
    #[inline]
    fn kind(&self) -> ErrorKind {
        ErrorKind::Malformed
    }
}
