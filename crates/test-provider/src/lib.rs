//! A local fake reply service for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use support_chat_model::{
    ErrorKind, Reply, ReplyProvider, ReplyProviderError, ReplyRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub fn message(&self) -> &str {
        self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ReplyProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<PresetReply>>,
    requests: Mutex<Vec<ReplyRequest>>,
}

/// A local fake reply service for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how
/// the service should answer each request, in order. Every request takes
/// the next preset reply; when the script runs out, an error is returned.
/// Requests are recorded so tests can check what was sent.
///
/// Clones share the same script and request log.
///
/// # Note
///
/// Delays use tokio's clock, so tests running with a paused clock can
/// decide deterministically whether a reply beats a deadline.
#[derive(Clone, Default)]
pub struct TestReplyProvider {
    inner: Arc<Inner>,
    service_timeout: Option<Duration>,
}

impl TestReplyProvider {
    #[inline]
    pub fn add_reply(&mut self, preset: PresetReply) {
        self.inner
            .script
            .lock()
            .expect("script lock poisoned")
            .push_back(preset);
    }

    /// Sets the value reported by [`ReplyProvider::service_timeout`].
    #[inline]
    pub fn set_service_timeout(&mut self, timeout: Duration) {
        self.service_timeout = Some(timeout);
    }

    /// Returns all requests received so far, oldest first.
    #[inline]
    pub fn requests(&self) -> Vec<ReplyRequest> {
        self.inner
            .requests
            .lock()
            .expect("request log lock poisoned")
            .clone()
    }

    /// Returns how many preset replies have not been used yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.inner.script.lock().expect("script lock poisoned").len()
    }
}

impl ReplyProvider for TestReplyProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ReplyRequest,
    ) -> impl Future<Output = Result<Reply, Self::Error>> + Send + 'static {
        self.inner
            .requests
            .lock()
            .expect("request log lock poisoned")
            .push(req.clone());
        let preset = self
            .inner
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front();

        async move {
            let Some(preset) = preset else {
                return Err(Error {
                    message: "no enough preset replies",
                    kind: ErrorKind::Other,
                });
            };
            sleep(preset.delay.unwrap_or(Duration::from_millis(1))).await;
            match preset.outcome {
                PresetOutcome::Reply(text) => Ok(Reply::new(text)),
                PresetOutcome::Failure(kind) => Err(Error {
                    message: "preset failure",
                    kind: kind.into(),
                }),
            }
        }
    }

    #[inline]
    fn service_timeout(&self) -> Option<Duration> {
        self.service_timeout
    }
}
