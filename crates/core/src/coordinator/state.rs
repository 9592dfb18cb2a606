use std::mem;

use support_chat_actor::{Actor, Message, Timer};
use support_chat_model::{ErrorKind, ReplyRequest};
use tracing::Instrument;

use super::{ChatView, CoordinatorState, DispatchId};
use crate::conversation::Role;
use crate::error::SubmitError;
use crate::reply_client::SendRequestResult;

/// Where the conversation is in its request lifecycle.
///
/// Leaving `Awaiting` is the one and only resolution of a dispatch.
#[derive(Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    Awaiting {
        dispatch: DispatchId,
        fallback: Timer,
    },
}

impl Phase {
    #[inline]
    fn is_busy(&self) -> bool {
        matches!(self, Phase::Awaiting { .. })
    }

    #[inline]
    fn is_awaiting(&self, dispatch: DispatchId) -> bool {
        matches!(
            self,
            Phase::Awaiting { dispatch: current, .. } if *current == dispatch
        )
    }
}

/// How a dispatch ended.
#[derive(Debug)]
enum Outcome {
    Replied(String),
    Failed(ErrorKind),
    TimedOut,
}

impl CoordinatorState {
    pub(super) fn submit(
        &mut self,
        text: String,
        handle: &Actor<Self>,
    ) -> Result<DispatchId, SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if self.phase.is_busy() {
            debug!("rejected a submission while busy");
            return Err(SubmitError::Busy);
        }

        // The new message travels separately, so the history is taken
        // before it is appended.
        let history = self.transcript.context_window(self.config.history_limit);
        self.transcript.push(Role::Requester, text.to_owned(), false);
        self.draft.clear();

        let dispatch = DispatchId(self.next_dispatch_id);
        self.next_dispatch_id += 1;

        let fallback = handle.send_after(
            self.config.fallback_timeout,
            FallbackElapsed(dispatch),
        );
        self.phase = Phase::Awaiting { dispatch, fallback };

        let request = ReplyRequest {
            message: text.to_owned(),
            history,
        };
        let client = self.client.clone();
        let handle = handle.clone();
        let task = tokio::spawn(
            async move {
                let result = client.send_request(request).await;
                handle.send(ReplySettled { dispatch, result }).ok();
            }
            .instrument(debug_span!("dispatch", %dispatch)),
        );
        self.in_flight.insert(dispatch, task);

        debug!("{dispatch} sent");
        self.notify_update();
        Ok(dispatch)
    }

    pub(super) fn view(&self) -> ChatView {
        ChatView {
            messages: self.transcript.messages().to_vec(),
            busy: self.phase.is_busy(),
            draft: self.draft.clone(),
        }
    }

    /// Ends the dispatch with `outcome`, unless something else already
    /// ended it.
    fn resolve(&mut self, dispatch: DispatchId, outcome: Outcome) {
        if !self.phase.is_awaiting(dispatch) {
            debug!("{dispatch} is already resolved, dropping {outcome:?}");
            return;
        }
        if let Phase::Awaiting { fallback, .. } = mem::take(&mut self.phase) {
            fallback.cancel();
        }

        let (text, failed) = match outcome {
            Outcome::Replied(text) => {
                debug!("{dispatch} got a reply");
                (text, false)
            }
            Outcome::Failed(kind) => {
                warn!("{dispatch} failed: {kind}");
                (self.config.error_text.clone(), true)
            }
            Outcome::TimedOut => {
                // Left running but detached; whatever it settles with is
                // dropped above.
                self.in_flight.remove(&dispatch);
                warn!(
                    "{dispatch} got no reply within {:?}",
                    self.config.fallback_timeout
                );
                (self.config.timeout_text.clone(), true)
            }
        };
        self.transcript.push(Role::Responder, text, failed);

        self.notify_update();
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    fn notify_update(&self) {
        if let Some(on_update) = &self.on_update {
            on_update(&self.view());
        }
    }
}

impl Drop for CoordinatorState {
    fn drop(&mut self) {
        for (dispatch, task) in self.in_flight.drain() {
            trace!("abandoning {dispatch}");
            task.abort();
        }
    }
}

#[derive(Debug)]
pub struct SetDraft(pub String);

impl Message<CoordinatorState> for SetDraft {
    fn handle(
        self,
        state: &mut CoordinatorState,
        _handle: &Actor<CoordinatorState>,
    ) {
        if state.draft != self.0 {
            state.draft = self.0;
            state.notify_update();
        }
    }
}

#[derive(Debug)]
struct ReplySettled {
    dispatch: DispatchId,
    result: SendRequestResult,
}

impl Message<CoordinatorState> for ReplySettled {
    fn handle(
        self,
        state: &mut CoordinatorState,
        _handle: &Actor<CoordinatorState>,
    ) {
        state.in_flight.remove(&self.dispatch);
        let outcome = match self.result {
            Ok(reply) => Outcome::Replied(reply.text),
            Err(err) => {
                debug!("{} settled with an error: {err}", self.dispatch);
                Outcome::Failed(err.kind())
            }
        };
        state.resolve(self.dispatch, outcome);
    }
}

#[derive(Debug)]
struct FallbackElapsed(DispatchId);

impl Message<CoordinatorState> for FallbackElapsed {
    #[inline]
    fn handle(
        self,
        state: &mut CoordinatorState,
        _handle: &Actor<CoordinatorState>,
    ) {
        state.resolve(self.0, Outcome::TimedOut);
    }
}
