mod builder;
mod state;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt::{self, Display};

use support_chat_actor::{Actor, ActorDeadError};
use tokio::task::JoinHandle;

pub use builder::CoordinatorBuilder;
use state::{Phase, SetDraft};

use crate::config::CoordinatorConfig;
use crate::conversation::{Message, Transcript};
use crate::error::SubmitError;
use crate::reply_client::ReplyClient;

type UpdateFn = Box<dyn Fn(&ChatView) + Send + Sync>;
type IdleFn = Box<dyn Fn() + Send + Sync>;

/// Identifies one accepted submission and the request it started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DispatchId(u64);

impl DispatchId {
    /// Returns the raw value of this id.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispatch#{}", self.0)
    }
}

/// What a renderer needs to draw the conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatView {
    /// All messages, oldest first.
    pub messages: Vec<Message>,
    /// Whether a message is waiting for its reply. Input should be
    /// disabled while this is set.
    pub busy: bool,
    /// The text in the input box that has not been submitted yet.
    pub draft: String,
}

/// The state behind a [`Coordinator`], owned by its actor.
struct CoordinatorState {
    client: ReplyClient,
    config: CoordinatorConfig,
    transcript: Transcript,
    draft: String,
    phase: Phase,
    in_flight: HashMap<DispatchId, JoinHandle<()>>,
    next_dispatch_id: u64,

    on_update: Option<UpdateFn>,
    on_idle: Option<IdleFn>,
}

/// A support conversation that sends each user message to a reply
/// service and shows exactly one outcome for it.
///
/// Only one message may wait for its reply at a time. The reply races a
/// fallback timer; whichever settles first decides what is shown, and
/// the loser is ignored. All of this runs on the coordinator's own task,
/// so every method here is just a message to it.
///
/// Cloning gives another handle to the same conversation.
#[derive(Clone)]
pub struct Coordinator {
    handle: Actor<CoordinatorState>,
}

impl Coordinator {
    /// Submits a user message.
    ///
    /// The message is trimmed first. On success it is already in the
    /// transcript when this returns, and the draft has been cleared.
    /// Empty messages and messages sent while busy are rejected without
    /// touching anything.
    pub async fn submit<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<DispatchId, SubmitError> {
        let text = text.into();
        self.handle
            .call(move |state, handle| state.submit(text, handle))
            .await?
    }

    /// Replaces the unsent text in the input box.
    #[inline]
    pub fn set_draft<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<(), ActorDeadError> {
        self.handle.send(SetDraft(text.into()))
    }

    /// Returns the current state of the conversation.
    pub async fn snapshot(&self) -> Result<ChatView, ActorDeadError> {
        self.handle.call(|state, _| state.view()).await
    }

    /// Closes the conversation. Requests still in flight are abandoned.
    #[inline]
    pub fn close(&self) {
        self.handle.try_kill();
    }

    /// Returns `true` once the conversation has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

impl Coordinator {
    fn spawn_from_builder(builder: CoordinatorBuilder) -> Self {
        let CoordinatorBuilder {
            client,
            config,
            on_update,
            on_idle,
        } = builder;

        let state = CoordinatorState {
            client,
            transcript: Transcript::with_greeting(config.greeting.clone()),
            config,
            draft: Default::default(),
            phase: Default::default(),
            in_flight: Default::default(),
            next_dispatch_id: 1,
            on_update,
            on_idle,
        };
        Self {
            handle: Actor::spawn(state, Some("coordinator")),
        }
    }
}
