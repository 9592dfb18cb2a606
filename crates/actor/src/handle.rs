use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::sleep;
use tracing::Instrument;

use crate::mailbox::{CallMessage, Mailbox, MailboxParts};
use crate::scheduler::run_actor;
use crate::{ActorDeadError, Message, Timer};

/// Handle to an actor.
///
/// The actor keeps running as long as a handle exists, or until it is
/// killed explicitly.
pub struct Actor<S> {
    mailbox: Arc<Mailbox<S>>,
}

impl<S: Send + Sync + 'static> Actor<S> {
    /// Spawns a new actor with the specified state and an optional label.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(state: S, label: Option<&str>) -> Self {
        let MailboxParts {
            mailbox,
            msg_rx,
            kill_rx,
        } = Mailbox::new();
        let mailbox = Arc::new(mailbox);
        tokio::spawn(
            run_actor(Arc::downgrade(&mailbox), state, msg_rx, kill_rx)
                .instrument(trace_span!("actor", label = label)),
        );
        Self { mailbox }
    }

    #[inline]
    pub(crate) fn from_mailbox(mailbox: Arc<Mailbox<S>>) -> Self {
        Self { mailbox }
    }

    /// Sends a message to the actor.
    #[inline]
    pub fn send<M: Message<S> + 'static>(
        &self,
        msg: M,
    ) -> Result<(), ActorDeadError> {
        self.mailbox.send(Box::new(msg))
    }

    /// Runs `f` against the actor's state in its own turn and returns the
    /// result.
    ///
    /// # Cancel safety
    ///
    /// Dropping the returned future does not stop `f` from running once
    /// it has been sent.
    pub async fn call<F, R>(&self, f: F) -> Result<R, ActorDeadError>
    where
        F: FnOnce(&mut S, &Actor<S>) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(CallMessage { f, reply_tx })?;
        reply_rx.await.map_err(|_| ActorDeadError)
    }

    /// Delivers `msg` to the actor after `delay`.
    ///
    /// The returned [`Timer`] cancels the delivery when it is dropped.
    /// A pending timer does not keep the actor alive.
    pub fn send_after<M: Message<S> + 'static>(
        &self,
        delay: Duration,
        msg: M,
    ) -> Timer {
        let mailbox = Arc::downgrade(&self.mailbox);
        let task = tokio::spawn(
            async move {
                sleep(delay).await;
                let Some(mailbox) = mailbox.upgrade() else {
                    trace!("actor is gone, drop the delayed message");
                    return;
                };
                mailbox.send(Box::new(msg)).ok();
            }
            .instrument(trace_span!("timer", ?delay)),
        );
        Timer::new(task, delay)
    }

    /// Attempts to kill the actor.
    ///
    /// The actor is not guaranteed to be killed immediately, but it
    /// will stop handling further messages and quit soon.
    #[inline]
    pub fn try_kill(&self) {
        self.mailbox.try_kill();
    }

    /// Returns `true` if the actor has stopped receiving messages.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.mailbox.is_closed()
    }
}

impl<S> Clone for Actor<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}
