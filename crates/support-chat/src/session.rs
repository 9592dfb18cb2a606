use std::sync::Mutex;

use support_chat_core::conversation::Message;
use support_chat_core::{
    ConfigError, Coordinator, CoordinatorBuilder, CoordinatorConfig,
    DispatchId, SubmitError,
};
use support_chat_model::ReplyProvider;

type MessageFn = Box<dyn Fn(&Message) + Send + Sync>;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    coordinator_builder: CoordinatorBuilder,
    on_message: Option<MessageFn>,
}

impl SessionBuilder {
    /// Creates a session builder with a specified reply provider.
    pub fn with_reply_provider<P: ReplyProvider + 'static>(
        provider: P,
    ) -> Self {
        let coordinator_builder =
            CoordinatorBuilder::with_reply_provider(provider);
        Self {
            coordinator_builder,
            on_message: None,
        }
    }

    /// Replaces the default coordinator configuration.
    #[inline]
    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator_builder =
            self.coordinator_builder.with_config(config);
        self
    }

    /// Attaches a callback to be invoked once for every message appended
    /// after the greeting, in order.
    #[inline]
    pub fn on_message(
        mut self,
        on_message: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.on_message = Some(Box::new(on_message));
        self
    }

    /// Attaches a callback to be invoked when the session accepts input
    /// again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.coordinator_builder = self.coordinator_builder.on_idle(on_idle);
        self
    }

    /// Builds a new session.
    ///
    /// This must be called within a tokio runtime.
    pub fn build(self) -> Result<Session, ConfigError> {
        let Self {
            mut coordinator_builder,
            on_message,
        } = self;

        if let Some(on_message) = on_message {
            // The greeting is already there before anyone can listen.
            let seen = Mutex::new(1);
            coordinator_builder = coordinator_builder.on_update(move |view| {
                let Ok(mut seen) = seen.lock() else {
                    return;
                };
                for message in view.messages.iter().skip(*seen) {
                    on_message(message);
                }
                *seen = (*seen).max(view.messages.len());
            });
        }

        let coordinator = coordinator_builder.build()?;
        Ok(Session { coordinator })
    }
}

/// A chat session, like a window that displays messages and has an input
/// box.
///
/// The session is basically a wrapper around [`Coordinator`].
pub struct Session {
    coordinator: Coordinator,
}

impl Session {
    /// Sends a message to the session.
    #[inline]
    pub async fn send_message(
        &self,
        message: &str,
    ) -> Result<DispatchId, SubmitError> {
        self.coordinator.submit(message).await
    }

    /// Returns every message of the session so far.
    pub async fn transcript(&self) -> Result<Vec<Message>, SubmitError> {
        let view = self.coordinator.snapshot().await?;
        Ok(view.messages)
    }

    /// Returns `true` while a message is waiting for its reply.
    pub async fn is_busy(&self) -> bool {
        match self.coordinator.snapshot().await {
            Ok(view) => view.busy,
            Err(_) => false,
        }
    }

    /// Returns the underlying coordinator.
    #[inline]
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        trace!("closing the session");
        self.coordinator.close();
    }
}
