use support_chat_model::ReplyProvider;

use super::{ChatView, Coordinator, IdleFn, UpdateFn};
use crate::config::CoordinatorConfig;
use crate::error::ConfigError;
use crate::reply_client::ReplyClient;

/// [`Coordinator`] builder.
pub struct CoordinatorBuilder {
    pub(super) client: ReplyClient,
    pub(super) config: CoordinatorConfig,
    pub(super) on_update: Option<UpdateFn>,
    pub(super) on_idle: Option<IdleFn>,
}

impl CoordinatorBuilder {
    /// Creates a new builder with the specified reply provider.
    #[inline]
    pub fn with_reply_provider<P: ReplyProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            client: ReplyClient::new(provider),
            config: CoordinatorConfig::default(),
            on_update: None,
            on_idle: None,
        }
    }

    /// Replaces the default configuration.
    #[inline]
    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a callback to be invoked whenever the transcript, the
    /// busy flag or the draft changes.
    ///
    /// The callback runs on the coordinator's task and must not block.
    #[inline]
    pub fn on_update(
        mut self,
        on_update: impl Fn(&ChatView) + Send + Sync + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(on_update));
        self
    }

    /// Attaches a callback to be invoked when a submission has been
    /// answered, one way or another, and input is accepted again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the coordinator.
    ///
    /// This must be called within a tokio runtime. Fails if the fallback
    /// timeout does not outlast the reply provider's own timeout.
    pub fn build(self) -> Result<Coordinator, ConfigError> {
        self.config.validate(self.client.service_timeout())?;
        Ok(Coordinator::spawn_from_builder(self))
    }
}
