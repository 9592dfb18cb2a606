//! Core logic of the support chat: the transcript, the request lifecycle
//! and its configuration.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod conversation;
mod coordinator;
mod error;
mod reply_client;

pub use config::{CoordinatorConfig, CoordinatorConfigBuilder};
pub use coordinator::{ChatView, Coordinator, CoordinatorBuilder, DispatchId};
pub use error::{ConfigError, SubmitError};
