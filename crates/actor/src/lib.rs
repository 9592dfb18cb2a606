//! A lightweight actor framework.
//!
//! An actor owns some state and a mailbox. Messages are handled one at a
//! time on a single task, so every handler observes and mutates the state
//! without any other handler interleaving. Background work reports back by
//! sending messages, which makes "first one to arrive wins" decisions a
//! plain read-then-write inside one handler.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod error;
mod handle;
mod mailbox;
mod scheduler;
mod timer;

pub use error::ActorDeadError;
pub use handle::Actor;
pub use mailbox::Message;
pub use timer::Timer;
