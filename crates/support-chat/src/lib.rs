//! A ready-to-use support chat that talks to an HTTP reply service.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to embed the chat into your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

pub mod input;
pub mod render;
mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`support_chat_core`] crate.
pub mod core {
    pub use support_chat_core::*;
}
