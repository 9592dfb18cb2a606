//! The contract between the support chat and a remote reply service.
//!
//! This crate establishes a small protocol for the chat coordinator to
//! talk to whatever produces replies, so that the coordinator can switch
//! between an HTTP backend, a scripted fake, or anything else without
//! modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
