//! An abstraction layer for the external services the triage agent talks
//! to.
//!
//! This crate establishes an unified protocol for the agent to interact
//! with chat-completion models and speech recognizers, so that the agent
//! can seamlessly switch between hosted services (or fakes in tests)
//! without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;
mod speech;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
pub use speech::*;
