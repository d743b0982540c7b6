//! A medical triage assistant for the terminal.
//!
//! Symptoms are typed or spoken, sent to a hosted chat model, and the reply
//! is tagged with a keyword-based urgency rating. The crate includes a CLI
//! tool, and you can also use [`Session`] as a library to drive the same
//! flow from your own front end.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

pub mod audio;
mod config;
mod session;
mod theme;

pub use config::{Config, ConfigError};
pub use session::{Session, SessionBuilder};
pub use theme::Theme;

/// Re-exports of [`triage_core`] crate.
pub mod core {
    pub use triage_core::*;
}
