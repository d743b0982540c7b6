//! Core logic of the triage agent: conversation state, urgency rating,
//! input selection, transcripts, and the turn orchestrator that ties them
//! to the chat model.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod conversation;
pub mod input;
pub mod language;
mod model_client;
pub mod speech;
pub mod transcript;
mod turn;
pub mod urgency;

pub use turn::{Triage, TriageBuilder, TurnError};
