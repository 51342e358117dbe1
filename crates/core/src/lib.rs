//! Conversation state and the request lifecycle of the advisor chat.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod controller;
pub mod conversation;
mod error;
mod query_client;
pub mod reply;

pub use controller::{Controller, ControllerBuilder};
pub use conversation::{ConversationState, Message, MessageId, Role, Stage};
pub use error::SubmitError;
