//! The protocol shared by the conversation core and the advisor service.
//!
//! This crate defines the wire types of the `/query` endpoint and the
//! [`QueryProvider`] abstraction, so that the conversation logic can talk
//! to the real HTTP service or to an in-process fake without knowing which.
//!
//! Types in this crate don't define any conversation behavior. The only
//! logic here is decoding the loosely typed response body into
//! [`AdvisorPayload`].

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
