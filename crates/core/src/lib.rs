//! Core abstractions for Verdant campaigns.
//!
//! The campaign logic talks to other ranks only through the [`Transport`]
//! trait: a fixed group with queryable rank and size, blocking tagged
//! point-to-point sends, and blocking receives from one rank or from any.
//! [`MessageTransport`] layers typed, encoded messages on top.

mod error;
mod message;
mod traits;

pub use error::TransportError;
pub use message::Envelope;
pub use traits::{MessageTransport, Transport};

pub use verdant_messages::Tag;
