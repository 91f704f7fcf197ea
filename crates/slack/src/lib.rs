//! Slack transport for regina.
//!
//! Talks to the Web API with reqwest and receives events over the Real Time
//! Messaging websocket. Implements [`regina_channels::ChatTransport`] and
//! drives a [`regina_channels::EventSink`].

pub mod api;
pub mod error;
pub mod socket;
pub mod transport;

pub use {
    error::{Error, Result},
    socket::run,
    transport::SlackTransport,
};
