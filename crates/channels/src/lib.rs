//! Chat transport seam.
//!
//! The responder never talks to a chat service directly. A transport (Slack
//! RTM today) implements [`ChatTransport`] for outbound text and directory
//! lookups, and drives an [`EventSink`] with the inbound event stream.

pub mod directory;
pub mod error;
pub mod plugin;

pub use {
    directory::Directory,
    error::{Error, Result},
    plugin::{
        ChannelRef, ChatTransport, EventSink, IncomingEvent, PostOptions, UserRef,
        MESSAGE_EVENT_KIND,
    },
};
