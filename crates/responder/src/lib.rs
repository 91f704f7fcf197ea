//! Message classification and dispatch for regina.
//!
//! Each chat message is classified into at most one action (joke, link
//! acknowledgement, greeting) and answered through a
//! [`regina_channels::ChatTransport`]. Jokes rotate least-used-first and a
//! welcome is posted on the very first run.

pub mod bootstrap;
pub mod classify;
pub mod dispatch;
pub mod error;
pub mod quotes;
pub mod relay;
pub mod rotator;

#[cfg(test)]
mod testing;

pub use {
    bootstrap::{BootstrapOutcome, BootstrapSequencer},
    classify::{Action, Classifier},
    dispatch::Responder,
    error::{Error, Result},
    quotes::{QuoteSource, StarWarsQuotes},
    relay::{DisabledLinkRelay, HttpLinkRelay, LinkRelay, LinkSubmission},
    rotator::JokeRotator,
};
