//! Flavour quotes appended to canned replies.

use rand::seq::IndexedRandom;

/// Source of decorative one-liners.
pub trait QuoteSource: Send + Sync {
    fn next_quote(&self) -> String;
}

const STAR_WARS: &[&str] = &[
    "Do. Or do not. There is no try.",
    "May the Force be with you.",
    "I find your lack of faith disturbing.",
    "Help me, Obi-Wan Kenobi. You're my only hope.",
    "The Force will be with you. Always.",
    "Why, you stuck-up, half-witted, scruffy-looking nerf herder!",
    "Never tell me the odds!",
    "It's a trap!",
    "I've got a bad feeling about this.",
    "Fear is the path to the dark side.",
    "Size matters not.",
    "These aren't the droids you're looking for.",
    "Your eyes can deceive you. Don't trust them.",
    "In my experience, there's no such thing as luck.",
    "Great, kid. Don't get cocky.",
    "Laugh it up, fuzzball.",
    "You don't know the power of the dark side!",
    "Judge me by my size, do you?",
    "Aren't you a little short for a stormtrooper?",
    "Traveling through hyperspace ain't like dusting crops, boy!",
];

/// Picks a random line from a fixed list of Star Wars quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StarWarsQuotes;

impl QuoteSource for StarWarsQuotes {
    fn next_quote(&self) -> String {
        STAR_WARS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_default()
            .to_string()
    }
}
