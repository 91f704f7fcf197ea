//! Event filtering and classification.

use regina_channels::{IncomingEvent, MESSAGE_EVENT_KIND};

/// What to do with a message that passed the dispatch preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RandomJoke,
    LinkRelay,
    Greeting,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RandomJoke => "random_joke",
            Self::LinkRelay => "link_relay",
            Self::Greeting => "greeting",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message with some text in it.
pub fn is_chat_message(event: &IncomingEvent) -> bool {
    event.kind == MESSAGE_EVENT_KIND && !event.text().is_empty()
}

/// Public and group channel ids start with `C`; DMs (`D…`) and the rest are
/// not answered.
pub fn is_channel_conversation(event: &IncomingEvent) -> bool {
    event.channel_id.starts_with('C')
}

/// Substring rules that map message text to an [`Action`].
#[derive(Debug, Clone)]
pub struct Classifier {
    trigger: String,
    name: String,
}

impl Classifier {
    /// Both needles are matched case-insensitively.
    pub fn new(trigger_phrase: &str, bot_name: &str) -> Self {
        Self {
            trigger: trigger_phrase.to_lowercase(),
            name: bot_name.to_lowercase(),
        }
    }

    /// First matching rule wins: trigger or name, then link or name, then a
    /// mention of `mention_id`.
    ///
    /// A message that names the bot is always a joke request, even when it
    /// carries a link.
    pub fn classify(&self, text: &str, mention_id: Option<&str>) -> Option<Action> {
        let lower = text.to_lowercase();
        if lower.contains(&self.trigger) || lower.contains(&self.name) {
            return Some(Action::RandomJoke);
        }
        if lower.contains("http") || lower.contains(&self.name) {
            return Some(Action::LinkRelay);
        }
        if let Some(id) = mention_id.filter(|id| !id.is_empty())
            && is_mention_of(text, id)
        {
            return Some(Action::Greeting);
        }
        None
    }
}

/// Second character is `@` and the text after the first character contains
/// `id`, as in `<@U0JSZEG1X> hi`.
fn is_mention_of(text: &str, id: &str) -> bool {
    let mut chars = text.char_indices();
    let Some((_, first)) = chars.next() else {
        return false;
    };
    if !matches!(chars.next(), Some((_, '@'))) {
        return false;
    }
    text[first.len_utf8()..].contains(id)
}
