use {async_trait::async_trait, serde::Deserialize};

use crate::Result;

/// Event `type` value carried by chat messages.
pub const MESSAGE_EVENT_KIND: &str = "message";

// ── Inbound ─────────────────────────────────────────────────────────────────

/// One real-time event delivered by the transport.
///
/// Field names follow the RTM wire format so frames deserialize directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IncomingEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "channel", default)]
    pub channel_id: String,
    #[serde(rename = "user", default)]
    pub user_id: String,
}

impl IncomingEvent {
    /// Shorthand for a plain chat message.
    #[must_use]
    pub fn message(
        text: impl Into<String>,
        channel_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            kind: MESSAGE_EVENT_KIND.into(),
            text: Some(text.into()),
            channel_id: channel_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Message text, or `""` when absent.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// A channel as listed in the transport's directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelRef {
    pub id: String,
    pub name: String,
}

impl ChannelRef {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A user as listed in the transport's directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

impl UserRef {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Receiver of the transport's event stream.
///
/// The transport calls [`EventSink::ready`] once the connection and the
/// directory are available, then [`EventSink::handle`] for every event, one at
/// a time and in arrival order.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn ready(&self);
    async fn handle(&self, event: IncomingEvent);
}

// ── Outbound ────────────────────────────────────────────────────────────────

/// Per-post delivery options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOptions {
    /// Post as the authenticated bot user rather than as an app.
    pub as_user: bool,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self { as_user: true }
    }
}

/// Capabilities the responder needs from a chat service.
///
/// Directory lookups are answered from the snapshot taken at connect time and
/// return `None` for unknown ids instead of failing.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Known channels in directory order.
    fn channels(&self) -> Vec<ChannelRef>;

    /// Known users.
    fn users(&self) -> Vec<UserRef>;

    /// Target for greetings and the welcome post.
    fn first_channel(&self) -> Option<ChannelRef> {
        self.channels().into_iter().next()
    }

    fn lookup_channel(&self, id: &str) -> Option<ChannelRef> {
        self.channels().into_iter().find(|c| c.id == id)
    }

    fn lookup_user(&self, id: &str) -> Option<UserRef> {
        self.users().into_iter().find(|u| u.id == id)
    }

    fn find_user_by_name(&self, name: &str) -> Option<UserRef> {
        self.users().into_iter().find(|u| u.name == name)
    }

    /// Post plain text to a channel.
    async fn post_text(&self, channel: &ChannelRef, text: &str, opts: PostOptions) -> Result<()>;
}
