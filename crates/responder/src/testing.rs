//! Test doubles for the transport, relay and quote source.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use {
    async_trait::async_trait,
    regina_channels::{ChannelRef, ChatTransport, PostOptions, UserRef},
};

use crate::{
    Result,
    quotes::QuoteSource,
    relay::{LinkRelay, LinkSubmission},
};

pub const BOT_ID: &str = "U0JSZEG1X";
pub const USER_ID: &str = "U999";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub channel_id: String,
    pub text: String,
    pub as_user: bool,
}

pub struct RecordingTransport {
    channels: Vec<ChannelRef>,
    users: Vec<UserRef>,
    posts: Mutex<Vec<Post>>,
    fail_posts: AtomicBool,
}

impl RecordingTransport {
    pub fn new(channels: Vec<ChannelRef>, users: Vec<UserRef>) -> Self {
        Self {
            channels,
            users,
            posts: Mutex::new(Vec::new()),
            fail_posts: AtomicBool::new(false),
        }
    }

    /// `#general` (C100) listed before `#random` (C123); the bot and alice.
    pub fn standard() -> Self {
        Self::new(
            vec![
                ChannelRef::new("C100", "general"),
                ChannelRef::new("C123", "random"),
            ],
            vec![
                UserRef::new(BOT_ID, "regina"),
                UserRef::new(USER_ID, "alice"),
            ],
        )
    }

    #[must_use]
    pub fn failing_posts(self) -> Self {
        self.fail_posts.store(true, Ordering::SeqCst);
        self
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    fn channels(&self) -> Vec<ChannelRef> {
        self.channels.clone()
    }

    fn users(&self) -> Vec<UserRef> {
        self.users.clone()
    }

    async fn post_text(
        &self,
        channel: &ChannelRef,
        text: &str,
        opts: PostOptions,
    ) -> regina_channels::Result<()> {
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(regina_channels::Error::api("chat.postMessage", "not_in_channel"));
        }
        self.posts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Post {
                channel_id: channel.id.clone(),
                text: text.to_string(),
                as_user: opts.as_user,
            });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRelay {
    submissions: Mutex<Vec<LinkSubmission>>,
}

impl RecordingRelay {
    pub fn submissions(&self) -> Vec<LinkSubmission> {
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Yield to spawned tasks until `count` submissions have arrived.
    pub async fn wait_for(&self, count: usize) -> Vec<LinkSubmission> {
        for _ in 0..100 {
            if self.submissions().len() >= count {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.submissions()
    }
}

#[async_trait]
impl LinkRelay for RecordingRelay {
    async fn submit(&self, submission: LinkSubmission) -> Result<()> {
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(submission);
        Ok(())
    }
}

/// Relay whose every submission fails after being counted.
#[derive(Default)]
pub struct FailingRelay {
    attempts: AtomicUsize,
}

impl FailingRelay {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Yield to spawned tasks until `count` submissions have been attempted.
    pub async fn wait_for(&self, count: usize) -> usize {
        for _ in 0..100 {
            if self.attempts() >= count {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.attempts()
    }
}

#[async_trait]
impl LinkRelay for FailingRelay {
    async fn submit(&self, _submission: LinkSubmission) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(regina_channels::Error::api("relay", "connection refused").into())
    }
}

pub struct FixedQuote(pub &'static str);

impl QuoteSource for FixedQuote {
    fn next_quote(&self) -> String {
        self.0.to_string()
    }
}
