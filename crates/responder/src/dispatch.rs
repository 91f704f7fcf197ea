//! The event sink that turns chat messages into replies.

use std::sync::{Arc, OnceLock};

use {
    async_trait::async_trait,
    regina_channels::{
        ChannelRef, ChatTransport, EventSink, IncomingEvent, PostOptions, UserRef,
    },
    regina_config::BotConfig,
    regina_store::{JokeStore, RunInfoStore},
    tracing::{debug, info, warn},
};

use crate::{
    Error, Result,
    bootstrap::BootstrapSequencer,
    classify::{Action, Classifier, is_channel_conversation, is_chat_message},
    quotes::{QuoteSource, StarWarsQuotes},
    relay::{DisabledLinkRelay, LinkRelay, LinkSubmission},
    rotator::JokeRotator,
};

/// Classifies incoming messages and sends at most one reply per event.
///
/// Nothing is answered until [`EventSink::ready`] has resolved the bot's own
/// user and finished the first-run check.
pub struct Responder {
    transport: Arc<dyn ChatTransport>,
    rotator: JokeRotator,
    bootstrap: BootstrapSequencer,
    relay: Arc<dyn LinkRelay>,
    quotes: Arc<dyn QuoteSource>,
    classifier: Classifier,
    name: String,
    mention_id: Option<String>,
    greet_in_origin_channel: bool,
    identity: OnceLock<UserRef>,
}

impl Responder {
    pub fn new<S>(config: &BotConfig, transport: Arc<dyn ChatTransport>, store: Arc<S>) -> Self
    where
        S: JokeStore + RunInfoStore + 'static,
    {
        Self {
            rotator: JokeRotator::new(store.clone()),
            bootstrap: BootstrapSequencer::new(
                store,
                transport.clone(),
                config.name.clone(),
                config.trigger_phrase.clone(),
            ),
            transport,
            relay: Arc::new(DisabledLinkRelay),
            quotes: Arc::new(StarWarsQuotes),
            classifier: Classifier::new(&config.trigger_phrase, &config.name),
            name: config.name.clone(),
            mention_id: config.mention_id.clone().filter(|id| !id.is_empty()),
            greet_in_origin_channel: config.greet_in_origin_channel,
            identity: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn with_relay(mut self, relay: Arc<dyn LinkRelay>) -> Self {
        self.relay = relay;
        self
    }

    #[must_use]
    pub fn with_quotes(mut self, quotes: Arc<dyn QuoteSource>) -> Self {
        self.quotes = quotes;
        self
    }

    /// The bot's own user, once resolved.
    pub fn identity(&self) -> Option<&UserRef> {
        self.identity.get()
    }

    fn resolve_identity(&self) {
        match self.transport.find_user_by_name(&self.name) {
            Some(user) => {
                info!(bot_id = %user.id, bot_name = %user.name, "bot identity resolved");
                if self.identity.set(user).is_err() {
                    debug!("bot identity already resolved, keeping the first one");
                }
            },
            None => warn!(
                bot_name = %self.name,
                "no user with the bot's name in the directory; messages will be ignored"
            ),
        }
    }

    /// Decide on and carry out the reply for one event.
    ///
    /// Returns the action taken, `None` when the event was filtered out or
    /// matched nothing.
    pub async fn dispatch(&self, event: &IncomingEvent) -> Result<Option<Action>> {
        if !is_chat_message(event) || !is_channel_conversation(event) {
            return Ok(None);
        }
        let Some(bot) = self.identity.get() else {
            debug!(channel_id = %event.channel_id, "not ready, dropping event");
            return Ok(None);
        };
        if event.user_id == bot.id {
            return Ok(None);
        }

        let mention_id = self.mention_id.as_deref().unwrap_or(&bot.id);
        let Some(action) = self.classifier.classify(event.text(), Some(mention_id)) else {
            return Ok(None);
        };
        debug!(
            channel_id = %event.channel_id,
            user_id = %event.user_id,
            %action,
            "message classified"
        );

        match action {
            Action::RandomJoke => self.reply_with_joke(event).await?,
            Action::LinkRelay => self.acknowledge_link(event).await?,
            Action::Greeting => self.greet(event).await?,
        }
        Ok(Some(action))
    }

    async fn reply_with_joke(&self, event: &IncomingEvent) -> Result<()> {
        let channel = self.channel(&event.channel_id)?;
        let joke = self.rotator.select_and_mark().await?;
        self.post(&channel, &joke.text).await
    }

    async fn acknowledge_link(&self, event: &IncomingEvent) -> Result<()> {
        let user = self.user(&event.user_id)?;
        let channel = self.channel(&event.channel_id)?;

        let reply = format!("@{} copied that one.{}", user.name, self.quotes.next_quote());
        let posted = self.post(&channel, &reply).await;

        let submission = LinkSubmission::from_message(event.text(), &user.name, &channel.name);
        let relay = Arc::clone(&self.relay);
        tokio::spawn(async move {
            if let Err(e) = relay.submit(submission).await {
                warn!(error = %e, "link relay failed");
            }
        });

        posted
    }

    async fn greet(&self, event: &IncomingEvent) -> Result<()> {
        let user = self.user(&event.user_id)?;
        let channel = if self.greet_in_origin_channel {
            self.channel(&event.channel_id)?
        } else {
            self.transport.first_channel().ok_or(Error::NoChannel)?
        };
        let reply = format!(
            "@{} Hello. Hows it going? {}",
            user.name,
            self.quotes.next_quote()
        );
        self.post(&channel, &reply).await
    }

    fn channel(&self, id: &str) -> Result<ChannelRef> {
        self.transport
            .lookup_channel(id)
            .ok_or_else(|| Error::unknown_channel(id))
    }

    fn user(&self, id: &str) -> Result<UserRef> {
        self.transport
            .lookup_user(id)
            .ok_or_else(|| Error::unknown_user(id))
    }

    async fn post(&self, channel: &ChannelRef, text: &str) -> Result<()> {
        self.transport
            .post_text(channel, text, PostOptions::default())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventSink for Responder {
    async fn ready(&self) {
        self.resolve_identity();
        self.bootstrap.run().await;
    }

    async fn handle(&self, event: IncomingEvent) {
        if let Err(e) = self.dispatch(&event).await {
            warn!(
                channel_id = %event.channel_id,
                user_id = %event.user_id,
                error = %e,
                "event dropped"
            );
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::testing::{
            BOT_ID, FailingRelay, FixedQuote, RecordingRelay, RecordingTransport, USER_ID,
        },
        regina_store::InMemoryStore,
    };

    struct Harness {
        responder: Responder,
        transport: Arc<RecordingTransport>,
        relay: Arc<RecordingRelay>,
        store: Arc<InMemoryStore>,
    }

    impl Harness {
        fn with(config: BotConfig, transport: RecordingTransport) -> Self {
            let transport = Arc::new(transport);
            let relay = Arc::new(RecordingRelay::default());
            let store = Arc::new(
                InMemoryStore::with_jokes(["joke one", "joke two"])
                    .with_run_info("2016-06-01T10:00:00.000Z"),
            );
            let responder = Responder::new(&config, transport.clone(), store.clone())
                .with_relay(relay.clone())
                .with_quotes(Arc::new(FixedQuote(" May the Force be with you.")));
            Self {
                responder,
                transport,
                relay,
                store,
            }
        }

        async fn ready(config: BotConfig) -> Self {
            let h = Self::with(config, RecordingTransport::standard());
            h.responder.ready().await;
            h
        }

        async fn send(&self, text: &str, channel: &str, user: &str) {
            self.responder
                .handle(IncomingEvent::message(text, channel, user))
                .await;
        }
    }

    fn config() -> BotConfig {
        BotConfig::default()
    }

    #[tokio::test]
    async fn ready_resolves_identity() {
        let h = Harness::ready(config()).await;
        assert_eq!(h.responder.identity().map(|u| u.id.as_str()), Some(BOT_ID));
    }

    #[tokio::test]
    async fn joke_request_posts_to_origin_channel() {
        let h = Harness::ready(config()).await;
        h.send("regina tell me something", "C123", USER_ID).await;

        let posts = h.transport.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].channel_id, "C123");
        assert!(posts[0].text == "joke one" || posts[0].text == "joke two");
        assert!(posts[0].as_user);

        let used: i64 = [1, 2].iter().filter_map(|id| h.store.usage_of(*id)).sum();
        assert_eq!(used, 1);
    }

    #[tokio::test]
    async fn trigger_phrase_and_link_is_a_joke() {
        let h = Harness::ready(config()).await;
        let action = h
            .responder
            .dispatch(&IncomingEvent::message(
                "Rajni Time! <http://example.com>",
                "C123",
                USER_ID,
            ))
            .await
            .unwrap();
        assert_eq!(action, Some(Action::RandomJoke));
        assert!(h.relay.wait_for(1).await.is_empty());
    }

    #[tokio::test]
    async fn link_is_acknowledged_and_relayed() {
        let h = Harness::ready(config()).await;
        h.send("<http://example.com/x>", "C123", USER_ID).await;

        let posts = h.transport.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].channel_id, "C123");
        assert_eq!(posts[0].text, "@alice copied that one. May the Force be with you.");

        let subs = h.relay.wait_for(1).await;
        assert_eq!(subs, vec![LinkSubmission {
            url: "http://example.com/x".into(),
            sender: "alice".into(),
            channel: "random".into(),
        }]);
    }

    #[tokio::test]
    async fn link_relayed_even_when_post_fails() {
        let h = Harness::with(config(), RecordingTransport::standard().failing_posts());
        h.responder.ready().await;

        let result = h
            .responder
            .dispatch(&IncomingEvent::message("http://example.com", "C123", USER_ID))
            .await;
        assert!(matches!(result, Err(Error::Channel(_))));
        assert_eq!(h.relay.wait_for(1).await.len(), 1);
    }

    #[tokio::test]
    async fn mention_greets_in_first_channel() {
        let h = Harness::ready(config()).await;
        h.send(&format!("<@{BOT_ID}> hi"), "C123", USER_ID).await;

        let posts = h.transport.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].channel_id, "C100");
        assert_eq!(
            posts[0].text,
            "@alice Hello. Hows it going?  May the Force be with you."
        );
    }

    #[tokio::test]
    async fn mention_greets_in_origin_channel_when_configured() {
        let h = Harness::ready(BotConfig {
            greet_in_origin_channel: true,
            ..config()
        })
        .await;
        h.send(&format!("<@{BOT_ID}> hi"), "C123", USER_ID).await;
        assert_eq!(h.transport.posts()[0].channel_id, "C123");
    }

    #[tokio::test]
    async fn configured_mention_id_overrides_identity() {
        let h = Harness::ready(BotConfig {
            mention_id: Some("W777".into()),
            ..config()
        })
        .await;

        h.send(&format!("<@{BOT_ID}> hi"), "C123", USER_ID).await;
        assert!(h.transport.posts().is_empty());

        h.send("<@W777> hi", "C123", USER_ID).await;
        assert_eq!(h.transport.posts().len(), 1);
    }

    #[tokio::test]
    async fn at_sigil_without_mention_id_does_nothing() {
        let h = Harness::with(
            BotConfig {
                name: "norris".into(),
                ..config()
            },
            RecordingTransport::new(
                vec![ChannelRef::new("C100", "general")],
                vec![
                    UserRef::new(BOT_ID, "norris"),
                    UserRef::new(USER_ID, "alice"),
                ],
            ),
        );
        h.responder.ready().await;

        let action = h
            .responder
            .dispatch(&IncomingEvent::message("@regina hi", "C100", USER_ID))
            .await
            .unwrap();
        assert_eq!(action, None);
        assert!(h.transport.posts().is_empty());
    }

    #[tokio::test]
    async fn precondition_failures_produce_no_reply() {
        let h = Harness::ready(config()).await;
        let events = [
            IncomingEvent {
                kind: "user_typing".into(),
                text: Some("regina".into()),
                channel_id: "C123".into(),
                user_id: USER_ID.into(),
            },
            IncomingEvent::message("", "C123", USER_ID),
            IncomingEvent::message("regina tell me something", "D123", USER_ID),
            IncomingEvent::message("regina tell me something", "C123", BOT_ID),
        ];
        for event in events {
            assert_eq!(h.responder.dispatch(&event).await.unwrap(), None);
        }
        assert!(h.transport.posts().is_empty());
        assert_eq!(h.store.usage_of(1), Some(0));
        assert_eq!(h.store.usage_of(2), Some(0));
    }

    #[tokio::test]
    async fn events_before_ready_are_dropped() {
        let h = Harness::with(config(), RecordingTransport::standard());
        h.send("regina tell me something", "C123", USER_ID).await;
        assert!(h.transport.posts().is_empty());
    }

    #[tokio::test]
    async fn missing_bot_user_keeps_responder_idle() {
        let h = Harness::with(
            config(),
            RecordingTransport::new(vec![ChannelRef::new("C100", "general")], vec![
                UserRef::new(USER_ID, "alice"),
            ]),
        );
        h.responder.ready().await;
        assert!(h.responder.identity().is_none());

        h.send("regina tell me something", "C100", USER_ID).await;
        assert!(h.transport.posts().is_empty());
    }

    #[tokio::test]
    async fn unknown_channel_is_dropped_without_using_a_joke() {
        let h = Harness::ready(config()).await;
        let err = h
            .responder
            .dispatch(&IncomingEvent::message("rajni time", "C404", USER_ID))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownChannel { .. }));
        assert!(h.transport.posts().is_empty());
        assert_eq!(h.store.usage_of(1), Some(0));
    }

    #[tokio::test]
    async fn unknown_user_link_is_dropped() {
        let h = Harness::ready(config()).await;
        let err = h
            .responder
            .dispatch(&IncomingEvent::message("http://x", "C123", "U404"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownUser { .. }));
        assert!(h.transport.posts().is_empty());
        assert!(h.relay.wait_for(1).await.is_empty());
    }

    #[tokio::test]
    async fn empty_catalogue_sends_nothing() {
        let transport = Arc::new(RecordingTransport::standard());
        let store = Arc::new(InMemoryStore::new().with_run_info("2016-06-01T10:00:00.000Z"));
        let responder = Responder::new(&config(), transport.clone(), store);
        responder.ready().await;

        let err = responder
            .dispatch(&IncomingEvent::message("rajni time", "C123", USER_ID))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoJokes));
        assert!(transport.posts().is_empty());
    }

    #[tokio::test]
    async fn first_ready_welcomes_before_any_reply() {
        let transport = Arc::new(RecordingTransport::standard());
        let store = Arc::new(InMemoryStore::with_jokes(["only joke"]));
        let responder = Responder::new(&config(), transport.clone(), store.clone());

        responder.ready().await;
        responder
            .handle(IncomingEvent::message("rajni time", "C123", USER_ID))
            .await;

        let posts = transport.posts();
        assert_eq!(posts.len(), 2);
        assert!(posts[0].text.starts_with("Hi guys, my name is regina"));
        assert_eq!(posts[1].text, "only joke");
        assert_eq!(store.run_info_inserts(), 1);
    }

    #[tokio::test]
    async fn rotation_spreads_across_catalogue() {
        let h = Harness::ready(config()).await;
        for _ in 0..4 {
            h.send("rajni time", "C123", USER_ID).await;
        }
        assert_eq!(h.store.usage_of(1), Some(2));
        assert_eq!(h.store.usage_of(2), Some(2));
    }

    #[tokio::test]
    async fn store_read_failure_sends_no_joke() {
        let transport = Arc::new(RecordingTransport::standard());
        let store = Arc::new(
            InMemoryStore::with_jokes(["joke one"])
                .with_run_info("2016-06-01T10:00:00.000Z")
                .failing_reads(),
        );
        let responder = Responder::new(&config(), transport.clone(), store.clone());
        responder.ready().await;

        let err = responder
            .dispatch(&IncomingEvent::message("rajni time", "C123", USER_ID))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert!(transport.posts().is_empty());
        assert_eq!(store.usage_of(1), Some(0));
    }

    #[tokio::test]
    async fn increment_failure_sends_no_joke() {
        let transport = Arc::new(RecordingTransport::standard());
        let store = Arc::new(
            InMemoryStore::with_jokes(["joke one"])
                .with_run_info("2016-06-01T10:00:00.000Z")
                .failing_writes(),
        );
        let responder = Responder::new(&config(), transport.clone(), store.clone());
        responder.ready().await;

        let err = responder
            .dispatch(&IncomingEvent::message("rajni time", "C123", USER_ID))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert!(transport.posts().is_empty());
        assert_eq!(store.usage_of(1), Some(0));
    }

    #[tokio::test]
    async fn relay_failure_keeps_acknowledgement() {
        let transport = Arc::new(RecordingTransport::standard());
        let relay = Arc::new(FailingRelay::default());
        let store = Arc::new(InMemoryStore::new().with_run_info("2016-06-01T10:00:00.000Z"));
        let responder = Responder::new(&config(), transport.clone(), store)
            .with_relay(relay.clone())
            .with_quotes(Arc::new(FixedQuote(" Do. Or do not.")));
        responder.ready().await;

        let action = responder
            .dispatch(&IncomingEvent::message("<http://example.com/x>", "C123", USER_ID))
            .await
            .unwrap();
        assert_eq!(action, Some(Action::LinkRelay));
        assert_eq!(relay.wait_for(1).await, 1);

        let posts = transport.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].channel_id, "C123");
        assert_eq!(posts[0].text, "@alice copied that one. Do. Or do not.");
    }

    #[tokio::test]
    async fn second_ready_keeps_identity_and_welcomes_once() {
        let transport = Arc::new(RecordingTransport::standard());
        let store = Arc::new(InMemoryStore::with_jokes(["only joke"]));
        let responder = Responder::new(&config(), transport.clone(), store.clone());

        responder.ready().await;
        responder.ready().await;

        assert_eq!(responder.identity().map(|u| u.id.as_str()), Some(BOT_ID));
        assert_eq!(transport.posts().len(), 1);
        assert_eq!(store.run_info_inserts(), 1);
        assert_eq!(store.run_info_updates(), 0);
    }
}
