use std::sync::{PoisonError, RwLock};

use {
    async_trait::async_trait,
    regina_channels::{ChannelRef, ChatTransport, Directory, PostOptions, UserRef},
    regina_config::SlackConfig,
    tracing::{info, warn},
};

use crate::{Result, api::SlackApi};

/// [`ChatTransport`] backed by the Slack Web API.
///
/// Directory lookups are served from the snapshot taken by
/// [`SlackTransport::load_directory`]; until then they find nothing.
pub struct SlackTransport {
    api: SlackApi,
    directory: RwLock<Directory>,
}

impl SlackTransport {
    pub fn new(config: &SlackConfig) -> Self {
        Self::with_api(SlackApi::new(config))
    }

    pub fn with_api(api: SlackApi) -> Self {
        Self {
            api,
            directory: RwLock::new(Directory::default()),
        }
    }

    pub fn api(&self) -> &SlackApi {
        &self.api
    }

    /// Fetch channels and users and replace the directory snapshot.
    pub async fn load_directory(&self) -> Result<()> {
        let (channels, users) =
            futures::try_join!(self.api.conversations_list(), self.api.users_list())?;
        info!(
            channels = channels.len(),
            users = users.len(),
            "slack directory loaded"
        );
        if channels.is_empty() {
            warn!("no public channels visible; greetings and the welcome post will be skipped");
        }
        *self
            .directory
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Directory::new(channels, users);
        Ok(())
    }

    fn with_directory<T>(&self, f: impl FnOnce(&Directory) -> T) -> T {
        let dir = self.directory.read().unwrap_or_else(PoisonError::into_inner);
        f(&dir)
    }
}

#[async_trait]
impl ChatTransport for SlackTransport {
    fn channels(&self) -> Vec<ChannelRef> {
        self.with_directory(|d| d.channels().to_vec())
    }

    fn users(&self) -> Vec<UserRef> {
        self.with_directory(|d| d.users().to_vec())
    }

    fn first_channel(&self) -> Option<ChannelRef> {
        self.with_directory(|d| d.first_channel().cloned())
    }

    fn lookup_channel(&self, id: &str) -> Option<ChannelRef> {
        self.with_directory(|d| d.channel(id).cloned())
    }

    fn lookup_user(&self, id: &str) -> Option<UserRef> {
        self.with_directory(|d| d.user(id).cloned())
    }

    fn find_user_by_name(&self, name: &str) -> Option<UserRef> {
        self.with_directory(|d| d.user_by_name(name).cloned())
    }

    async fn post_text(
        &self,
        channel: &ChannelRef,
        text: &str,
        opts: PostOptions,
    ) -> regina_channels::Result<()> {
        self.api
            .chat_post_message(&channel.id, text, opts.as_user)
            .await
            .map_err(Into::into)
    }
}
