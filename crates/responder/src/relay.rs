//! Forwarding of shared links to the knowledge-object webhook.

use std::collections::BTreeMap;

use {
    async_trait::async_trait,
    regina_config::RelayConfig,
    serde::Serialize,
    tracing::{debug, info},
};

use crate::Result;

/// Body posted to the relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSubmission {
    pub url: String,
    pub sender: String,
    pub channel: String,
}

impl LinkSubmission {
    /// Build a submission from raw message text, unwrapping Slack's `<…>`
    /// link markup.
    pub fn from_message(text: &str, sender: &str, channel: &str) -> Self {
        Self {
            url: strip_link_brackets(text),
            sender: sender.to_string(),
            channel: channel.to_string(),
        }
    }
}

/// Remove the first `<` and the first `>` from `text`.
pub fn strip_link_brackets(text: &str) -> String {
    text.replacen('<', "", 1).replacen('>', "", 1)
}

/// Destination for shared links. Submissions are fire-and-forget from the
/// dispatcher's point of view.
#[async_trait]
pub trait LinkRelay: Send + Sync {
    async fn submit(&self, submission: LinkSubmission) -> Result<()>;
}

/// Relay that POSTs JSON to an HTTP endpoint.
pub struct HttpLinkRelay {
    http: reqwest::Client,
    url: String,
    query: BTreeMap<String, String>,
}

impl HttpLinkRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url.clone(),
            query: config.query.clone(),
        }
    }
}

#[async_trait]
impl LinkRelay for HttpLinkRelay {
    async fn submit(&self, submission: LinkSubmission) -> Result<()> {
        debug!(url = %submission.url, "relaying link");
        let resp = self
            .http
            .post(&self.url)
            .query(&self.query)
            .json(&submission)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        info!(status = status.as_u16(), body = %body, "link relay responded");
        Ok(())
    }
}

/// Relay used when forwarding is switched off.
pub struct DisabledLinkRelay;

#[async_trait]
impl LinkRelay for DisabledLinkRelay {
    async fn submit(&self, submission: LinkSubmission) -> Result<()> {
        debug!(url = %submission.url, "link relay disabled, dropping link");
        Ok(())
    }
}
