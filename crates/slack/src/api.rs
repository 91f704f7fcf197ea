//! Minimal Slack Web API client.

use {
    regina_channels::{ChannelRef, UserRef},
    regina_config::SlackConfig,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::{Value, json},
    tracing::{debug, warn},
};

use crate::{Error, Result};

/// Page size requested from list endpoints.
const PAGE_LIMIT: &str = "200";

/// Upper bound on pages fetched from a list endpoint.
const MAX_PAGES: usize = 50;

/// Result of `rtm.connect`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RtmSession {
    /// Websocket URL, valid for 30 seconds.
    pub url: String,
    #[serde(rename = "self")]
    pub bot: UserRef,
}

#[derive(Deserialize)]
struct UserPage {
    #[serde(default)]
    members: Vec<UserRef>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Deserialize)]
struct ChannelPage {
    #[serde(default)]
    channels: Vec<ChannelRef>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

fn next_cursor(meta: Option<ResponseMetadata>) -> Option<String> {
    meta.map(|m| m.next_cursor).filter(|c| !c.is_empty())
}

/// Web API client bound to one bot token.
#[derive(Clone)]
pub struct SlackApi {
    http: reqwest::Client,
    base: String,
    token: Secret<String>,
}

impl SlackApi {
    pub fn new(config: &SlackConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// Open an RTM session and identify the bot.
    pub async fn rtm_connect(&self) -> Result<RtmSession> {
        self.get("rtm.connect", &[]).await
    }

    /// All users visible to the bot.
    pub async fn users_list(&self) -> Result<Vec<UserRef>> {
        let mut users = Vec::new();
        let mut cursor: Option<String> = None;
        for _ in 0..MAX_PAGES {
            let mut params = vec![("limit", PAGE_LIMIT.to_string())];
            if let Some(c) = cursor.take() {
                params.push(("cursor", c));
            }
            let page: UserPage = self.get("users.list", &params).await?;
            users.extend(page.members);
            cursor = next_cursor(page.response_metadata);
            if cursor.is_none() {
                return Ok(users);
            }
        }
        warn!("users.list reached page limit; user directory may be incomplete");
        Ok(users)
    }

    /// Public, non-archived channels in the order Slack lists them.
    pub async fn conversations_list(&self) -> Result<Vec<ChannelRef>> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;
        for _ in 0..MAX_PAGES {
            let mut params = vec![
                ("types", "public_channel".to_string()),
                ("exclude_archived", "true".to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ];
            if let Some(c) = cursor.take() {
                params.push(("cursor", c));
            }
            let page: ChannelPage = self.get("conversations.list", &params).await?;
            channels.extend(page.channels);
            cursor = next_cursor(page.response_metadata);
            if cursor.is_none() {
                return Ok(channels);
            }
        }
        warn!("conversations.list reached page limit; channel directory may be incomplete");
        Ok(channels)
    }

    /// Send a message via `chat.postMessage`.
    pub async fn chat_post_message(&self, channel: &str, text: &str, as_user: bool) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/chat.postMessage", self.base))
            .bearer_auth(self.token.expose_secret())
            .json(&json!({
                "channel": channel,
                "text": text,
                "as_user": as_user,
            }))
            .send()
            .await?;
        let body: Value = resp.json().await?;
        check_ok("chat.postMessage", &body)?;
        debug!(channel, "posted message");
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, method: &str, params: &[(&str, String)]) -> Result<T> {
        let resp = self
            .http
            .get(format!("{}/{method}", self.base))
            .bearer_auth(self.token.expose_secret())
            .query(params)
            .send()
            .await?;
        let body: Value = resp.json().await?;
        check_ok(method, &body)?;
        Ok(serde_json::from_value(body)?)
    }
}

fn check_ok(method: &str, body: &Value) -> Result<()> {
    if body["ok"].as_bool() == Some(true) {
        return Ok(());
    }
    let reason = body["error"].as_str().unwrap_or("unknown");
    Err(Error::api(method, reason))
}
