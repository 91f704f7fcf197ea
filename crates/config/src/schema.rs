//! Config schema types (bot behaviour, Slack account, store, link relay).

use std::{collections::BTreeMap, path::PathBuf};

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Bot name used when none is configured.
pub const DEFAULT_BOT_NAME: &str = "regina";

/// Phrase that asks the bot for a joke.
pub const DEFAULT_TRIGGER_PHRASE: &str = "rajni time";

/// Default link relay endpoint.
pub const DEFAULT_RELAY_URL: &str = "https://regina.stamplayapp.com/api/cobject/v1/knowledgeobject";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReginaConfig {
    pub bot: BotConfig,
    pub slack: SlackConfig,
    pub store: StoreConfig,
    pub relay: RelayConfig,
}

impl ReginaConfig {
    /// Store path, falling back to `./data/<bot name>.db`.
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("data").join(format!("{}.db", self.bot.name)))
    }
}

/// How the bot recognises requests and where it answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Display name; must match the bot's user name in the workspace.
    pub name: String,

    /// Phrase that requests a joke (matched case-insensitively).
    pub trigger_phrase: String,

    /// Mention id that triggers a greeting. Defaults to the bot's resolved
    /// user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mention_id: Option<String>,

    /// Reply to greetings in the channel they came from instead of the first
    /// channel in the directory.
    pub greet_in_origin_channel: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BOT_NAME.into(),
            trigger_phrase: DEFAULT_TRIGGER_PHRASE.into(),
            mention_id: None,
            greet_in_origin_channel: false,
        }
    }
}

/// Slack workspace connection.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Bot user OAuth token (`xoxb-…`).
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Web API base URL.
    pub api_base: String,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            api_base: "https://slack.com/api".into(),
        }
    }
}

impl SlackConfig {
    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Joke/settings database location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Outbound webhook that receives shared links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub enabled: bool,
    pub url: String,
    /// Fixed query parameters appended to every submission.
    pub query: BTreeMap<String, String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_RELAY_URL.into(),
            query: BTreeMap::from([
                ("sender".to_string(), "blog example".to_string()),
                ("title".to_string(), "blogger stuff".to_string()),
            ]),
        }
    }
}
