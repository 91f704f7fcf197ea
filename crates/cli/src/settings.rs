//! Effective configuration: config file first, then flags and environment.

use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    regina_config::ReginaConfig,
    secrecy::Secret,
    tracing::debug,
};

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub token: Option<String>,
    pub name: Option<String>,
    pub db_path: Option<PathBuf>,
}

/// Load the config file (explicit path, or discovered) and apply overrides.
///
/// An explicit path that cannot be loaded is an error; a discovered file that
/// fails to load falls back to defaults.
pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<ReginaConfig> {
    let config = match config_path {
        Some(path) => regina_config::load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => regina_config::discover_and_load(),
    };
    Ok(apply(config, overrides))
}

pub fn apply(mut config: ReginaConfig, overrides: Overrides) -> ReginaConfig {
    if let Some(token) = overrides.token.filter(|t| !t.trim().is_empty()) {
        debug!("slack token taken from command line or environment");
        config.slack.token = Secret::new(token);
    }
    if let Some(name) = overrides.name.filter(|n| !n.trim().is_empty()) {
        config.bot.name = name;
    }
    if let Some(path) = overrides.db_path {
        config.store.path = Some(path);
    }
    config
}

/// Copy of `config` that is safe to print.
pub fn redacted(config: &ReginaConfig) -> ReginaConfig {
    let mut shown = config.clone();
    if shown.slack.has_token() {
        shown.slack.token = Secret::new("[REDACTED]".into());
    }
    shown
}
