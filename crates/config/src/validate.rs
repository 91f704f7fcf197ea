//! Semantic checks on a loaded configuration.

use crate::schema::ReginaConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "relay.url"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn error(path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    fn warning(path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Check a configuration for values the bot cannot run with.
#[must_use]
pub fn validate(config: &ReginaConfig) -> ValidationResult {
    let mut diagnostics = Vec::new();

    if !config.slack.has_token() {
        diagnostics.push(Diagnostic::error("slack.token", "a bot API token is required"));
    }
    if config.bot.name.trim().is_empty() {
        diagnostics.push(Diagnostic::error("bot.name", "must not be empty"));
    }
    if config.bot.trigger_phrase.trim().is_empty() {
        diagnostics.push(Diagnostic::error(
            "bot.trigger_phrase",
            "must not be empty (it would match every message)",
        ));
    }
    if let Some(id) = &config.bot.mention_id
        && (id.is_empty() || !id.starts_with(['U', 'W']))
    {
        diagnostics.push(Diagnostic::warning(
            "bot.mention_id",
            format!("\"{id}\" does not look like a user id"),
        ));
    }
    if let Err(e) = url::Url::parse(&config.slack.api_base) {
        diagnostics.push(Diagnostic::error("slack.api_base", format!("invalid URL: {e}")));
    }
    if config.relay.enabled {
        match url::Url::parse(&config.relay.url) {
            Ok(url) if url.scheme() != "https" => diagnostics.push(Diagnostic::warning(
                "relay.url",
                "links are relayed over plain HTTP",
            )),
            Ok(_) => {},
            Err(e) => {
                diagnostics.push(Diagnostic::error("relay.url", format!("invalid URL: {e}")))
            },
        }
    }

    ValidationResult { diagnostics }
}
