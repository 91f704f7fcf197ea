//! First-run detection and the welcome post.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use {
    chrono::{SecondsFormat, Utc},
    regina_channels::{ChatTransport, PostOptions},
    regina_store::RunInfoStore,
    tracing::{info, warn},
};

use crate::{Error, Result};

/// Invocation hint appended to the welcome post.
const ABOUT_PHRASE: &str = "aap kaun hain ji";

/// Welcome post sent on the very first run.
pub fn welcome_text(name: &str, trigger_phrase: &str) -> String {
    format!(
        "Hi guys, my name is {name}\n I can tell jokes. Just say `{trigger_phrase}` or `{name}` to invoke me! To know what else I do, say `{ABOUT_PHRASE}`"
    )
}

/// Current time as an RFC 3339 UTC timestamp with milliseconds.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Outcome of a bootstrap pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No last-run record existed; the welcome was posted.
    FirstRun,
    /// A last-run record existed and was refreshed.
    Resumed,
    /// The store could not be read or written.
    Failed,
    /// Bootstrap already ran in this process.
    AlreadyChecked,
}

/// Runs the last-run check once per process.
pub struct BootstrapSequencer {
    store: Arc<dyn RunInfoStore>,
    transport: Arc<dyn ChatTransport>,
    name: String,
    trigger_phrase: String,
    checked: AtomicBool,
}

impl BootstrapSequencer {
    pub fn new(
        store: Arc<dyn RunInfoStore>,
        transport: Arc<dyn ChatTransport>,
        name: impl Into<String>,
        trigger_phrase: impl Into<String>,
    ) -> Self {
        Self {
            store,
            transport,
            name: name.into(),
            trigger_phrase: trigger_phrase.into(),
            checked: AtomicBool::new(false),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::SeqCst)
    }

    /// Check the last-run record, welcoming the workspace on a first run.
    ///
    /// Later calls are no-ops. Failures are logged and leave the sequencer
    /// checked.
    pub async fn run(&self) -> BootstrapOutcome {
        if self.checked.swap(true, Ordering::SeqCst) {
            return BootstrapOutcome::AlreadyChecked;
        }
        match self.check().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "first-run check failed");
                BootstrapOutcome::Failed
            },
        }
    }

    async fn check(&self) -> Result<BootstrapOutcome> {
        let now = now_timestamp();
        if let Some(info) = self.store.get_run_info().await? {
            info!(last_run = %info.last_run, "resuming");
            self.store.update_run_info(&now).await?;
            return Ok(BootstrapOutcome::Resumed);
        }

        info!("first run, posting welcome message");
        self.post_welcome().await;
        self.store.insert_run_info(&now).await?;
        Ok(BootstrapOutcome::FirstRun)
    }

    async fn post_welcome(&self) {
        let Some(channel) = self.transport.first_channel() else {
            warn!(error = %Error::NoChannel, "welcome message not sent");
            return;
        };
        let text = welcome_text(&self.name, &self.trigger_phrase);
        if let Err(e) = self
            .transport
            .post_text(&channel, &text, PostOptions::default())
            .await
        {
            warn!(channel = %channel.name, error = %e, "failed to post welcome message");
        }
    }
}
