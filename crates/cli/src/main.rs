mod config_commands;
mod db_commands;
mod jokes_commands;
mod settings;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    regina_config::ReginaConfig,
    regina_responder::{DisabledLinkRelay, HttpLinkRelay, LinkRelay, Responder},
    regina_slack::SlackTransport,
    regina_store::SqliteStore,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "regina", version, about = "Regina: jokes and link filing for Slack")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Slack bot token (overrides config value).
    #[arg(long, global = true, env = "REGINA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Bot name; must match the bot's Slack user name (overrides config value).
    #[arg(long, global = true, env = "REGINA_NAME")]
    name: Option<String>,

    /// Path to the joke database (default: data/<name>.db).
    #[arg(long, global = true, env = "REGINA_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Config file to load instead of searching the standard locations.
    #[arg(long, global = true, env = "REGINA_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Slack and start responding (default when no subcommand is provided).
    Run,
    /// Database management.
    Db {
        #[command(subcommand)]
        action: db_commands::DbAction,
    },
    /// Joke catalogue management.
    Jokes {
        #[command(subcommand)]
        action: jokes_commands::JokesAction,
    },
    /// Configuration inspection.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let overrides = settings::Overrides {
        token: cli
            .token
            .clone()
            .or_else(|| std::env::var("SLACK_TOKEN").ok()),
        name: cli.name.clone(),
        db_path: cli.db_path.clone(),
    };
    let config = settings::load(cli.config.as_deref(), overrides)?;

    match cli.command {
        None | Some(Commands::Run) => run(config).await,
        Some(Commands::Db { action }) => db_commands::handle_db(action, &config.store_path()).await,
        Some(Commands::Jokes { action }) => {
            jokes_commands::handle_jokes(action, &config.store_path()).await
        },
        Some(Commands::Config { action }) => {
            config_commands::handle_config(action, &config, cli.config.as_deref())
        },
    }
}

async fn run(config: ReginaConfig) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), name = %config.bot.name, "regina starting");

    let validation = regina_config::validate(&config);
    for d in &validation.diagnostics {
        warn!(path = %d.path, "{}", d.message);
    }
    anyhow::ensure!(
        !validation.has_errors(),
        "invalid configuration; run `regina config check` for details"
    );

    let db_path = config.store_path();
    let store = Arc::new(
        SqliteStore::open(&db_path)
            .await
            .with_context(|| format!("cannot start without the joke database ({})", db_path.display()))?,
    );

    let relay: Arc<dyn LinkRelay> = if config.relay.enabled {
        Arc::new(HttpLinkRelay::new(&config.relay))
    } else {
        info!("link relay disabled");
        Arc::new(DisabledLinkRelay)
    };

    let transport = Arc::new(SlackTransport::new(&config.slack));
    let responder =
        Arc::new(Responder::new(&config.bot, transport.clone(), store).with_relay(relay));

    tokio::select! {
        result = regina_slack::run(transport, responder) => {
            result.context("slack connection failed")?;
        },
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl-c, shutting down");
        },
    }
    Ok(())
}
