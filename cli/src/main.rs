//! CLI entrypoint for chorus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use chorus_application::{
    ChatController, ConversationLogger, InMemoryKeyValueStore, KeyValueStore,
    NoConversationLogger,
};
use chorus_domain::{ProviderCatalog, SendMode, SessionSeed, SessionStore};
use chorus_infrastructure::{
    ConfigLoader, FileConfig, FileKeyValueStore, JsonlConversationLogger, ReqwestTransport,
    build_registry,
};
use chorus_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputConfig, ReplConfig, SimpleProgress,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting chorus");

    // === Dependency Injection ===
    let key_store = open_key_store(&cli, &config)?;
    let logger = open_transcript(&config);
    let registry = build_registry(
        &config.sanitized_providers(),
        Arc::new(ReqwestTransport::new()),
    );

    let seeds: Vec<SessionSeed> = if cli.sessions.is_empty() {
        config.sessions.seeds()
    } else {
        cli.sessions.iter().map(|s| SessionSeed::parse(s)).collect()
    };
    let (store, seed_errors) = SessionStore::with_seeds(ProviderCatalog::default(), &seeds);
    for error in seed_errors {
        warn!("Skipping session: {}", error);
    }

    let mode = if cli.broadcast {
        SendMode::Broadcast
    } else {
        SendMode::Individual
    };
    let controller = ChatController::with_options(
        registry,
        store,
        key_store,
        config.request.to_behavior(),
        logger,
    )
    .with_send_mode(mode);

    // One-shot mode: broadcast once and exit
    if let Some(message) = cli.message {
        let sessions = controller.sessions();
        let report = if cli.quiet {
            controller.broadcast_message(&message).await
        } else {
            let progress = SimpleProgress::new(&sessions);
            controller.broadcast_with_progress(&message, &progress).await
        };

        println!(
            "{}",
            ConsoleFormatter::format_report(&report, &controller.sessions())
        );

        if report.completed() == 0 && report.failed() > 0 {
            bail!("No session produced a reply");
        }
        return Ok(());
    }

    let output = OutputConfig {
        color: config.output.color,
        show_progress: config.output.show_progress && !cli.quiet,
    };
    let repl_config = ReplConfig {
        history_file: config.repl.history_path(),
    };
    let mut repl = ChatRepl::new(controller)
        .with_output(output)
        .with_repl_config(repl_config);
    repl.run().await?;

    Ok(())
}

/// File-backed key store unless persistence is off.
fn open_key_store(cli: &Cli, config: &FileConfig) -> Result<Arc<dyn KeyValueStore>> {
    let path = if cli.no_persist {
        None
    } else {
        config.credentials.store_path()
    };

    match path {
        Some(path) => {
            let store = FileKeyValueStore::open(path.clone())
                .with_context(|| format!("Failed to open key store {}", path.display()))?;
            info!("Key store: {}", path.display());
            Ok(Arc::new(store))
        }
        None => {
            info!("Key store: in memory");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
    }
}

fn open_transcript(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    match config
        .logging
        .transcript
        .as_ref()
        .and_then(JsonlConversationLogger::new)
    {
        Some(logger) => {
            info!("Transcript: {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}
