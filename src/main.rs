//! open-space - schedules the topics of an open space session.
//!
//! Reads a session document, places its topics into (slot, room) cells,
//! and prints the optimized session together with the emitted events.
//!
//! # Usage
//!
//! ```text
//! open-space session.json --optimise-unassigned
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use open_space::adapters::{InMemoryEventBus, InMemorySessionRepository};
use open_space::application::{OptimizeTopicsCommand, OptimizeTopicsHandler};
use open_space::config::{AppConfig, LoggingConfig};
use open_space::domain::foundation::CommandMetadata;
use open_space::domain::scheduling::OptimiseTopicsConfig;
use open_space::domain::session::Session;

#[derive(Parser)]
#[command(name = "open-space", about = "Open space topic scheduler")]
struct Cli {
    /// Session document (JSON).
    session: PathBuf,

    /// Also place topics that have no room or slot yet.
    #[arg(long)]
    optimise_unassigned: bool,

    /// Skip the owner double-booking repair.
    #[arg(long)]
    no_rectify: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    init_tracing(&config.logging);

    let cli = Cli::parse();
    let optimizer: OptimiseTopicsConfig = config.optimizer.into();
    let options = OptimiseTopicsConfig {
        optimise_unassigned_topics: optimizer.optimise_unassigned_topics || cli.optimise_unassigned,
        rectify_conflicts: optimizer.rectify_conflicts && !cli.no_rectify,
    };

    let document = std::fs::read_to_string(&cli.session)
        .with_context(|| format!("reading {}", cli.session.display()))?;
    let session: Session = serde_json::from_str(&document)
        .with_context(|| format!("parsing {}", cli.session.display()))?;
    let session_id = *session.id();
    info!(
        session = %session_id,
        topics = session.topics().len(),
        rooms = session.rooms().len(),
        slots = session.slots().len(),
        "loaded session"
    );

    let repository = Arc::new(InMemorySessionRepository::with_sessions([session]));
    let bus = Arc::new(InMemoryEventBus::new());
    let handler = OptimizeTopicsHandler::new(repository, bus.clone());

    let result = handler
        .handle(
            OptimizeTopicsCommand {
                session_id,
                config: options,
            },
            CommandMetadata::new(),
        )
        .await?;

    let output = json!({
        "session": result.session,
        "events": bus.published_events(),
        "unplaced": result.unplaced,
        "unresolved": result.unresolved,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
