//! Concierge Control - CLI client for the concierge engine
//!
//! Everything runs in-process: the knowledge base comes from config, and the
//! auth, catalog and order collaborators are local fixtures.

mod cli;
mod output;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use concierge_common::{
    Concierge, ConciergeConfig, InMemoryOrders, Matcher, Session, StaticAuth, StaticCatalog,
};
use owo_colors::OwoColorize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CONCIERGE_LOG";

/// Vendor fixture used when no catalog file is configured
const DEMO_CATALOG: &str = include_str!("../data/catalog.json");

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_engine(config: &ConciergeConfig) -> Result<Concierge> {
    let knowledge = config
        .knowledge_base()
        .context("Failed to load knowledge sources")?;

    let auth = match &config.session.actor {
        Some(actor) => StaticAuth::signed_in(actor),
        None => StaticAuth::anonymous(),
    };

    let catalog = match &config.catalog.path {
        Some(path) => StaticCatalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => StaticCatalog::from_json(DEMO_CATALOG).context("Bundled catalog is invalid")?,
    };

    info!(
        "Engine ready: {} intents, signed in: {}",
        knowledge.len(),
        config.session.actor.is_some()
    );

    Ok(Concierge::new(
        Matcher::new(knowledge),
        config.synonym_table(),
        Arc::new(auth),
        Arc::new(catalog),
        Arc::new(InMemoryOrders::new()),
    ))
}

fn print_intents(engine: &Concierge) {
    let knowledge = engine.matcher().knowledge();
    for source in knowledge.sources() {
        println!("{} ({} intents)", source.name.bold(), source.count);
    }
    println!();
    for (i, item) in knowledge.items().iter().enumerate() {
        match item.route() {
            Some(route) => println!("{:>3}. {}  {}", i + 1, item.display_name(), route.cyan()),
            None => println!("{:>3}. {}", i + 1, item.display_name()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ConciergeConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let show_scores = cli.show_scores || config.dev.show_scores;
    let engine = build_engine(&config)?;

    match cli.command {
        Some(Commands::Ask { utterance, json }) => {
            let session = Session::new();
            let response = engine.submit(&session, &utterance.join(" ")).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                output::display_response(&response, show_scores);
            }
        }
        Some(Commands::Suggest { query, top }) => {
            let n = top.unwrap_or(config.dev.suggestions);
            output::display_suggestions(&engine.suggest(&query.join(" "), n), show_scores);
        }
        Some(Commands::Intents) => print_intents(&engine),
        Some(Commands::Chat) | None => repl::start_repl(&engine, show_scores).await?,
    }

    Ok(())
}
