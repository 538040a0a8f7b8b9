//! mnemos - project-memory assistant CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{decision, query, stats, track};

/// mnemos - persistent project memory and context recall
#[derive(Parser)]
#[command(name = "mnemos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, env = "MNEMOS_PROJECT_DIR")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Retrieve context relevant to a query
    Query(query::QueryArgs),

    /// Record a decision with its options and rationale
    StoreDecision(decision::DecisionArgs),

    /// Log a conversation exchange
    Track(track::TrackArgs),

    /// Show memory store statistics
    Stats(stats::StatsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "mnemos=debug,mnemos_store=debug,mnemos_context=debug,info"
    } else {
        "mnemos=info,mnemos_store=info,mnemos_context=info,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(cli.verbose)
        .init();

    let project = match &cli.project {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let ctx = commands::Context {
        project,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Query(args) => query::run(args, &ctx).await,
        Commands::StoreDecision(args) => decision::run(args, &ctx),
        Commands::Track(args) => track::run(args, &ctx),
        Commands::Stats(args) => stats::run(args, &ctx),
    }
}
