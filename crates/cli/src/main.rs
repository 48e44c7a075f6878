//! readthru CLI.
//!
//! Provides commands for:
//! - `generate`: Replace the collection with synthetic seasons
//! - `demo`: Time the sample queries before and after an invalidation (default)
//! - `invalidate`: Flush the cache
//! - `query`: Run one filter through the cache

mod commands;

use clap::{Parser, Subcommand};
use readthru_client::Services;
use readthru_core::AppConfig;
use tracing_subscriber::EnvFilter;

use commands::{DemoArgs, GenerateArgs, QueryArgs};

/// readthru - read-through cache in front of a document store.
#[derive(Parser)]
#[command(name = "readthru", version, about)]
struct Cli {
    /// Log at debug level instead of RUST_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the collection with synthetic seasons and invalidate the cache.
    Generate(GenerateArgs),
    /// Run the sample queries twice, before and after an invalidation.
    Demo(DemoArgs),
    /// Flush every cached query result.
    Invalidate,
    /// Run one filter through the cache and print the result.
    Query(QueryArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::from_default_env() };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load()?;
    let services = Services::open(config).await?;

    let result = match cli.command.unwrap_or(Commands::Demo(DemoArgs::default())) {
        Commands::Generate(args) => args.execute(&services).await,
        Commands::Demo(args) => args.execute(&services).await,
        Commands::Invalidate => commands::invalidate(&services).await,
        Commands::Query(args) => args.execute(&services).await,
    };

    services.close().await?;
    result
}
