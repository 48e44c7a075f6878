//! Subcommand implementations.

use std::time::Instant;

use anyhow::{Result, bail};
use clap::Args;
use readthru_client::Services;
use readthru_core::{Error, Filter, Lookup};

/// Arguments for `generate`.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Number of seasons (defaults to the configured value).
    #[arg(long)]
    pub seasons: Option<u32>,
}

impl GenerateArgs {
    pub async fn execute(self, services: &Services) -> Result<()> {
        let seasons = self.seasons.unwrap_or(services.config.seasons);
        if seasons == 0 || seasons > 1000 {
            bail!("--seasons must be between 1 and 1000, got {seasons}");
        }

        let report = services.regenerate(seasons).await?;
        println!(
            "generated {} seasons ({} fixtures each), replaced {} documents, invalidated {} cache entries",
            report.inserted,
            services.generator.fixtures_per_season(),
            report.deleted,
            report.invalidated
        );
        Ok(())
    }
}

/// Arguments for `demo`.
#[derive(Args, Debug, Default)]
pub struct DemoArgs {
    /// Flush the cache before the first pass.
    #[arg(long)]
    pub invalidate_first: bool,
}

/// Season 2, and every season with a pitch invasion.
fn demo_queries() -> [Filter; 2] {
    [Filter::eq("Season", 2), Filter::eq("Fixtures.Special", "Pitch Invasion")]
}

impl DemoArgs {
    pub async fn execute(self, services: &Services) -> Result<()> {
        if self.invalidate_first {
            services.invalidator.invalidate_cache().await?;
        }

        let queries = demo_queries();
        run_pass(services, &queries, "first pass").await?;

        println!("Invalidating cache and repeating queries...");
        services.invalidator.invalidate_cache().await?;

        run_pass(services, &queries, "after invalidation").await
    }
}

async fn run_pass(services: &Services, queries: &[Filter], label: &str) -> Result<()> {
    let start = Instant::now();
    let mut lookups: Vec<Lookup> = Vec::with_capacity(queries.len());
    for filter in queries {
        lookups.push(services.retriever.retrieve(filter).await?);
    }
    let elapsed = start.elapsed();

    for lookup in &lookups {
        println!("{}", lookup.document.to_json()?);
    }

    let hits = lookups.iter().filter(|l| l.cache_hit).count();
    println!("{label}: {} queries in {elapsed:?} ({hits} cache hits)", lookups.len());
    Ok(())
}

/// `invalidate`.
pub async fn invalidate(services: &Services) -> Result<()> {
    let removed = services.invalidator.invalidate_cache().await?;
    println!("invalidated {removed} cache entries");
    Ok(())
}

/// Arguments for `query`.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Filter as JSON, e.g. '{"eq":{"field":"Season","value":2}}'.
    pub filter: String,

    /// Pretty-print the result.
    #[arg(long)]
    pub pretty: bool,
}

impl QueryArgs {
    pub async fn execute(self, services: &Services) -> Result<()> {
        let filter = parse_filter(&self.filter)?;
        let lookup = services.retriever.retrieve(&filter).await?;

        let json = if self.pretty { lookup.document.to_json_pretty()? } else { lookup.document.to_json()? };
        println!("{json}");
        tracing::info!(key = %lookup.key, cache_hit = lookup.cache_hit, results = lookup.document.len(), "query done");
        Ok(())
    }
}

fn parse_filter(raw: &str) -> Result<Filter, Error> {
    serde_json::from_str(raw).map_err(|e| Error::InvalidInput(format!("invalid filter: {e}")))
}
