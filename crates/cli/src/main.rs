//! Managed clusters onboarding tracker
//!
//! Audits which managed Kubernetes clusters have fully onboarded the runtime
//! agent, writes cluster and host CSV reports, and prints a coverage summary.

mod config;
mod output;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use onboard_lib::{CoverageSummary, Enricher, InventoryClient, RunLogger};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{AppConfig, LogFormat};
use crate::output::{print_info, print_success, print_summary, print_warning};

/// Managed clusters onboarding tracker
#[derive(Parser)]
#[command(name = "onboard-tracker")]
#[command(
    author,
    version,
    about = "Track runtime agent onboarding of managed Kubernetes clusters",
    long_about = "Fetches managed clusters from the cloud inventory, enriches them with agent \
                  and runtime-protection status, correlates inventory hosts with connected \
                  agents, and exports the results to CSV.\n\n\
                  Requires SECURE_API_TOKEN (and optionally API_URL) in the environment."
)]
pub struct Cli {
    /// Maximum number of clusters to fetch
    #[arg(long, default_value_t = 150)]
    pub limit: u32,

    /// Cluster filter passed verbatim to the API
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Connected status filter passed verbatim to the API
    #[arg(long, default_value = "")]
    pub connected: String,

    /// Cluster report file
    #[arg(long, short, default_value = "clusters.csv")]
    pub output: PathBuf,

    /// Host report file
    #[arg(long, default_value = "hosts.csv")]
    pub hosts_output: PathBuf,

    /// Host inventory page size
    #[arg(long, default_value_t = onboard_lib::inventory::DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Skip host inventory correlation
    #[arg(long)]
    pub skip_hosts: bool,

    /// Summary output format
    #[arg(long, short, value_enum, default_value = "table")]
    pub format: output::OutputFormat,
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let started = Instant::now();

    let config = AppConfig::load()?;
    init_tracing(&config);

    let logger = RunLogger::new(&config.service_name);
    logger.log_run_started(cli.limit, &cli.filter, &cli.connected);

    let client = InventoryClient::new(&config.api_url, &config.secure_api_token)?
        .with_retry_policy(config.retry_policy());
    let enricher = Enricher::new(Arc::new(client)).with_logger(logger.clone());

    let clusters = enricher
        .fetch_clusters(cli.limit, &cli.filter, &cli.connected)
        .await
        .context("error getting cluster data")?;

    let enriched = enricher
        .enrich_clusters(clusters)
        .await
        .context("error enriching cluster data")?;

    report::write_clusters(&cli.output, &enriched)?;
    print_success(&format!(
        "Wrote {} clusters to {}",
        enriched.len(),
        cli.output.display()
    ));

    let hosts = if cli.skip_hosts {
        print_warning("Host inventory correlation skipped");
        Vec::new()
    } else {
        let hosts = enricher
            .collect_hosts(cli.page_size)
            .await
            .context("error collecting host data")?;
        report::write_hosts(&cli.hosts_output, &hosts)?;
        print_success(&format!(
            "Wrote {} hosts to {}",
            hosts.len(),
            cli.hosts_output.display()
        ));
        hosts
    };

    let summary = CoverageSummary::from_results(&enriched, &hosts);
    print_summary(&summary, cli.format)?;

    let elapsed = started.elapsed();
    logger.log_run_completed(&summary, elapsed);
    print_info(&format!("Execution time: {:.2?}", elapsed));

    Ok(())
}
