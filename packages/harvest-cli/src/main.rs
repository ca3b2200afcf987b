//! Grant harvester command line
//!
//! `harvest extract` turns one saved HTML page into a grant record;
//! `harvest discover` searches for candidate funding sources. Results are
//! printed to stdout as JSON, logs go to stderr.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use grant_harvester::{
    persist_all, AiExtractor, DiscoveryOrchestrator, DiscoveryRequest, ExtractionOrchestrator,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const HTML_CHARS: (usize, usize) = (100, 1_000_000);
const MAX_RESULTS: (usize, usize) = (1, 100);

#[derive(Parser)]
#[command(name = "harvest", version, about = "Extract grant records and discover funding sources")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a grant record from a saved HTML page
    Extract {
        /// HTML file to read
        #[arg(long)]
        file: PathBuf,

        /// URL the page was fetched from
        #[arg(long)]
        url: String,

        /// Human-readable source name (e.g. "BOE")
        #[arg(long)]
        source: String,
    },

    /// Discover candidate funding sources
    Discover {
        /// espana, europa or internacional
        #[arg(long, default_value = "europa")]
        scope: String,

        /// Region refinement; repeat for several regions
        #[arg(long = "region")]
        regions: Vec<String>,

        #[arg(long, default_value_t = 20)]
        max_results: usize,

        /// Score with the keyword heuristic only
        #[arg(long)]
        no_ai_validation: bool,

        /// Keep only government and official domains
        #[arg(long)]
        domain_filter: bool,

        /// Push discovered sources to the backend
        #[arg(long)]
        auto_save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grant_harvester=info,harvest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Extract { file, url, source } => extract(&config, file, url, source).await,
        Command::Discover {
            scope,
            regions,
            max_results,
            no_ai_validation,
            domain_filter,
            auto_save,
        } => {
            let request = DiscoveryRequest::new(scope)
                .with_regions(regions)
                .with_max_results(max_results)
                .with_ai_validation(!no_ai_validation)
                .with_domain_filter(domain_filter);
            discover(&config, request, auto_save).await
        }
    }
}

async fn extract(config: &Config, file: PathBuf, url: String, source: String) -> Result<()> {
    let html = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    check_html_len(&html)?;

    let ai = config.generator().map(AiExtractor::new);
    if ai.is_none() {
        tracing::info!("GEMINI_API_KEY not set, using heuristic extraction only");
    }

    let outcome = ExtractionOrchestrator::new(ai)
        .extract(&html, &url, &source)
        .await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(reason) = outcome.reason() {
        bail!("{}", reason);
    }
    Ok(())
}

async fn discover(config: &Config, request: DiscoveryRequest, auto_save: bool) -> Result<()> {
    check_max_results(request.max_results)?;

    let mut orchestrator = DiscoveryOrchestrator::new(Arc::new(config.searcher()?));
    if request.use_ai_validation {
        match config.generator() {
            Some(generator) => orchestrator = orchestrator.with_validator(generator),
            None => tracing::info!("GEMINI_API_KEY not set, using heuristic scoring"),
        }
    }

    let sources = orchestrator.discover(&request).await;
    let saved = if auto_save {
        persist_all(&config.backend(), &sources).await
    } else {
        0
    };

    let output = serde_json::json!({
        "scope": request.scope,
        "total": sources.len(),
        "saved": saved,
        "sources": sources,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn check_html_len(html: &str) -> Result<()> {
    let chars = html.chars().count();
    ensure!(
        (HTML_CHARS.0..=HTML_CHARS.1).contains(&chars),
        "html must be {}..={} characters, got {}",
        HTML_CHARS.0,
        HTML_CHARS.1,
        chars
    );
    Ok(())
}

fn check_max_results(max_results: usize) -> Result<()> {
    ensure!(
        (MAX_RESULTS.0..=MAX_RESULTS.1).contains(&max_results),
        "max-results must be {}..={}, got {}",
        MAX_RESULTS.0,
        MAX_RESULTS.1,
        max_results
    );
    Ok(())
}
