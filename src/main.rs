//! `vuz-ratings` — load a monthly university ratings snapshot and print the ranking.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Resolve the data location ([`fetch::Fetcher::from_source`]).
//! 3. Load config ([`config::load_config`]).
//! 4. Load and normalize the snapshot ([`loader::load`]): allow-list first, then
//!    the preferred source format ([`source`]) with one fallback.
//! 5. Optionally export the normalized dataset (`--export-json`, [`export`]).
//! 6. Filter and rank the selected month ([`rank`]).
//! 7. Present and render the report ([`report`]).
//! 8. Exit `0`, or `1` when nothing could be loaded.

mod cli;
mod collate;
mod config;
mod error;
mod export;
mod fetch;
mod loader;
mod models;
mod normalize;
mod rank;
mod report;
mod source;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, ReportFormat};
use config::load_config;
use fetch::{Fetch, Fetcher};
use models::Selection;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let fetcher = Fetcher::from_source(&cli.source)?;

    // Config lives next to local data; for remote data look in the working directory.
    let base = fetcher
        .local_root()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(&base, cli.config.as_deref())?;

    let spinner = spinner(cli.quiet)?;
    let loaded = loader::load(&fetcher, &config).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let dataset = match loaded {
        Ok(dataset) => dataset,
        Err(err) => {
            tracing::error!(error = %err, "failed to load ratings");
            eprintln!(" {} {}", "✗".red(), report::failure_message(fetcher.is_local()));
            std::process::exit(1);
        }
    };

    if let Some(path) = &cli.export_json {
        export::write_json(&dataset, path)?;
        if !cli.quiet {
            eprintln!("  {} ratings written to {}", "→".cyan(), path.display());
        }
        return Ok(());
    }

    let category = cli
        .category
        .clone()
        .unwrap_or_else(|| config.defaults.category.clone());
    if config.category(&category).is_none() {
        tracing::warn!(%category, "unknown category; every score will read as missing");
    }

    let default_month = if config.current_month < dataset.months.len() {
        config.current_month
    } else {
        0
    };
    let selection = Selection {
        category,
        limit: cli.limit.unwrap_or(config.defaults.limit),
        query: cli.query.trim().to_string(),
        month: rank::month_for(&dataset, cli.month, default_month),
    };
    tracing::debug!(
        category = %selection.category,
        limit = %selection.limit,
        month = selection.month,
        query = %selection.query,
        "selection"
    );

    let month = rank::resolve_month(&dataset, &selection, default_month);
    let ranking = rank::view(&dataset, &selection, default_month);
    let view = report::present(&config, &dataset, month, &selection.category, &ranking);

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&view, cli.quiet)?,
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose` → debug, `--quiet` → error, default warn.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn spinner(quiet: bool) -> Result<Option<ProgressBar>> {
    if quiet {
        return Ok(None);
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Loading ratings…");
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(Some(pb))
}
