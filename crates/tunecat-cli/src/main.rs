//! `tunecat`: extract, clean and load an iTunes music catalog.
//!
//! # Usage
//!
//! ```text
//! tunecat scrape                # today's batch of search terms → data/raw
//! tunecat transform             # raw CSVs → data/clean snapshots
//! tunecat load                  # snapshots → SQLite
//! tunecat run                   # transform + load
//! tunecat report                # null report and statistics of the master table
//! tunecat --config other.toml run
//! ```

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tunecat_transform::load::LoadSummary;

use crate::config::PipelineConfig;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tunecat", author, version, about = "iTunes catalog ETL")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "tunecat.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Query the search API for the next batch of unused terms.
  Scrape,
  /// Clean the raw files and write the master and table snapshots.
  Transform,
  /// Load the table snapshots into the SQLite store.
  Load,
  /// Transform, then load.
  Run,
  /// Print the null report and numeric statistics of the master snapshot.
  Report,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = PipelineConfig::load(&cli.config)?;

  match cli.command {
    Command::Scrape => {
      let outcome = commands::scrape(&cfg).await?;
      match outcome.file {
        Some(file) => println!(
          "{} records from {}/{} terms → {}",
          outcome.records,
          outcome.terms_with_results,
          outcome.terms_tried,
          file.display()
        ),
        None => println!("nothing written ({} terms tried)", outcome.terms_tried),
      }
    }
    Command::Transform => {
      let tables = commands::transform(&cfg)?;
      println!(
        "artists={} albums={} tracks={} genres={} track_prices={} album_prices={} → {}",
        tables.artists.len(),
        tables.albums.len(),
        tables.tracks.len(),
        tables.genres.len(),
        tables.track_prices.len(),
        tables.album_prices.len(),
        cfg.paths.snapshot_dir.display()
      );
    }
    Command::Load => print_load(&commands::load(&cfg).await?),
    Command::Run => print_load(&commands::run(&cfg).await?),
    Command::Report => print!("{}", commands::report(&cfg)?),
  }

  Ok(())
}

fn print_load(summary: &LoadSummary) {
  println!(
    "inserted: genre={} artist={} album={} track={} track_prices={} album_prices={}",
    summary.genres,
    summary.artists,
    summary.albums,
    summary.tracks,
    summary.track_prices,
    summary.album_prices
  );
}
