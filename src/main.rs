//! # rootpack2csv
//!
//! A command-line tool for converting trees and graphs stored in Parquet
//! bundle containers to CSV files.
//!
//! ## Usage
//!
//! ```bash
//! # Convert one object
//! rootpack2csv -f run42.rootpack -t data/evt -o evt.csv
//!
//! # List the container inventory
//! rootpack2csv -f run42.rootpack --list
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rootpack::catalog;
use rootpack::config::Config;
use rootpack::container::bundle::Bundle;
use rootpack::convert::convert;

/// Convert trees and graphs from bundle containers to CSV files.
#[derive(Parser)]
#[command(name = "rootpack2csv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the input container (ZIP bundle, directory bundle, or bare Parquet file)
    #[arg(short, long)]
    file: PathBuf,

    /// Path to the output CSV file (default: output.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name or slash-delimited path of the tree or graph to convert (default: tree)
    #[arg(short, long)]
    tree: Option<String>,

    /// List available trees and graphs in the container
    #[arg(short, long)]
    list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Defaults resolve flag -> config file -> hard-coded fallback.
    let config = Config::load_default().context("failed to load configuration file")?;
    let output = cli
        .output
        .or(config.convert.output)
        .unwrap_or_else(|| PathBuf::from("output.csv"));
    let tree = cli
        .tree
        .or(config.convert.tree)
        .unwrap_or_else(|| "tree".to_string());

    let source_label = cli.file.display().to_string();
    info!("opening container '{source_label}'");
    let bundle = Bundle::open(&cli.file)
        .with_context(|| format!("failed to open container '{source_label}'"))?;

    if let Some(metadata) = bundle.metadata() {
        if let Some(source) = &metadata.source_file {
            info!("bundle produced from '{source}'");
        }
        if let Some(version) = &metadata.format_version {
            info!("bundle format version {version}");
        }
    }

    if cli.list {
        info!("listing available trees and graphs in '{source_label}'");
        let entries = catalog::list(bundle.root());
        if entries.is_empty() {
            println!("No objects found in '{source_label}'.");
        } else {
            for entry in &entries {
                println!("{} ({})", entry.path, entry.kind);
            }
        }
        return Ok(());
    }

    let kind = convert(bundle.root(), &source_label, &tree, &output)
        .with_context(|| format!("failed to convert object '{tree}'"))?;
    info!("converted {kind} '{tree}' to '{}'", output.display());

    Ok(())
}
