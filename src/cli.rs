//! Command-line interface definitions.
//!
//! Running without arguments performs one full refresh with the built-in
//! defaults. Every flag is optional and overrides the matching value from the
//! configuration file.

use crate::config::{Config, Strategy};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # One run with defaults, writes ./data.json
/// hn_frontpage
///
/// # Settings from a file, dataset somewhere else
/// hn_frontpage -c frontpage.yaml -o /srv/api/data.json
///
/// # Fetch the first 14 pages four at a time
/// hn_frontpage -s parallel --parallel-pages 14
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the JSON dataset
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page walking strategy: `sequential` or `parallel`
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// Number of pages fetched by the parallel strategy
    #[arg(long)]
    pub parallel_pages: Option<u32>,
}

impl Cli {
    /// Apply flag overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(pages) = self.parallel_pages {
            config.parallel_pages = pages;
        }
        config
    }
}
