//! # hn_frontpage
//!
//! Refresh the front-page dataset once and exit.
//!
//! ## Usage
//!
//! ```sh
//! hn_frontpage                      # defaults, writes ./data.json
//! hn_frontpage -c frontpage.yaml    # settings from a YAML file
//! RUST_LOG=hn_frontpage=debug hn_frontpage
//! ```

use clap::Parser;
use hn_frontpage::cli::Cli;
use hn_frontpage::config::Config;
use hn_frontpage::pipeline;
use hn_frontpage::utils::ensure_writable_dir;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("hn_frontpage starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let base = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = args.apply(base);
    if let Err(e) = config.validate() {
        error!(error = %e, "Refusing to start with invalid configuration");
        return Err(e.into());
    }
    info!(
        base_url = %config.base_url,
        output = %config.output_path.display(),
        strategy = %config.strategy,
        "Configuration ready"
    );

    // Early check: the dataset directory must be writable before we walk anything
    let output_dir = config
        .output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let summary = match pipeline::run(&config).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Pipeline run failed; dataset left unchanged");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        pages = summary.pages_fetched,
        records = summary.records,
        "Execution complete"
    );

    Ok(())
}
