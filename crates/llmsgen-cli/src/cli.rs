//! # CLI Structure and Argument Parsing
//!
//! `llmsgen` has a single mode of operation: read the configuration, process
//! the sitemap, and write `llms.txt`. Flags only adjust that run.
//!
//! ```bash
//! # Use ./llmsgen.toml
//! llmsgen
//!
//! # Explicit config, first 20 URLs, ignore the cache
//! llmsgen --config /etc/llmsgen/site.toml --limit 20 --max-age-days 0
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Command-line interface for `llmsgen`
#[derive(Parser, Clone, Debug)]
#[command(name = "llmsgen")]
#[command(version)]
#[command(about = "llmsgen - Generate llms.txt from a site's sitemap", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(
        short = 'c',
        long,
        value_name = "PATH",
        env = "LLMSGEN_CONFIG",
        default_value = "llmsgen.toml"
    )]
    pub config: PathBuf,

    /// Process at most this many sitemap URLs
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Override `cache_max_age_days` (0 disables the cache)
    #[arg(long, value_name = "DAYS")]
    pub max_age_days: Option<u32>,

    /// Log debug details
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}
