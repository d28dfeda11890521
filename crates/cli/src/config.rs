//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use copurchase_observability::LogFormat;

/// Group-purchase order reconciler.
#[derive(Parser, Debug)]
#[command(name = "copurchase")]
#[command(about = "Reconcile pasted group-purchase orders against supplier price lists")]
#[command(version)]
pub struct Cli {
    /// Directory holding the supplier price files (.csv / .txt)
    #[arg(long, global = true, default_value = "prices", env = "COPURCHASE_PRICES_DIR")]
    pub prices_dir: PathBuf,

    /// Markup applied to displayed totals when `--markup` is given
    #[arg(long, global = true, default_value_t = 13, env = "COPURCHASE_MARKUP_PERCENT")]
    pub markup_percent: u32,

    /// Log output format: text or json
    #[arg(long, global = true, default_value_t = LogFormat::Text, env = "COPURCHASE_LOG_FORMAT")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the price directory and list entries with per-file diagnostics
    Catalog {
        /// Print entries as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rank catalog entries against a product query
    Resolve {
        query: String,

        /// Maximum number of matches
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Parse pasted order text (a file, or `-` for stdin)
    Parse {
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Import blank-line-separated order blocks (first line = customer) and
    /// print the order and row summaries
    Reconcile {
        input: PathBuf,

        /// Include the markup in displayed totals
        #[arg(long)]
        markup: bool,

        /// Print the resulting session snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}
