//! # CLI Structure and Argument Parsing
//!
//! ```bash
//! # Build the catalog (cache first, network otherwise)
//! cardex acquire
//! cardex acquire --refresh
//!
//! # Re-crawl the pack directory only
//! cardex crawl
//!
//! # Search
//! cardex search blue eyes white dragon
//! cardex search --multi "dragon #dark#" --format json
//!
//! # Remove the card cache
//! cardex clear-cache
//! ```

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `cardex` command
#[derive(Parser, Clone, Debug)]
#[command(name = "cardex")]
#[command(version)]
#[command(about = "cardex - Trading-card catalog harvester and fuzzy search", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (defaults to CARDEX_CONFIG or the platform config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Load the catalog from cache, or harvest it from the card database
    Acquire {
        /// Delete the cache first and harvest from the network
        #[arg(long)]
        refresh: bool,
    },

    /// Crawl the pack directory and rewrite the pack list
    Crawl,

    /// Fuzzy-search the catalog
    Search {
        /// Search query; wrap a word in `#...#` to require it in multi mode
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,

        /// Return every match above the multi-match cutoff instead of the best one
        #[arg(short = 'm', long)]
        multi: bool,

        /// Cap the number of ranked matches in multi mode
        #[arg(short = 'n', long, value_name = "N")]
        limit: Option<usize>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Delete the card cache
    #[command(name = "clear-cache")]
    ClearCache,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_joins_trailing_words() {
        let cli = Cli::parse_from(["cardex", "search", "--multi", "dark", "magician", "#dark#"]);
        match cli.command {
            Commands::Search { query, multi, .. } => {
                assert!(multi);
                assert_eq!(query.join(" "), "dark magician #dark#");
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["cardex", "-v", "-q", "crawl"]).is_err());
    }
}
