//! # Output Formatting
//!
//! - [`progress`]: acquisition progress bar
//! - [`search`]: search result rendering (text or JSON)

pub mod progress;
pub mod search;

use clap::ValueEnum;

/// Output format for search results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable card blocks with highlighted query terms
    #[default]
    Text,
    /// A single JSON document
    Json,
}
