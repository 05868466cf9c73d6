//! Logging initialization and color control.

use anyhow::Result;
use colored::control as color_control;
use is_terminal::IsTerminal;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormat;

/// Log level for the given flags: DEBUG with `--verbose`, ERROR with `--quiet`,
/// WARN otherwise. JSON output also drops to ERROR unless `--verbose` is set.
pub fn level_for(cli: &Cli) -> Level {
    if cli.verbose {
        return Level::DEBUG;
    }
    if cli.quiet || machine_output(cli) {
        return Level::ERROR;
    }
    Level::WARN
}

fn machine_output(cli: &Cli) -> bool {
    matches!(
        cli.command,
        Commands::Search {
            format: OutputFormat::Json,
            ..
        }
    )
}

/// Install the global tracing subscriber (stderr) and apply color overrides.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    if cli.no_color || env_no_color || machine_output(cli) {
        color_control::set_override(false);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(&Cli::parse_from(["cardex", "crawl"])), Level::WARN);
        assert_eq!(level_for(&Cli::parse_from(["cardex", "-v", "crawl"])), Level::DEBUG);
        assert_eq!(level_for(&Cli::parse_from(["cardex", "-q", "crawl"])), Level::ERROR);
    }

    #[test]
    fn test_json_search_is_quiet_unless_verbose() {
        let json = Cli::parse_from(["cardex", "search", "-f", "json", "kuriboh"]);
        assert_eq!(level_for(&json), Level::ERROR);

        let verbose = Cli::parse_from(["cardex", "-v", "search", "-f", "json", "kuriboh"]);
        assert_eq!(level_for(&verbose), Level::DEBUG);
    }
}
