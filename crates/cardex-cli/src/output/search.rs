//! Search result rendering

use cardex_core::{Emphasis, SearchMatch, SearchResults, render_with_highlight};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// ANSI bold yellow, used when colors are enabled.
const TERMINAL_EMPHASIS: Emphasis<'static> = Emphasis {
    open: "\x1b[1;33m",
    close: "\x1b[0m",
};

#[derive(Serialize)]
struct JsonPayload<'a> {
    query: &'a str,
    mode: &'static str,
    elapsed_ms: u128,
    matches: &'a [SearchMatch],
}

/// Write results as one JSON document.
pub fn write_json<W: Write>(
    mut writer: W,
    query: &str,
    results: &SearchResults,
    elapsed: Duration,
) -> anyhow::Result<()> {
    let payload = JsonPayload {
        query,
        mode: match results {
            SearchResults::Single(_) => "single",
            SearchResults::Multiple(_) => "multiple",
        },
        elapsed_ms: elapsed.as_millis(),
        matches: results.matches(),
    };
    serde_json::to_writer_pretty(&mut writer, &payload)?;
    writeln!(writer)?;
    Ok(())
}

/// Write results as highlighted card blocks separated by blank lines.
pub fn write_text<W: Write>(
    mut writer: W,
    query: &str,
    results: &SearchResults,
    elapsed: Duration,
) -> anyhow::Result<()> {
    let emphasis = if colored::control::SHOULD_COLORIZE.should_colorize() {
        TERMINAL_EMPHASIS
    } else {
        Emphasis::MARKDOWN
    };

    let matches = results.matches();
    if matches.is_empty() {
        writeln!(writer, "{} No matching card found for \"{}\"", "✗".red(), query)?;
    }
    for (index, found) in matches.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "{}", format!("[score {}]", found.score).dimmed())?;
        writeln!(writer, "{}", render_with_highlight(&found.card, query, emphasis))?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        format!(
            "{} result(s) in {:.4} seconds",
            matches.len(),
            elapsed.as_secs_f64()
        )
        .dimmed()
    )?;
    Ok(())
}
