//! Cache clearing command

use anyhow::Result;
use cardex_core::{CatalogService, Config};
use colored::Colorize;

pub fn clear_cache(config: &Config) -> Result<()> {
    let cache_file = &config.paths.cache_file;
    if !cache_file.exists() {
        println!("{} Cache is already empty", "ℹ".blue());
        return Ok(());
    }

    CatalogService::new(config.clone())?.clear_cache()?;
    println!("{} Cache cleared ({})", "✓".green(), cache_file.display());
    Ok(())
}
