//! Pack directory crawl command

use anyhow::Result;
use cardex_core::{CatalogService, Config};
use colored::Colorize;

pub async fn crawl(config: Config, quiet: bool) -> Result<()> {
    let service = CatalogService::new(config)?;
    let packs = service.crawl_packs().await?;

    if !quiet {
        println!(
            "{} Found {} packs, saved to {}",
            "✓".green(),
            packs.len(),
            service.config().paths.pack_list_file.display()
        );
    }
    Ok(())
}
