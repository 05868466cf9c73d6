//! Catalog acquisition command

use anyhow::{Result, anyhow};
use cardex_core::{Acquisition, CatalogService, CatalogStore, Config};
use colored::Colorize;

use crate::output::progress::AcquireProgress;

/// Load or harvest the catalog and report what was found.
pub async fn acquire(config: Config, refresh: bool, quiet: bool) -> Result<()> {
    let service = CatalogService::new(config)?;
    let acquisition = if refresh {
        service.refresh_catalog()?
    } else {
        service.acquire_catalog()?
    };

    let (store, elapsed) = drive(acquisition, quiet).await?;
    if !quiet {
        println!(
            "{} {} cards ready in {:.2}s ({})",
            "✓".green(),
            store.len(),
            elapsed.as_secs_f64(),
            store.cache_path().display()
        );
    }
    Ok(())
}

/// Render progress until the acquisition completes, then require a non-empty catalog.
pub(crate) async fn drive(
    mut acquisition: Acquisition,
    quiet: bool,
) -> Result<(CatalogStore, std::time::Duration)> {
    let progress = AcquireProgress::new(quiet);
    while let Some(event) = acquisition.next_progress().await {
        progress.update(&event);
    }
    progress.finish();

    let completion = acquisition
        .finish()
        .await
        .ok_or_else(|| anyhow!("catalog acquisition was interrupted"))?;
    let elapsed = completion.elapsed;
    let store = completion.result?;
    if store.is_empty() {
        return Err(anyhow!(
            "No cards were found. Check the catalog URL or run `cardex acquire --refresh`"
        ));
    }
    Ok((store, elapsed))
}
