//! Search command

use anyhow::Result;
use cardex_core::{CatalogService, Config};
use std::io;
use std::sync::Arc;

use super::acquire::drive;
use crate::output::{OutputFormat, search as render};

/// Acquire the catalog (normally from cache) and run one search.
pub async fn search(
    mut config: Config,
    query: &str,
    multi: bool,
    limit: Option<usize>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    if limit.is_some() {
        config.search.multi_limit = limit;
    }
    let service = CatalogService::new(config)?;
    let (store, _) = drive(service.acquire_catalog()?, quiet || format == OutputFormat::Json).await?;

    let outcome = service.search(Arc::new(store), query, multi).wait().await?;

    let stdout = io::stdout().lock();
    match format {
        OutputFormat::Text => render::write_text(stdout, query, &outcome.results, outcome.elapsed),
        OutputFormat::Json => render::write_json(stdout, query, &outcome.results, outcome.elapsed),
    }
}
