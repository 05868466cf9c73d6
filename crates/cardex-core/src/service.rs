//! Consumer-facing entry point tying configuration, acquisition and search together.

use crate::acquire::Acquisition;
use crate::config::Config;
use crate::crawler::PackDirectoryCrawler;
use crate::store::clear_cache;
use crate::{CatalogStore, Error, Fetcher, Matcher, PackReference, Result, SearchMatch};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::info;

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    /// Single-match mode: the best card, if any reached the cutoff.
    Single(Option<SearchMatch>),
    /// Multi-match mode: ranked and keyword-filtered matches.
    Multiple(Vec<SearchMatch>),
}

impl SearchResults {
    /// Matches in rank order regardless of mode.
    pub fn matches(&self) -> &[SearchMatch] {
        match self {
            Self::Single(found) => found.as_slice(),
            Self::Multiple(found) => found,
        }
    }
}

/// Search results plus how long scoring took.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: SearchResults,
    pub elapsed: Duration,
}

/// Handle to a queued or running search.
#[derive(Debug)]
pub struct SearchTask {
    handle: JoinHandle<Result<SearchOutcome>>,
}

impl SearchTask {
    /// Wait for the search to finish.
    pub async fn wait(self) -> Result<SearchOutcome> {
        self.handle
            .await
            .map_err(|e| Error::Other(format!("search task failed: {e}")))?
    }
}

/// Owns configuration and the shared HTTP client, and serializes background work.
///
/// At most one acquisition runs at a time; a second request fails with
/// [`Error::Busy`]. Searches queue behind one another and never cancel an
/// earlier search.
#[derive(Debug, Clone)]
pub struct CatalogService {
    config: Config,
    fetcher: Fetcher,
    matcher: Matcher,
    acquiring: Arc<Semaphore>,
    searching: Arc<Semaphore>,
}

impl CatalogService {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::from_config(&config.fetch)?;
        let matcher = Matcher::new(config.search);
        Ok(Self {
            config,
            fetcher,
            matcher,
            acquiring: Arc::new(Semaphore::new(1)),
            searching: Arc::new(Semaphore::new(1)),
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Start acquiring the catalog in the background.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while another acquisition is in flight.
    pub fn acquire_catalog(&self) -> Result<Acquisition> {
        let permit = self.acquire_permit()?;
        Ok(Acquisition::spawn(
            self.config.clone(),
            self.fetcher.clone(),
            permit,
        ))
    }

    /// Delete the cache and acquire again from the network.
    pub fn refresh_catalog(&self) -> Result<Acquisition> {
        let permit = self.acquire_permit()?;
        clear_cache(&self.config.paths.cache_file)?;
        Ok(Acquisition::spawn(
            self.config.clone(),
            self.fetcher.clone(),
            permit,
        ))
    }

    fn acquire_permit(&self) -> Result<tokio::sync::OwnedSemaphorePermit> {
        Arc::clone(&self.acquiring)
            .try_acquire_owned()
            .map_err(|_| Error::Busy("A catalog acquisition is already running".to_string()))
    }

    /// Crawl the pack directory and rewrite the pack-list file.
    pub async fn crawl_packs(&self) -> Result<Vec<PackReference>> {
        PackDirectoryCrawler::new(self.fetcher.clone())
            .crawl_to_file(&self.config.catalog_url, &self.config.paths.pack_list_file)
            .await
    }

    /// Delete the cache file. A missing cache is not an error.
    pub fn clear_cache(&self) -> Result<()> {
        clear_cache(&self.config.paths.cache_file)
    }

    /// Queue a search against a completed catalog.
    ///
    /// Scoring runs on the blocking pool once every earlier search has finished.
    pub fn search(
        &self,
        catalog: Arc<CatalogStore>,
        query: impl Into<String>,
        multi: bool,
    ) -> SearchTask {
        let query = query.into();
        let matcher = self.matcher;
        let gate = Arc::clone(&self.searching);

        let handle = tokio::spawn(async move {
            let _permit = gate
                .acquire_owned()
                .await
                .map_err(|e| Error::Other(format!("search gate closed: {e}")))?;

            tokio::task::spawn_blocking(move || {
                let started = Instant::now();
                let results = if multi {
                    SearchResults::Multiple(matcher.find_multiple_matches(&catalog, &query))
                } else {
                    SearchResults::Single(matcher.find_best_match(&catalog, &query))
                };
                let elapsed = started.elapsed();
                info!(
                    "Search for '{}' took {:.4} seconds",
                    query,
                    elapsed.as_secs_f64()
                );
                SearchOutcome { results, elapsed }
            })
            .await
            .map_err(|e| Error::Other(format!("search task panicked: {e}")))
        });

        SearchTask { handle }
    }
}
