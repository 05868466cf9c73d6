//! Background catalog acquisition.
//!
//! An acquisition runs as one tokio task:
//!
//! 1. Load the cache. On success the catalog is complete.
//! 2. Otherwise crawl the pack directory if no pack list exists yet.
//! 3. Load the pack list (optionally capped by `max_packs`).
//! 4. Extract each pack in order, pausing `pack_delay_ms` between packs.
//! 5. Save the cache.
//!
//! Progress arrives on a channel as [`Progress`] events. The task ends with a
//! single [`Completion`]. Per-pack failures are logged and skipped; a crawl
//! failure or a missing pack list ends the acquisition with an error.

use crate::config::Config;
use crate::crawler::{PackDirectoryCrawler, load_pack_list};
use crate::{CardPageExtractor, CatalogStore, Fetcher, Result};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Progress notification: a percentage in `0..=100` and a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub status: String,
}

/// Terminal result of an acquisition.
#[derive(Debug)]
pub struct Completion {
    /// The populated catalog, or the error that ended the acquisition.
    pub result: Result<CatalogStore>,
    /// Wall-clock time from start to completion.
    pub elapsed: Duration,
}

impl Completion {
    /// The catalog, if acquisition succeeded.
    pub fn catalog(&self) -> Option<&CatalogStore> {
        self.result.as_ref().ok()
    }

    /// Human-readable failure message, if acquisition failed.
    pub fn error_message(&self) -> Option<String> {
        self.result.as_ref().err().map(ToString::to_string)
    }
}

/// Handle to a running acquisition.
///
/// Poll [`Acquisition::next_progress`] until it returns `None`, then call
/// [`Acquisition::finish`] for the completion.
#[derive(Debug)]
pub struct Acquisition {
    progress: mpsc::UnboundedReceiver<Progress>,
    handle: JoinHandle<Completion>,
}

impl Acquisition {
    /// Spawn the acquisition pipeline onto the current tokio runtime.
    pub(crate) fn spawn<G>(config: Config, fetcher: Fetcher, guard: G) -> Self
    where
        G: Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            let started = Instant::now();
            let result = run(&config, &fetcher, &ProgressSink(tx)).await;
            let elapsed = started.elapsed();
            match &result {
                Ok(store) => info!(
                    "Acquired {} cards in {:.2} seconds",
                    store.len(),
                    elapsed.as_secs_f64()
                ),
                Err(e) => error!("Acquisition failed: {}", e),
            }
            Completion { result, elapsed }
        });
        Self {
            progress: rx,
            handle,
        }
    }

    /// Next progress event, or `None` once the task has stopped emitting.
    pub async fn next_progress(&mut self) -> Option<Progress> {
        self.progress.recv().await
    }

    /// Abort the background task at its next await point.
    ///
    /// This is not a graceful cancellation: the partially built catalog is
    /// dropped, an in-flight request is abandoned mid-way, and
    /// [`Acquisition::finish`] will return `None`.
    pub fn terminate(&self) {
        warn!("Terminating catalog acquisition");
        self.handle.abort();
    }

    /// Wait for the completion. `None` if the task was terminated or panicked.
    pub async fn finish(self) -> Option<Completion> {
        match self.handle.await {
            Ok(completion) => Some(completion),
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                error!("Acquisition task failed: {}", e);
                None
            },
        }
    }
}

struct ProgressSink(mpsc::UnboundedSender<Progress>);

impl ProgressSink {
    fn emit(&self, percent: u8, status: impl Into<String>) {
        // A dropped receiver only means nobody is watching.
        let _ = self.0.send(Progress {
            percent,
            status: status.into(),
        });
    }
}

async fn run(config: &Config, fetcher: &Fetcher, progress: &ProgressSink) -> Result<CatalogStore> {
    let mut store = CatalogStore::new(&config.paths.cache_file);
    if store.load_cache() {
        progress.emit(100, "Loaded cards from cache!");
        return Ok(store);
    }

    let pack_list = &config.paths.pack_list_file;
    if !pack_list.exists() {
        progress.emit(0, "Scraping pack URLs for the first time...");
        PackDirectoryCrawler::new(fetcher.clone())
            .crawl_to_file(&config.catalog_url, pack_list)
            .await?;
    }

    progress.emit(0, "Loading pack URLs...");
    let mut packs = load_pack_list(pack_list)?;
    if let Some(max) = config.fetch.max_packs {
        packs.truncate(max);
    }

    let extractor = CardPageExtractor::new(fetcher.clone())?;
    let total = packs.len();
    let delay = config.fetch.pack_delay();

    for (index, pack) in packs.iter().enumerate() {
        let status = format!("Scraping pack: {}", pack.name);
        progress.emit(percent(index, total), status.as_str());

        if let Err(e) = extractor.fetch_cards(&pack.url, &mut store).await {
            error!("Failed to scrape URL {}: {}", pack.url, e);
        }
        progress.emit(percent(index + 1, total), status);

        if index + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    store.save_cache();
    progress.emit(
        100,
        format!(
            "Scraping complete! Found {} cards from {} packs.",
            store.len(),
            total
        ),
    );
    Ok(store)
}

/// `floor(done / total * 100)`; a run with no packs counts as complete.
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    u8::try_from(done * 100 / total).unwrap_or(100)
}
