//! In-memory card catalog with its searchable corpus and JSON cache.
//!
//! The store keeps cards in insertion order next to a corpus that maps each
//! card's synthesized searchable text (its corpus key) to the card. The corpus
//! is rebuilt incrementally on every [`CatalogStore::add`] and is never touched
//! otherwise.
//!
//! ## Key collisions
//!
//! Two cards whose searchable text is byte-identical share one corpus entry:
//! the later card replaces the earlier one as the entry's owner, and the entry
//! keeps its original position. Both cards stay in [`CatalogStore::cards`], but
//! only the later one can be found by search.

use crate::{Card, Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// One searchable corpus entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    /// Synthesized searchable text standing in for the card.
    pub key: String,
    card_index: usize,
}

/// Ordered card collection plus its searchable corpus.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    cards: Vec<Card>,
    corpus: Vec<CorpusEntry>,
    positions: HashMap<String, usize>,
    cache_path: PathBuf,
}

impl CatalogStore {
    /// Create an empty store whose cache lives at `cache_path`.
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cards: Vec::new(),
            corpus: Vec::new(),
            positions: HashMap::new(),
            cache_path: cache_path.into(),
        }
    }

    /// Append a card and insert (or overwrite) its corpus entry.
    pub fn add(&mut self, card: Card) {
        let key = card.searchable_text();
        let card_index = self.cards.len();
        self.cards.push(card);

        if let Some(&position) = self.positions.get(&key) {
            debug!("Corpus key collision; later card takes over entry {}", position);
            self.corpus[position].card_index = card_index;
        } else {
            self.positions.insert(key.clone(), self.corpus.len());
            self.corpus.push(CorpusEntry { key, card_index });
        }
    }

    /// Cards in insertion order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Corpus entries in first-insertion order.
    #[must_use]
    pub fn corpus(&self) -> &[CorpusEntry] {
        &self.corpus
    }

    /// Card owning a corpus entry.
    ///
    /// `None` when the entry does not belong to this store.
    #[must_use]
    pub fn card_for(&self, entry: &CorpusEntry) -> Option<&Card> {
        self.cards.get(entry.card_index)
    }

    /// Card owning the given corpus key, if any.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Card> {
        self.positions
            .get(key)
            .and_then(|&position| self.corpus.get(position))
            .and_then(|entry| self.card_for(entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Write every card to the cache file as a JSON array.
    ///
    /// Failures are logged, never propagated.
    pub fn save_cache(&self) {
        match self.try_save_cache() {
            Ok(()) => info!("Saved {} cards to cache", self.cards.len()),
            Err(e) => error!("Failed to save cache: {}", e),
        }
    }

    fn try_save_cache(&self) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Cache(format!("Failed to create cache directory: {e}")))?;
        }
        let json = serde_json::to_string_pretty(&self.cards)?;

        let tmp_path = self.cache_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| Error::Cache(format!("Failed to write cache: {e}")))?;

        #[cfg(target_os = "windows")]
        if self.cache_path.exists() {
            fs::remove_file(&self.cache_path)
                .map_err(|e| Error::Cache(format!("Failed to remove existing cache: {e}")))?;
        }
        fs::rename(&tmp_path, &self.cache_path)
            .map_err(|e| Error::Cache(format!("Failed to commit cache: {e}")))?;
        Ok(())
    }

    /// Populate the store from the cache file.
    ///
    /// All-or-nothing: returns `false` (leaving the store empty) when the file is
    /// absent or any part of it fails to decode.
    pub fn load_cache(&mut self) -> bool {
        if !self.cache_path.exists() {
            debug!("No cache at {}", self.cache_path.display());
            return false;
        }
        match read_cache(&self.cache_path) {
            Ok(cards) => {
                self.clear();
                for card in cards {
                    self.add(card);
                }
                info!("Loaded {} cards from cache", self.cards.len());
                true
            },
            Err(e) => {
                error!("Failed to load cache: {}", e);
                self.clear();
                false
            },
        }
    }

    fn clear(&mut self) {
        self.cards.clear();
        self.corpus.clear();
        self.positions.clear();
    }
}

fn read_cache(path: &Path) -> Result<Vec<Card>> {
    let json =
        fs::read_to_string(path).map_err(|e| Error::Cache(format!("Failed to read cache: {e}")))?;
    let cards: Vec<Card> = serde_json::from_str(&json)
        .map_err(|e| Error::Cache(format!("Failed to parse cache: {e}")))?;
    if let Some(position) = cards.iter().position(|card| card.name.trim().is_empty()) {
        return Err(Error::Cache(format!("Cached card #{position} has an empty name")));
    }
    Ok(cards)
}

/// Delete the cache file. A missing file is not an error.
pub fn clear_cache(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .map_err(|e| Error::Cache(format!("Failed to remove cache: {e}")))?;
        info!("Cache cleared at {}", path.display());
    }
    Ok(())
}
