//! # cardex-core
//!
//! Harvests a trading-card catalog from a card database website and serves fuzzy
//! searches over it.
//!
//! ## Architecture
//!
//! - **Crawling**: [`PackDirectoryCrawler`] lists every pack on the directory page.
//! - **Extraction**: [`CardPageExtractor`] turns each pack page into [`Card`]s,
//!   trying several fallback rules per field because the markup varies.
//! - **Storage**: [`CatalogStore`] keeps cards plus a searchable corpus and
//!   persists them to a JSON cache.
//! - **Search**: [`Matcher`] ranks corpus entries with token-set similarity.
//! - **Service**: [`CatalogService`] runs acquisition and searches in the
//!   background and is what front ends talk to.
//!
//! ## Quick Start
//!
//! ```rust
//! use cardex_core::{Card, CatalogStore, Matcher, SearchConfig};
//!
//! let mut store = CatalogStore::new("card_cache.json");
//! store.add(
//!     Card::builder("Blue-Eyes White Dragon")
//!         .attribute("LIGHT")
//!         .card_type("Dragon / Normal")
//!         .build(),
//! );
//!
//! let matcher = Matcher::new(SearchConfig::default());
//! let found = matcher.find_best_match(&store, "blue eyes dragon");
//! assert_eq!(found.map(|m| m.card.name).as_deref(), Some("Blue-Eyes White Dragon"));
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`]:
//!
//! ```rust
//! use cardex_core::{Error, crawler::load_pack_list};
//! use std::path::Path;
//!
//! match load_pack_list(Path::new("does/not/exist.json")) {
//!     Ok(packs) => println!("{} packs", packs.len()),
//!     Err(Error::Config(msg)) => eprintln!("Run the crawler first: {msg}"),
//!     Err(e) if e.is_recoverable() => eprintln!("Try again: {e}"),
//!     Err(e) => eprintln!("Fatal: {e}"),
//! }
//! ```

/// Background catalog acquisition with progress events
pub mod acquire;
/// Configuration loading and defaults
pub mod config;
/// Pack directory crawling and pack-list persistence
pub mod crawler;
mod dom;
/// Error types and result aliases
pub mod error;
/// Card extraction from pack pages
pub mod extract;
/// HTTP page fetching
pub mod fetcher;
/// Card rendering with highlighted query terms
pub mod highlight;
/// Fuzzy matching over the catalog corpus
pub mod matcher;
/// Consumer-facing service facade
pub mod service;
/// Card storage, corpus and cache
pub mod store;
/// Core data types
pub mod types;

pub use acquire::{Acquisition, Completion, Progress};
pub use config::{Config, FetchConfig, PathsConfig, SearchConfig};
pub use crawler::PackDirectoryCrawler;
pub use error::{Error, Result};
pub use extract::CardPageExtractor;
pub use fetcher::Fetcher;
pub use highlight::{Emphasis, Highlighter, render_with_highlight};
pub use matcher::{Matcher, ParsedQuery, parse_query};
pub use service::{CatalogService, SearchOutcome, SearchResults, SearchTask};
pub use store::{CatalogStore, CorpusEntry};
pub use types::*;
