//! Configuration for the cardex pipeline.
//!
//! Every tunable the crawler, extractor and matcher use lives in one [`Config`]
//! value that is passed explicitly to the components; nothing reads global state.
//!
//! ## Configuration Sources
//!
//! 1. **Explicit file**: `CARDEX_CONFIG` points at a TOML file
//! 2. **Platform config dir**: `<config_dir>/config.toml` (see [`Config::load`])
//! 3. **Defaults**: used when no file exists
//!
//! `CARDEX_DATA_DIR` overrides where the cache and pack-list files live.
//!
//! ## Example Configuration File
//!
//! ```toml
//! catalog_url = "https://www.db.yugioh-card.com/yugiohdb/card_list.action?clm=1&wname=CardSearch"
//!
//! [fetch]
//! user_agent = "Mozilla/5.0"
//! timeout_secs = 10
//! pack_delay_ms = 100
//! max_packs = 5
//!
//! [search]
//! single_cutoff = 60
//! multi_cutoff = 50
//! multi_limit = 25
//!
//! [paths]
//! cache_file = "./json/card_cache.json"
//! pack_list_file = "./json/pack_urls.json"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level catalog search page listing every pack.
pub const DEFAULT_CATALOG_URL: &str =
    "https://www.db.yugioh-card.com/yugiohdb/card_list.action?clm=1&wname=CardSearch";

/// Fixed desktop-browser user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const CACHE_FILE_NAME: &str = "card_cache.json";
const PACK_LIST_FILE_NAME: &str = "pack_urls.json";

/// Complete configuration for crawling, extraction and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Top-level page the pack directory is crawled from.
    pub catalog_url: String,
    /// Network behavior.
    pub fetch: FetchConfig,
    /// Fuzzy-match cutoffs and limits.
    pub search: SearchConfig,
    /// Where the cache and pack-list files are kept.
    pub paths: PathsConfig,
}

/// Network settings shared by the crawler and the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Fixed pause between consecutive pack fetches, in milliseconds.
    pub pack_delay_ms: u64,
    /// Process at most this many packs (all packs when unset).
    pub max_packs: Option<usize>,
}

/// Cutoffs for the fuzzy matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum score a single best match must reach.
    pub single_cutoff: u8,
    /// Minimum score for each entry of a multi-match result.
    pub multi_cutoff: u8,
    /// Cap on the ranked multi-match list (unbounded when unset).
    pub multi_limit: Option<usize>,
}

/// File locations for persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Flat JSON array of every harvested card.
    pub cache_file: PathBuf,
    /// Flat JSON array of `{name, url}` pack references.
    pub pack_list_file: PathBuf,
}

impl Config {
    /// Load configuration from `CARDEX_CONFIG` or the platform config directory.
    ///
    /// A missing file yields [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Write this configuration as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content).map_err(|e| Error::Config(format!("Failed to write config: {e}")))
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("CARDEX_CONFIG") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        directories::ProjectDirs::from("dev", "cardex", "cardex")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            fetch: FetchConfig::default(),
            search: SearchConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl FetchConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Inter-pack delay as a [`Duration`].
    #[must_use]
    pub const fn pack_delay(&self) -> Duration {
        Duration::from_millis(self.pack_delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            pack_delay_ms: 100,
            max_packs: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            single_cutoff: 60,
            multi_cutoff: 50,
            multi_limit: None,
        }
    }
}

impl PathsConfig {
    /// Place both files inside `dir` using their standard file names.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            cache_file: dir.join(CACHE_FILE_NAME),
            pack_list_file: dir.join(PACK_LIST_FILE_NAME),
        }
    }

    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("CARDEX_DATA_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        directories::ProjectDirs::from("dev", "cardex", "cardex")
            .map_or_else(|| PathBuf::from("json"), |dirs| dirs.data_dir().to_path_buf())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self::in_dir(&Self::default_data_dir())
    }
}
