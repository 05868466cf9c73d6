//! Pack directory crawling.
//!
//! The top-level search page lists every pack as a container of the form
//!
//! ```html
//! <div class="pack pack_en">
//!   <p><strong>Legend of Blue Eyes White Dragon</strong></p>
//!   <input type="hidden" class="link_value" value="/yugiohdb/card_search.action?pid=1">
//! </div>
//! ```
//!
//! [`parse_pack_directory`] turns that page into an ordered list of
//! [`PackReference`]s. Containers missing either the name label or the link
//! value are skipped; one malformed container never aborts the crawl.

use crate::dom::{self, attr, select_first};
use crate::{Error, Fetcher, PackReference, Result};
use scraper::Html;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

const PACK_CONTAINER: &str = "div.pack.pack_en";
const PACK_NAME: &str = "strong";
const PACK_LINK: &str = "input.link_value";

/// Fetches the pack directory once and extracts its pack references.
#[derive(Debug, Clone)]
pub struct PackDirectoryCrawler {
    fetcher: Fetcher,
}

impl PackDirectoryCrawler {
    pub const fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch `url` and return its packs in document order.
    ///
    /// # Errors
    ///
    /// Any network failure is returned as-is; the caller treats it as fatal.
    pub async fn fetch(&self, url: &str) -> Result<Vec<PackReference>> {
        let html = self.fetcher.fetch(url).await?;
        let packs = parse_pack_directory(&html, url)?;
        info!("Scraped {} pack URLs", packs.len());
        Ok(packs)
    }

    /// Fetch the directory and persist it as the pack-list file.
    pub async fn crawl_to_file(&self, url: &str, path: &Path) -> Result<Vec<PackReference>> {
        let packs = self.fetch(url).await?;
        save_pack_list(path, &packs)?;
        Ok(packs)
    }
}

/// Extract pack references from the directory page, resolving links against `base_url`.
pub fn parse_pack_directory(html: &str, base_url: &str) -> Result<Vec<PackReference>> {
    let base = Url::parse(base_url)?;
    let container = dom::compile(PACK_CONTAINER)?;
    let name_sel = dom::compile(PACK_NAME)?;
    let link_sel = dom::compile(PACK_LINK)?;

    let document = Html::parse_document(html);
    let mut packs = Vec::new();

    for pack in document.select(&container) {
        let name = select_first(pack, &name_sel).map(|el| dom::raw_text(el).trim().to_string());
        let link = select_first(pack, &link_sel).and_then(|el| attr(el, "value"));

        let (Some(name), Some(link)) = (name, link) else {
            debug!("Skipping pack container without name or link value");
            continue;
        };
        if name.is_empty() {
            debug!("Skipping pack container with empty name");
            continue;
        }

        match base.join(link.trim()) {
            Ok(url) => packs.push(PackReference {
                name,
                url: url.to_string(),
            }),
            Err(e) => debug!("Skipping pack '{}' with unresolvable link '{}': {}", name, link, e),
        }
    }

    Ok(packs)
}

/// Write the pack list as a pretty-printed JSON array of `{name, url}`.
pub fn save_pack_list(path: &Path, packs: &[PackReference]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(packs)?;
    fs::write(path, json)?;
    debug!("Saved {} packs to {}", packs.len(), path.display());
    Ok(())
}

/// Read the pack list written by the crawler.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file is missing or does not hold a pack list;
/// extraction cannot start without it.
pub fn load_pack_list(path: &Path) -> Result<Vec<PackReference>> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Pack list not found at '{}'. Run the crawler first",
            path.display()
        )));
    }
    let json = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read pack list: {e}")))?;
    serde_json::from_str(&json).map_err(|e| Error::Config(format!("Failed to parse pack list: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const BASE: &str = "https://db.example.com/yugiohdb/card_list.action?clm=1";

    const DIRECTORY: &str = r#"
        <html><body>
          <div class="pack pack_en">
            <p><strong> Legend of Blue Eyes White Dragon </strong></p>
            <input type="hidden" class="link_value" value="/yugiohdb/card_search.action?pid=1">
          </div>
          <div class="pack pack_en">
            <p>No label here</p>
            <input type="hidden" class="link_value" value="/yugiohdb/card_search.action?pid=2">
          </div>
          <div class="pack pack_en">
            <strong>Missing link</strong>
            <input type="hidden" class="other" value="/ignored">
          </div>
          <div class="pack pack_ja">
            <strong>Wrong locale</strong>
            <input type="hidden" class="link_value" value="/ja">
          </div>
          <div class="pack pack_en">
            <strong>Metal Raiders</strong>
            <input type="hidden" class="link_value" value="card_search.action?pid=3">
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_pack_directory_document_order() {
        let packs = parse_pack_directory(DIRECTORY, BASE).unwrap();
        assert_eq!(
            packs,
            vec![
                PackReference {
                    name: "Legend of Blue Eyes White Dragon".to_string(),
                    url: "https://db.example.com/yugiohdb/card_search.action?pid=1".to_string(),
                },
                PackReference {
                    name: "Metal Raiders".to_string(),
                    url: "https://db.example.com/yugiohdb/card_search.action?pid=3".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_pack_directory_empty_page() {
        let packs = parse_pack_directory("<html></html>", BASE).unwrap();
        assert!(packs.is_empty());
    }

    #[test]
    fn test_parse_pack_directory_rejects_bad_base() {
        let err = parse_pack_directory(DIRECTORY, "not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_pack_list_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("json").join("pack_urls.json");
        let packs = parse_pack_directory(DIRECTORY, BASE).unwrap();

        save_pack_list(&path, &packs).unwrap();
        assert_eq!(load_pack_list(&path).unwrap(), packs);
    }

    #[test]
    fn test_load_pack_list_missing_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        match load_pack_list(&temp_dir.path().join("absent.json")) {
            Err(Error::Config(msg)) => assert!(msg.contains("Pack list not found")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_crawl_to_file_persists_packs() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/yugiohdb/card_list.action"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DIRECTORY))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new()?;
        let list_path = temp_dir.path().join("pack_urls.json");
        let crawler = PackDirectoryCrawler::new(Fetcher::new()?);
        let url = format!("{}/yugiohdb/card_list.action", server.uri());

        let packs = crawler.crawl_to_file(&url, &list_path).await?;
        assert_eq!(packs.len(), 2);
        assert!(packs[0].url.starts_with(&server.uri()));
        assert_eq!(load_pack_list(&list_path)?, packs);
        Ok(())
    }

    #[tokio::test]
    async fn test_crawl_network_failure_is_fatal() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let crawler = PackDirectoryCrawler::new(Fetcher::new()?);
        let err = crawler.fetch(&server.uri()).await.unwrap_err();
        assert_eq!(err.category(), "network");
        Ok(())
    }
}
