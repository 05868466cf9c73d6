//! Card extraction from pack pages.
//!
//! A pack page holds one card list container with one row per card. Both the
//! container and the rows are located through ordered candidate selectors (the
//! first candidate with a non-empty match wins) because the markup differs
//! between catalog eras. Each row is then handed to the field probes in
//! [`probes`].
//!
//! Fragment failures are logged and skipped; a pack whose page cannot be
//! fetched contributes nothing and the caller moves on to the next pack.
//!
//! ```rust
//! use cardex_core::{CardPageExtractor, Fetcher};
//!
//! let extractor = CardPageExtractor::new(Fetcher::new()?)?;
//! let cards = extractor.extract_page(r#"
//!     <div id="card_list">
//!       <div class="t_row"><span class="card_name">Dark Magician</span></div>
//!     </div>
//! "#);
//! assert_eq!(cards[0].name, "Dark Magician");
//! # Ok::<(), cardex_core::Error>(())
//! ```

pub(crate) mod probes;

use crate::{Card, CatalogStore, Fetcher, Result};
use probes::FieldSelectors;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, warn};

const CONTAINER_CANDIDATES: [&str; 3] = ["div#card_list", "div.t_body", "div.card_list"];
const ROW_CANDIDATES: [&str; 3] = [".t_row", ".c_simple", r#"[class*="row"]"#];

/// Fetches pack pages and turns their card fragments into [`Card`]s.
#[derive(Debug, Clone)]
pub struct CardPageExtractor {
    fetcher: Fetcher,
    selectors: Arc<PageSelectors>,
}

#[derive(Debug)]
struct PageSelectors {
    containers: Vec<Selector>,
    rows: Vec<Selector>,
    fields: FieldSelectors,
}

impl CardPageExtractor {
    /// Compile every selector up front.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] if a selector fails to compile.
    pub fn new(fetcher: Fetcher) -> Result<Self> {
        let selectors = PageSelectors {
            containers: crate::dom::compile_all(&CONTAINER_CANDIDATES)?,
            rows: crate::dom::compile_all(&ROW_CANDIDATES)?,
            fields: FieldSelectors::compile()?,
        };
        Ok(Self {
            fetcher,
            selectors: Arc::new(selectors),
        })
    }

    /// Fetch one pack page and add every extracted card to `store`.
    ///
    /// Returns the number of cards added.
    ///
    /// # Errors
    ///
    /// Only the page fetch can fail; fragment-level failures are logged and skipped.
    pub async fn fetch_cards(&self, pack_url: &str, store: &mut CatalogStore) -> Result<usize> {
        let html = self.fetcher.fetch(pack_url).await?;
        let cards = self.extract_page(&html);
        if cards.is_empty() {
            warn!("No cards found for URL: {}", pack_url);
        }
        let count = cards.len();
        for card in cards {
            store.add(card);
        }
        Ok(count)
    }

    /// Extract every recognizable card from a pack page, in document order.
    #[must_use]
    pub fn extract_page(&self, html: &str) -> Vec<Card> {
        let document = Html::parse_document(html);

        let Some(container) = first_match(&self.selectors.containers, document.root_element())
        else {
            debug!("No card list container on page");
            return Vec::new();
        };

        let rows = self
            .selectors
            .rows
            .iter()
            .map(|selector| container.select(selector).collect::<Vec<_>>())
            .find(|rows| !rows.is_empty())
            .unwrap_or_default();

        let mut cards = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match probes::extract_card(&self.selectors.fields, row) {
                Ok(card) => cards.push(card),
                Err(e) => debug!("Skipping card fragment #{}: {}", index, e),
            }
        }
        cards
    }
}

fn first_match<'a>(candidates: &[Selector], root: ElementRef<'a>) -> Option<ElementRef<'a>> {
    candidates
        .iter()
        .find_map(|selector| root.select(selector).next())
}
