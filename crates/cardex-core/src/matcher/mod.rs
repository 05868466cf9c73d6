//! Fuzzy card search over a [`CatalogStore`] corpus.
//!
//! Two modes share one scorer ([`score::TokenSetScorer`]):
//!
//! - **single**: the best entry scoring at least `single_cutoff`, or nothing.
//! - **multiple**: every entry scoring at least `multi_cutoff`, ranked by score
//!   (ties keep corpus order), optionally capped by `multi_limit`, then narrowed
//!   by required keywords.
//!
//! A required keyword is written inline as `#keyword#`. Keywords are stripped
//! from the text that gets scored and must each appear, case-insensitively, as
//! a substring of a result's corpus key.

pub mod score;

use crate::config::SearchConfig;
use crate::{CatalogStore, SearchMatch};
use regex::Regex;
use score::TokenSetScorer;
use std::sync::LazyLock;
use tracing::debug;

#[allow(clippy::expect_used)]
static KEYWORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([^#]+)#").expect("valid keyword regex"));

/// A query split into scorable text and required keywords.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    /// Query text with keyword markers removed and whitespace collapsed.
    pub text: String,
    /// Lowercased, trimmed keywords in order of appearance.
    pub required: Vec<String>,
}

/// Split `#keyword#` markers out of `query`.
///
/// Each marker's first occurrence is removed from the remaining text, which is
/// then trimmed and whitespace-collapsed.
pub fn parse_query(query: &str) -> ParsedQuery {
    let mut text = query.to_string();
    let mut required = Vec::new();

    for capture in KEYWORD_PATTERN.captures_iter(query) {
        let inner = &capture[1];
        text = text.replacen(&format!("#{inner}#"), "", 1).trim().to_string();
        let keyword = inner.trim().to_lowercase();
        if !keyword.is_empty() {
            required.push(keyword);
        }
    }

    ParsedQuery {
        text: text.split_whitespace().collect::<Vec<_>>().join(" "),
        required,
    }
}

/// Scores queries against a catalog corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    config: SearchConfig,
}

impl Matcher {
    pub const fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Best-scoring card for `query`, if it reaches the single-match cutoff.
    ///
    /// On equal scores the entry that entered the corpus first wins.
    pub fn find_best_match(&self, store: &CatalogStore, query: &str) -> Option<SearchMatch> {
        if store.is_empty() {
            return None;
        }
        let scorer = TokenSetScorer::new(query);
        if scorer.is_empty() {
            return None;
        }

        let mut best: Option<(usize, u8)> = None;
        for (position, entry) in store.corpus().iter().enumerate() {
            let score = scorer.score(&entry.key);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((position, score));
            }
        }

        let (position, score) = best?;
        if score < self.config.single_cutoff {
            debug!(
                "Best score {} below cutoff {} for '{}'",
                score, self.config.single_cutoff, query
            );
            return None;
        }
        let card = store.corpus().get(position).and_then(|entry| store.card_for(entry))?;
        Some(SearchMatch {
            card: card.clone(),
            score,
            query: query.to_string(),
        })
    }

    /// Ranked matches for `query`, narrowed by any `#keyword#` markers.
    pub fn find_multiple_matches(&self, store: &CatalogStore, query: &str) -> Vec<SearchMatch> {
        if store.is_empty() {
            return Vec::new();
        }
        let parsed = parse_query(query);
        let scorer = TokenSetScorer::new(&parsed.text);

        let mut ranked: Vec<(usize, u8)> = store
            .corpus()
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, scorer.score(&entry.key)))
            .filter(|&(_, score)| score >= self.config.multi_cutoff)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        // The cap applies to the ranked list; keyword filtering may shrink it further.
        if let Some(limit) = self.config.multi_limit {
            ranked.truncate(limit);
        }

        let corpus = store.corpus();
        let results: Vec<SearchMatch> = ranked
            .into_iter()
            .filter_map(|(position, score)| {
                let entry = corpus.get(position)?;
                let key = entry.key.to_lowercase();
                if !parsed.required.iter().all(|keyword| key.contains(keyword)) {
                    return None;
                }
                Some(SearchMatch {
                    card: store.card_for(entry)?.clone(),
                    score,
                    query: query.to_string(),
                })
            })
            .collect();

        debug!(
            "{} matches for '{}' (required: {:?})",
            results.len(),
            parsed.text,
            parsed.required
        );
        results
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Card;
    use proptest::prelude::*;

    fn monster(name: &str, description: &str, attribute: &str, card_type: &str) -> Card {
        Card::builder(name)
            .attribute(attribute)
            .level("4")
            .card_type(card_type)
            .atk("1500")
            .defense("1200")
            .description(description)
            .build()
    }

    fn sample_store() -> CatalogStore {
        let mut store = CatalogStore::new("unused.json");
        store.add(Card::builder("Blue-Eyes White Dragon")
            .attribute("LIGHT")
            .level("8")
            .card_type("Dragon / Normal")
            .atk("3000")
            .defense("2500")
            .description("This legendary dragon is a powerful engine of destruction.")
            .build());
        store.add(monster(
            "Dark Magician",
            "The ultimate wizard in terms of attack and defense.",
            "DARK",
            "Spellcaster / Normal",
        ));
        store.add(monster(
            "Red-Eyes Black Dragon",
            "A ferocious dragon with a deadly attack.",
            "DARK",
            "Dragon / Normal",
        ));
        store.add(monster(
            "Mystical Elf",
            "A delicate elf that lacks offense, but has a terrific defense.",
            "LIGHT",
            "Spellcaster / Normal",
        ));
        store
    }

    #[test]
    fn test_parse_query_extracts_keywords() {
        let parsed = parse_query("blue eyes #Dragon#  #  light #");
        assert_eq!(parsed.text, "blue eyes");
        assert_eq!(parsed.required, vec!["dragon", "light"]);
    }

    #[test]
    fn test_parse_query_without_keywords() {
        let parsed = parse_query("  dark   magician ");
        assert_eq!(parsed.text, "dark magician");
        assert!(parsed.required.is_empty());
    }

    #[test]
    fn test_parse_query_removes_first_occurrence_only() {
        let parsed = parse_query("#elf# mystical #elf#");
        assert_eq!(parsed.required, vec!["elf", "elf"]);
        assert_eq!(parsed.text, "mystical");
    }

    #[test]
    fn test_best_match_exact_name() {
        let store = sample_store();
        let matcher = Matcher::new(SearchConfig::default());
        let found = matcher.find_best_match(&store, "Blue-Eyes White Dragon").unwrap();
        assert_eq!(found.card.name, "Blue-Eyes White Dragon");
        assert_eq!(found.score, 100);
        assert_eq!(found.query, "Blue-Eyes White Dragon");
    }

    #[test]
    fn test_best_match_below_cutoff() {
        let store = sample_store();
        let matcher = Matcher::new(SearchConfig::default());
        assert!(matcher.find_best_match(&store, "zzzz qqqq").is_none());
    }

    #[test]
    fn test_best_match_empty_store_and_query() {
        let matcher = Matcher::new(SearchConfig::default());
        assert!(matcher.find_best_match(&CatalogStore::new("x.json"), "dragon").is_none());
        assert!(matcher.find_best_match(&sample_store(), "   ").is_none());
    }

    #[test]
    fn test_best_match_tie_prefers_earliest_entry() {
        let store = sample_store();
        let matcher = Matcher::new(SearchConfig::default());
        // Every card key contains "normal"; all score 100.
        let found = matcher.find_best_match(&store, "normal").unwrap();
        assert_eq!(found.card.name, "Blue-Eyes White Dragon");
    }

    #[test]
    fn test_multiple_matches_ranked_and_filtered() {
        let store = sample_store();
        let matcher = Matcher::new(SearchConfig::default());
        let results = matcher.find_multiple_matches(&store, "dragon #dark#");

        let names: Vec<_> = results.iter().map(|m| m.card.name.as_str()).collect();
        assert_eq!(names, vec!["Red-Eyes Black Dragon"]);
        assert!(results.iter().all(|m| m.score >= 50));
        assert_eq!(results[0].query, "dragon #dark#");
    }

    #[test]
    fn test_multiple_matches_ties_keep_corpus_order() {
        let store = sample_store();
        let matcher = Matcher::new(SearchConfig::default());
        let results = matcher.find_multiple_matches(&store, "dragon");
        let names: Vec<_> = results.iter().map(|m| m.card.name.as_str()).collect();
        assert_eq!(
            &names[..2],
            &["Blue-Eyes White Dragon", "Red-Eyes Black Dragon"]
        );
    }

    #[test]
    fn test_multiple_matches_limit_applies_before_keywords() {
        let store = sample_store();
        let matcher = Matcher::new(SearchConfig {
            multi_limit: Some(1),
            ..SearchConfig::default()
        });
        // The top hit is Blue-Eyes (LIGHT); the cap drops Red-Eyes before the filter runs.
        assert!(matcher.find_multiple_matches(&store, "dragon #dark#").is_empty());
    }

    #[test]
    fn test_multiple_matches_keywords_only() {
        let store = sample_store();
        let matcher = Matcher::new(SearchConfig::default());
        // Nothing left to score once the keyword is stripped.
        assert!(matcher.find_multiple_matches(&store, "#dragon#").is_empty());
    }

    #[test]
    fn test_best_match_cutoff_is_inclusive() {
        let store = sample_store();
        let query = "blue dragon zzz";
        let open = Matcher::new(SearchConfig {
            single_cutoff: 0,
            ..SearchConfig::default()
        });
        let score = open.find_best_match(&store, query).unwrap().score;
        assert!(score < 100);

        let at_score = Matcher::new(SearchConfig {
            single_cutoff: score,
            ..SearchConfig::default()
        });
        let found = at_score.find_best_match(&store, query).unwrap();
        assert_eq!(found.score, score);

        let above_score = Matcher::new(SearchConfig {
            single_cutoff: score + 1,
            ..SearchConfig::default()
        });
        assert!(above_score.find_best_match(&store, query).is_none());
    }

    #[test]
    fn test_multiple_matches_keyword_before_text() {
        let store = sample_store();
        let matcher = Matcher::new(SearchConfig::default());
        let results = matcher.find_multiple_matches(&store, "#dragon# blue eyes");

        let names: Vec<_> = results.iter().map(|m| m.card.name.as_str()).collect();
        assert_eq!(names, vec!["Blue-Eyes White Dragon", "Red-Eyes Black Dragon"]);
        assert_eq!(results[0].score, 100);
        assert!(results.iter().all(|m| m.card.searchable_text().to_lowercase().contains("dragon")));
    }

    #[test]
    fn test_multiple_matches_empty_store() {
        let matcher = Matcher::new(SearchConfig::default());
        assert!(matcher.find_multiple_matches(&CatalogStore::new("x.json"), "dragon").is_empty());
    }

    proptest! {
        #[test]
        fn test_multiple_matches_are_sorted_and_above_cutoff(query in "[a-z ]{1,20}") {
            let store = sample_store();
            let matcher = Matcher::new(SearchConfig::default());
            let results = matcher.find_multiple_matches(&store, &query);
            prop_assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
            prop_assert!(results.iter().all(|m| m.score >= 50));
        }

        #[test]
        fn test_best_match_is_top_of_multiple(query in "[a-z]{2,8}( [a-z]{2,8}){0,2}") {
            let store = sample_store();
            let matcher = Matcher::new(SearchConfig::default());
            let best = matcher.find_best_match(&store, &query);
            let ranked = matcher.find_multiple_matches(&store, &query);
            if let Some(best) = best {
                prop_assert!(best.score >= matcher.config().single_cutoff);
                prop_assert_eq!(&ranked[0], &best);
            }
        }

        #[test]
        fn test_keyword_only_narrows_results(
            words in prop::collection::vec(
                prop::sample::select(vec![
                    "dragon", "dark", "blue", "eyes", "elf", "magician",
                    "light", "spellcaster", "attack", "white", "black",
                ]),
                1..4,
            ),
            keyword in prop::sample::select(vec!["dark", "light", "dragon", "elf", "fire", "normal"]),
            limit in prop::option::of(1usize..4),
        ) {
            let store = sample_store();
            let matcher = Matcher::new(SearchConfig {
                multi_limit: limit,
                ..SearchConfig::default()
            });
            let text = words.join(" ");
            let plain = matcher.find_multiple_matches(&store, &text);
            let narrowed = matcher.find_multiple_matches(&store, &format!("#{keyword}# {text}"));

            prop_assert!(narrowed.len() <= plain.len());
            for found in &narrowed {
                prop_assert!(
                    plain.iter().any(|m| m.card == found.card && m.score == found.score)
                );
                prop_assert!(found.card.searchable_text().to_lowercase().contains(keyword));
            }
        }
    }
}
