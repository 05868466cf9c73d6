//! Card rendering with query terms emphasized.

use crate::Card;
use regex::{Captures, Regex, RegexBuilder};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static QUERY_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid term regex"));

/// Markers wrapped around every highlighted term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emphasis<'a> {
    pub open: &'a str,
    pub close: &'a str,
}

impl Emphasis<'static> {
    /// Markdown bold, the default.
    pub const MARKDOWN: Self = Self {
        open: "**",
        close: "**",
    };
}

impl Default for Emphasis<'static> {
    fn default() -> Self {
        Self::MARKDOWN
    }
}

/// Wraps query terms in a piece of text.
#[derive(Debug, Clone)]
pub struct Highlighter<'a> {
    pattern: Option<Regex>,
    emphasis: Emphasis<'a>,
}

impl<'a> Highlighter<'a> {
    /// Build a highlighter for the word terms of `query` that are at least two
    /// characters long. Matching is case-insensitive on word boundaries.
    pub fn new(query: &str, emphasis: Emphasis<'a>) -> Self {
        let lowered = query.to_lowercase();
        let mut terms: Vec<&str> = QUERY_TERM
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|term| term.chars().count() >= 2)
            .collect();
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        terms.dedup();

        let pattern = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|term| regex::escape(term))
                .collect::<Vec<_>>()
                .join("|");
            RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
                .case_insensitive(true)
                .build()
                .ok()
        };

        Self { pattern, emphasis }
    }

    /// Emphasize every term occurrence in `text`.
    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &Captures<'_>| {
                    format!("{}{}{}", self.emphasis.open, &caps[0], self.emphasis.close)
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// Render a card's labelled display block with `query` terms emphasized.
///
/// Labels are never highlighted; only field values are.
pub fn render_with_highlight(card: &Card, query: &str, emphasis: Emphasis<'_>) -> String {
    let h = Highlighter::new(query, emphasis);
    format!(
        "{} ({})\nAttribute: {}\nLevel/Rank: {}\nType: {}\nATK/DEF: {}/{}\nDescription: {}",
        h.apply(&card.name),
        h.apply(&card.rarity),
        h.apply(&card.attribute),
        h.apply(&card.level),
        h.apply(&card.card_type),
        h.apply(&card.atk),
        h.apply(&card.defense),
        h.apply(&card.description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_magician() -> Card {
        Card::builder("Dark Magician")
            .rarity("Ultra Rare")
            .attribute("DARK")
            .level("7")
            .card_type("Spellcaster / Normal")
            .atk("2500")
            .defense("2100")
            .description("The ultimate wizard in terms of attack and defense.")
            .build()
    }

    #[test]
    fn test_render_highlights_terms_case_insensitively() {
        let rendered = render_with_highlight(&dark_magician(), "dark WIZARD", Emphasis::default());
        assert_eq!(
            rendered,
            "**Dark** Magician (Ultra Rare)\n\
             Attribute: **DARK**\n\
             Level/Rank: 7\n\
             Type: Spellcaster / Normal\n\
             ATK/DEF: 2500/2100\n\
             Description: The ultimate **wizard** in terms of attack and defense."
        );
    }

    #[test]
    fn test_short_terms_and_partial_words_ignored() {
        let h = Highlighter::new("a dar", Emphasis::MARKDOWN);
        assert_eq!(h.apply("Dark Magician a"), "Dark Magician a");
    }

    #[test]
    fn test_keyword_markers_do_not_leak_into_terms() {
        let h = Highlighter::new("#normal# magician", Emphasis::MARKDOWN);
        assert_eq!(h.apply("Normal Magician"), "**Normal** **Magician**");
    }

    #[test]
    fn test_overlapping_terms_prefer_longest() {
        let h = Highlighter::new("dark dark_magician", Emphasis { open: "[", close: "]" });
        assert_eq!(h.apply("dark_magician dark"), "[dark_magician] [dark]");
    }

    #[test]
    fn test_empty_query_leaves_text_untouched() {
        let rendered = render_with_highlight(&dark_magician(), "", Emphasis::default());
        assert!(!rendered.contains("**"));
        assert!(rendered.starts_with("Dark Magician (Ultra Rare)\n"));
    }

    #[test]
    fn test_punctuation_is_not_part_of_terms() {
        let h = Highlighter::new("c++ atk", Emphasis::MARKDOWN);
        assert_eq!(h.apply("ATK: 2500"), "**ATK**: 2500");
    }
}
