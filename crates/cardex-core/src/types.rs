use serde::{Deserialize, Serialize};

/// Sentinel for a field that is not applicable or could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel for a card whose effect/flavor text could not be found.
pub const NO_DESCRIPTION: &str = "No Description";

/// Game value that is printed as variable on the card itself (distinct from [`NOT_AVAILABLE`]).
pub const VARIABLE_VALUE: &str = "?";

/// One harvested card record.
///
/// Every field is a display string. Missing values use the sentinels above
/// rather than `Option`, so the cache file stays a flat array of strings.
/// Cards are never mutated after extraction or cache load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub attribute: String,
    pub level: String,
    #[serde(rename = "type", alias = "card_type")]
    pub card_type: String,
    pub atk: String,
    #[serde(rename = "def", alias = "defense")]
    pub defense: String,
    pub description: String,
    pub rarity: String,
}

impl Card {
    /// Start building a card with the given name and every other field at its default.
    pub fn builder(name: impl Into<String>) -> CardBuilder {
        CardBuilder::new(name)
    }

    /// Synthesize the searchable text standing in for this card during fuzzy ranking.
    ///
    /// Layout: `"{name} {description} {type} {attribute}"` with `"ATK: {atk}"` and
    /// `"DEF: {def}"` appended directly when those fields are non-empty.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut text = format!(
            "{} {} {} {}",
            self.name, self.description, self.card_type, self.attribute
        );
        if !self.atk.is_empty() {
            text.push_str("ATK: ");
            text.push_str(&self.atk);
        }
        if !self.defense.is_empty() {
            text.push_str("DEF: ");
            text.push_str(&self.defense);
        }
        text
    }
}

/// Incremental constructor used by extraction and tests.
#[derive(Debug, Clone)]
pub struct CardBuilder {
    card: Card,
}

impl CardBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            card: Card {
                name: name.into(),
                attribute: NOT_AVAILABLE.to_string(),
                level: NOT_AVAILABLE.to_string(),
                card_type: NOT_AVAILABLE.to_string(),
                atk: NOT_AVAILABLE.to_string(),
                defense: NOT_AVAILABLE.to_string(),
                description: NO_DESCRIPTION.to_string(),
                rarity: NOT_AVAILABLE.to_string(),
            },
        }
    }

    #[must_use]
    pub fn attribute(mut self, value: impl Into<String>) -> Self {
        self.card.attribute = value.into();
        self
    }

    #[must_use]
    pub fn level(mut self, value: impl Into<String>) -> Self {
        self.card.level = value.into();
        self
    }

    #[must_use]
    pub fn card_type(mut self, value: impl Into<String>) -> Self {
        self.card.card_type = value.into();
        self
    }

    #[must_use]
    pub fn atk(mut self, value: impl Into<String>) -> Self {
        self.card.atk = value.into();
        self
    }

    #[must_use]
    pub fn defense(mut self, value: impl Into<String>) -> Self {
        self.card.defense = value.into();
        self
    }

    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.card.description = value.into();
        self
    }

    #[must_use]
    pub fn rarity(mut self, value: impl Into<String>) -> Self {
        self.card.rarity = value.into();
        self
    }

    #[must_use]
    pub fn build(self) -> Card {
        self.card
    }
}

/// A pack (product release) discovered on the top-level search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackReference {
    pub name: String,
    /// Absolute URL of the pack's card list page.
    pub url: String,
}

/// A card matched by a search together with its similarity score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub card: Card,
    /// Token-set similarity in `0..=100`.
    pub score: u8,
    /// The query exactly as the caller supplied it (markers included).
    pub query: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dragon() -> Card {
        Card::builder("Blue-Eyes White Dragon")
            .attribute("LIGHT")
            .level("8")
            .card_type("Dragon / Normal")
            .atk("3000")
            .defense("2500")
            .description("This legendary dragon is a powerful engine of destruction.")
            .rarity("Ultra Rare")
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let card = Card::builder("Pot of Greed").build();
        assert_eq!(card.name, "Pot of Greed");
        assert_eq!(card.attribute, NOT_AVAILABLE);
        assert_eq!(card.level, NOT_AVAILABLE);
        assert_eq!(card.card_type, NOT_AVAILABLE);
        assert_eq!(card.atk, NOT_AVAILABLE);
        assert_eq!(card.defense, NOT_AVAILABLE);
        assert_eq!(card.description, NO_DESCRIPTION);
        assert_eq!(card.rarity, NOT_AVAILABLE);
    }

    #[test]
    fn test_searchable_text_layout() {
        let card = dragon();
        assert_eq!(
            card.searchable_text(),
            "Blue-Eyes White Dragon This legendary dragon is a powerful engine of destruction. \
             Dragon / Normal LIGHTATK: 3000DEF: 2500"
        );
    }

    #[test]
    fn test_searchable_text_skips_empty_stats() {
        let card = Card::builder("Odd").atk("").defense("").build();
        assert_eq!(card.searchable_text(), "Odd No Description N/A N/A");

        let card = Card::builder("Half").atk("").defense("?").build();
        assert!(card.searchable_text().ends_with("N/ADEF: ?"));
    }

    #[test]
    fn test_card_json_field_names() {
        let json = serde_json::to_value(dragon()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "atk",
                "attribute",
                "def",
                "description",
                "level",
                "name",
                "rarity",
                "type"
            ]
        );
    }

    #[test]
    fn test_card_accepts_legacy_field_names() {
        let json = r#"{
            "name": "Mirror Force",
            "attribute": "TRAP",
            "level": "N/A",
            "card_type": "Normal Trap",
            "atk": "N/A",
            "defense": "N/A",
            "description": "Destroy all attack position monsters.",
            "rarity": "Super Rare"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.card_type, "Normal Trap");
        assert_eq!(card.defense, "N/A");
    }
}
