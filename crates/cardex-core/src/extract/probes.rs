//! Field probes for card fragments.
//!
//! Catalog pages drift in markup across eras, so each field is resolved by an
//! ordered list of pure probes (`fragment -> Option<String>`). Probes run in
//! priority order and the first one that yields a value wins; later probes are
//! never consulted. A field whose probes all miss falls back to its sentinel.

use crate::dom::{self, attr, select_first};
use crate::types::{NO_DESCRIPTION, NOT_AVAILABLE, VARIABLE_VALUE};
use crate::{Card, Error, Result};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

/// A single fallback rule for one field.
pub(crate) type Probe = fn(&FieldSelectors, ElementRef<'_>) -> Option<String>;

/// Category keywords in scan order; the first one found wins.
pub(crate) const ATTRIBUTES: [&str; 9] = [
    "LIGHT", "DARK", "FIRE", "WATER", "EARTH", "WIND", "DIVINE", "SPELL", "TRAP",
];

/// Rarity names recognized by exact text match.
pub(crate) const RARITIES: [&str; 9] = [
    "Ultra Rare",
    "Super Rare",
    "Secret Rare",
    "Common",
    "Rare",
    "Ghost Rare",
    "Ultimate Rare",
    "Parallel Rare",
    "Gold Rare",
];

/// `(subtype keyword, class keyword, resolved type)` in priority order.
const SPELL_SUBTYPES: [(&str, &str, &str); 5] = [
    ("continuous", "spell", "Continuous Spell"),
    ("quick-play", "spell", "Quick-Play Spell"),
    ("field", "spell", "Field Spell"),
    ("equip", "spell", "Equip Spell"),
    ("ritual", "spell", "Ritual Spell"),
];

const TRAP_SUBTYPES: [(&str, &str, &str); 2] = [
    ("continuous", "trap", "Continuous Trap"),
    ("counter", "trap", "Counter Trap"),
];

/// Contiguous phrases searched in the whole fragment's flattened text.
const TYPE_PHRASES: [(&str, &str); 9] = [
    ("continuous spell", "Continuous Spell"),
    ("quick-play spell", "Quick-Play Spell"),
    ("field spell", "Field Spell"),
    ("equip spell", "Equip Spell"),
    ("ritual spell", "Ritual Spell"),
    ("normal spell", "Normal Spell"),
    ("continuous trap", "Continuous Trap"),
    ("counter trap", "Counter Trap"),
    ("normal trap", "Normal Trap"),
];

/// Type text that means "nothing here".
const TYPE_PLACEHOLDERS: [&str; 2] = [NOT_AVAILABLE, "-"];

#[allow(clippy::expect_used)]
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid digits regex"));

#[allow(clippy::expect_used)]
static STAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\d+|{}", regex::escape(VARIABLE_VALUE))).expect("valid stat regex")
});

/// Every selector the probes use, compiled once per extractor.
#[derive(Debug)]
pub(crate) struct FieldSelectors {
    name: Vec<Selector>,
    attribute_icon: Selector,
    spell_marker: Selector,
    trap_marker: Selector,
    attribute_text: Selector,
    level: Selector,
    card_type: Vec<Selector>,
    spell_icon: Selector,
    trap_icon: Selector,
    any: Selector,
    stats: Selector,
    atk: Selector,
    def: Selector,
    description: Vec<Selector>,
    rarity: Vec<Selector>,
}

impl FieldSelectors {
    pub(crate) fn compile() -> Result<Self> {
        Ok(Self {
            name: dom::compile_all(&[
                "span.card_name",
                ".card_name_flex_1",
                ".card_name",
                "a[title]",
                ".t_title a",
            ])?,
            attribute_icon: dom::compile(r#"img[src*="attribute"], .icon_img"#)?,
            spell_marker: dom::compile(r#".icon_img[title*="Spell"], .icon_img[alt*="Spell"]"#)?,
            trap_marker: dom::compile(r#".icon_img[title*="Trap"], .icon_img[alt*="Trap"]"#)?,
            attribute_text: dom::compile("div.box_card_attribute")?,
            level: dom::compile(".box_card_level_rank span, .item_box_value")?,
            card_type: dom::compile_all(&[
                ".card_info_species_and_other_item span",
                ".species",
                ".card_type",
                "div.item_box_title + .item_box_value",
                ".item_box_value",
                r#"span[title*="Spell"]"#,
                r#"span[title*="Trap"]"#,
                ".box_card_species span",
                ".card_info span",
            ])?,
            spell_icon: dom::compile(
                r#".icon_img[title*="Spell"], .icon_img[alt*="Spell"], img[src*="spell"]"#,
            )?,
            trap_icon: dom::compile(
                r#".icon_img[title*="Trap"], .icon_img[alt*="Trap"], img[src*="trap"]"#,
            )?,
            any: dom::compile("*")?,
            stats: dom::compile(".atkdef, .item_box")?,
            atk: dom::compile(".atk_power span, .item_box_value")?,
            def: dom::compile(".def_power span, .item_box_value")?,
            description: dom::compile_all(&["dd.box_card_text", ".card_text", ".text_title"])?,
            rarity: dom::compile_all(&[
                ".rarity span",
                ".rarity",
                ".star_shining",
                ".star_gold",
                ".star_silver",
                ".icon_rarity",
            ])?,
        })
    }
}

pub(crate) const NAME_PROBES: &[Probe] = &[name_from_selectors];
pub(crate) const ATTRIBUTE_PROBES: &[Probe] =
    &[attribute_from_icon, attribute_from_marker, attribute_from_text];
pub(crate) const LEVEL_PROBES: &[Probe] = &[level_from_value];
pub(crate) const TYPE_PROBES: &[Probe] =
    &[type_from_selectors, type_from_class_icon, type_from_flattened_text];
pub(crate) const ATK_PROBES: &[Probe] = &[atk_from_stats];
pub(crate) const DEF_PROBES: &[Probe] = &[def_from_stats];
pub(crate) const DESCRIPTION_PROBES: &[Probe] = &[description_from_selectors];
pub(crate) const RARITY_PROBES: &[Probe] = &[rarity_from_exact_text, rarity_from_selectors];

/// Run `probes` in order and return the first value produced.
pub(crate) fn first_success(
    probes: &[Probe],
    selectors: &FieldSelectors,
    fragment: ElementRef<'_>,
) -> Option<String> {
    probes.iter().find_map(|probe| probe(selectors, fragment))
}

fn field_or(
    probes: &[Probe],
    selectors: &FieldSelectors,
    fragment: ElementRef<'_>,
    default: &str,
) -> String {
    first_success(probes, selectors, fragment).unwrap_or_else(|| default.to_string())
}

/// Build a [`Card`] from one fragment.
///
/// # Errors
///
/// Returns [`Error::Parse`] when no name can be found; the fragment is discarded.
pub(crate) fn extract_card(selectors: &FieldSelectors, fragment: ElementRef<'_>) -> Result<Card> {
    let name = first_success(NAME_PROBES, selectors, fragment)
        .ok_or_else(|| Error::Parse("card fragment has no recognizable name".to_string()))?;

    Ok(Card::builder(name)
        .attribute(field_or(ATTRIBUTE_PROBES, selectors, fragment, NOT_AVAILABLE))
        .level(field_or(LEVEL_PROBES, selectors, fragment, NOT_AVAILABLE))
        .card_type(field_or(TYPE_PROBES, selectors, fragment, NOT_AVAILABLE))
        .atk(field_or(ATK_PROBES, selectors, fragment, NOT_AVAILABLE))
        .defense(field_or(DEF_PROBES, selectors, fragment, NOT_AVAILABLE))
        .description(field_or(DESCRIPTION_PROBES, selectors, fragment, NO_DESCRIPTION))
        .rarity(field_or(RARITY_PROBES, selectors, fragment, NOT_AVAILABLE))
        .build())
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// --- name -------------------------------------------------------------------

fn name_from_selectors(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    sel.name.iter().find_map(|selector| {
        let element = select_first(fragment, selector)?;
        attr(element, "title")
            .and_then(non_empty)
            .or_else(|| non_empty(&dom::raw_text(element)))
    })
}

// --- attribute --------------------------------------------------------------

fn attribute_from_icon(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    let icon = select_first(fragment, &sel.attribute_icon)?;
    ["src", "alt", "title"]
        .into_iter()
        .map(|name| attr(icon, name).unwrap_or_default().to_lowercase())
        .find_map(|text| {
            ATTRIBUTES
                .iter()
                .find(|keyword| text.contains(&keyword.to_lowercase()))
                .map(|keyword| (*keyword).to_string())
        })
}

fn attribute_from_marker(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    if select_first(fragment, &sel.spell_marker).is_some() {
        return Some("SPELL".to_string());
    }
    select_first(fragment, &sel.trap_marker).map(|_| "TRAP".to_string())
}

fn attribute_from_text(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    let element = select_first(fragment, &sel.attribute_text)?;
    non_empty(&dom::collapse_whitespace(&dom::raw_text(element)))
}

// --- level ------------------------------------------------------------------

fn level_from_value(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    let element = select_first(fragment, &sel.level)?;
    let text = dom::raw_text(element);
    DIGITS_RE.find(&text).map(|m| m.as_str().to_string())
}

// --- type -------------------------------------------------------------------

fn type_from_selectors(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    sel.card_type.iter().find_map(|selector| {
        let element = select_first(fragment, selector)?;
        let text = dom::collapse_whitespace(&dom::raw_text(element));
        (!text.is_empty() && !TYPE_PLACEHOLDERS.contains(&text.as_str())).then_some(text)
    })
}

fn type_from_class_icon(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    if select_first(fragment, &sel.spell_icon).is_some() {
        return Some(
            scan_subtypes(sel, fragment, &SPELL_SUBTYPES).unwrap_or_else(|| "Normal Spell".into()),
        );
    }
    if select_first(fragment, &sel.trap_icon).is_some() {
        return Some(
            scan_subtypes(sel, fragment, &TRAP_SUBTYPES).unwrap_or_else(|| "Normal Trap".into()),
        );
    }
    None
}

/// Walk every descendant in document order; within one element the subtype
/// list order decides.
fn scan_subtypes(
    sel: &FieldSelectors,
    fragment: ElementRef<'_>,
    subtypes: &[(&str, &str, &str)],
) -> Option<String> {
    fragment.select(&sel.any).find_map(|element| {
        let text = dom::stripped_text(element).to_lowercase();
        subtypes
            .iter()
            .find(|(subtype, class, _)| text.contains(subtype) && text.contains(class))
            .map(|(_, _, resolved)| (*resolved).to_string())
    })
}

fn type_from_flattened_text(_sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    let text = dom::spaced_text(fragment).to_lowercase();
    TYPE_PHRASES
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, resolved)| (*resolved).to_string())
}

// --- atk / def --------------------------------------------------------------

fn stat_from(container_sel: &Selector, stat_sel: &Selector, fragment: ElementRef<'_>) -> Option<String> {
    let container = select_first(fragment, container_sel)?;
    let element = select_first(container, stat_sel)?;
    let text = dom::raw_text(element);
    STAT_RE.find(text.trim()).map(|m| m.as_str().to_string())
}

fn atk_from_stats(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    stat_from(&sel.stats, &sel.atk, fragment)
}

fn def_from_stats(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    stat_from(&sel.stats, &sel.def, fragment)
}

// --- description ------------------------------------------------------------

fn description_from_selectors(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    sel.description.iter().find_map(|selector| {
        let element = select_first(fragment, selector)?;
        let text = dom::spaced_text(element);
        (!text.is_empty() && text != NO_DESCRIPTION).then_some(text)
    })
}

// --- rarity -----------------------------------------------------------------

fn rarity_from_exact_text(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    fragment.select(&sel.any).find_map(|element| {
        let text = dom::stripped_text(element);
        RARITIES.contains(&text.as_str()).then_some(text)
    })
}

fn rarity_from_selectors(sel: &FieldSelectors, fragment: ElementRef<'_>) -> Option<String> {
    sel.rarity
        .iter()
        .find_map(|selector| select_first(fragment, selector).and_then(|el| non_empty(&dom::raw_text(el))))
}
