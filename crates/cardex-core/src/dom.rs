//! Small helpers over `scraper` shared by the crawler and the card extractor.

use crate::{Error, Result};
use scraper::{ElementRef, Selector};

/// Compile one CSS selector, reporting the offending pattern on failure.
pub(crate) fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| Error::Parse(format!("invalid selector '{css}'")))
}

/// Compile an ordered list of selectors, preserving priority order.
pub(crate) fn compile_all(patterns: &[&str]) -> Result<Vec<Selector>> {
    patterns.iter().map(|css| compile(css)).collect()
}

/// First descendant (document order) matching `selector`, excluding `root` itself.
pub(crate) fn select_first<'a>(root: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    root.select(selector).next()
}

/// Concatenation of every descendant text node, untouched.
pub(crate) fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Every text node trimmed and concatenated without separators.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Every non-empty text node joined by single spaces with inner whitespace collapsed.
pub(crate) fn spaced_text(element: ElementRef<'_>) -> String {
    let joined = element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

/// Collapse every whitespace run to a single space and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Attribute value of `element`, if present.
pub(crate) fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}
