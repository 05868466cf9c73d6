//! Token-set similarity.
//!
//! Both strings are normalized (non-ASCII dropped, lowercased, every non-word
//! character turned into a space) and split into deduplicated token sets. With
//! `I` the sorted intersection and `A`/`B` the sorted leftovers of each side,
//! the score is the best of
//!
//! - `ratio(I, I + A)`
//! - `ratio(I, I + B)`
//! - `ratio(I + A, I + B)`
//!
//! where `ratio` is the normalized indel similarity `2 * LCS / (len_a + len_b)`
//! scaled to `0..=100` and rounded half to even. A query whose tokens are all
//! contained in the choice therefore scores 100, whatever else the choice holds.

use std::collections::BTreeSet;

/// Scores many choices against one preprocessed query.
#[derive(Debug, Clone)]
pub struct TokenSetScorer {
    tokens: BTreeSet<String>,
}

impl TokenSetScorer {
    pub fn new(query: &str) -> Self {
        Self {
            tokens: tokenize(&normalize(query)),
        }
    }

    /// True when the query has no scorable tokens; every score is then 0.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Similarity between the query and `choice` in `0..=100`.
    #[must_use]
    pub fn score(&self, choice: &str) -> u8 {
        if self.tokens.is_empty() {
            return 0;
        }
        let choice_tokens = tokenize(&normalize(choice));
        if choice_tokens.is_empty() {
            return 0;
        }
        token_set_score(&self.tokens, &choice_tokens)
    }
}

/// One-shot token-set similarity between two strings.
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    TokenSetScorer::new(a).score(b)
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect()
}

fn tokenize(normalized: &str) -> BTreeSet<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

fn token_set_score(a: &BTreeSet<String>, b: &BTreeSet<String>) -> u8 {
    let sect = join(a.intersection(b));
    let combined_a = join_onto(&sect, a.difference(b));
    let combined_b = join_onto(&sect, b.difference(a));

    [
        ratio(&sect, &combined_a),
        ratio(&sect, &combined_b),
        ratio(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

fn join<'a>(tokens: impl Iterator<Item = &'a String>) -> String {
    tokens.map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn join_onto<'a>(prefix: &str, rest: impl Iterator<Item = &'a String>) -> String {
    let rest = join(rest);
    format!("{prefix} {rest}").trim().to_string()
}

/// Normalized indel similarity scaled to `0..=100`; 0 when either side is empty.
pub(crate) fn ratio(a: &str, b: &str) -> u8 {
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let numerator = 200 * lcs_len(a.as_bytes(), b.as_bytes());
    let quotient = numerator / total;
    let remainder = numerator % total;
    let rounded = match (2 * remainder).cmp(&total) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient % 2),
        std::cmp::Ordering::Less => quotient,
    };
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// Length of the longest common subsequence, bit-parallel over `a`.
pub(crate) fn lcs_len(a: &[u8], b: &[u8]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let words = a.len().div_ceil(64);
    let mut matches = vec![0u64; 256 * words];
    for (i, &byte) in a.iter().enumerate() {
        matches[usize::from(byte) * words + i / 64] |= 1u64 << (i % 64);
    }

    let mut v = vec![u64::MAX; words];
    for &byte in b {
        let row = &matches[usize::from(byte) * words..(usize::from(byte) + 1) * words];
        let mut carry = false;
        for (cell, &mask) in v.iter_mut().zip(row) {
            let u = *cell & mask;
            let (partial, overflow_a) = cell.overflowing_add(u);
            let (sum, overflow_b) = partial.overflowing_add(u64::from(carry));
            carry = overflow_a || overflow_b;
            *cell = sum | (*cell & !mask);
        }
    }

    let tail_bits = a.len() % 64;
    v.iter()
        .enumerate()
        .map(|(index, &word)| {
            let mask = if index == words - 1 && tail_bits != 0 {
                (1u64 << tail_bits) - 1
            } else {
                u64::MAX
            };
            (!word & mask).count_ones() as usize
        })
        .sum()
}
