//! Tokenization, snippet extraction, and the reader verse overlay

use crate::model::Verse;
use serde::Serialize;
use std::collections::HashMap;

/// Context window on each side of a match when extracting a snippet.
pub const DEFAULT_CONTEXT_WORDS: usize = 50;

/// Split on runs of whitespace.
///
/// Verse ranges were computed upstream against exactly this segmentation,
/// so no Unicode-aware word splitting is allowed here.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Excerpt the tokens around an inclusive `[word_start, word_end]` range,
/// padded by `context_words` on each side and joined with single spaces.
pub fn snippet(text: &str, word_start: usize, word_end: usize, context_words: usize) -> String {
    let tokens = tokenize(text);
    let start = word_start.saturating_sub(context_words);
    let end = tokens.len().min(word_end.saturating_add(context_words));
    if start >= end {
        return String::new();
    }
    tokens[start..end].join(" ")
}

/// Word index -> ordinals (into the verse list) of verses starting there.
/// Drives the badge row above a token in the reader.
pub fn verse_start_map(verses: &[Verse]) -> HashMap<usize, Vec<usize>> {
    let mut starts: HashMap<usize, Vec<usize>> = HashMap::new();
    for (ord, verse) in verses.iter().enumerate() {
        starts.entry(verse.word_start).or_default().push(ord);
    }
    starts
}

/// Every word index in `[word_start, word_end]` -> the ordinal of the verse
/// covering it. Verses are applied in source-list order; ranges are not
/// supposed to overlap, so a collision is logged as a data-quality warning
/// and the later verse wins.
pub fn word_coverage_map(verses: &[Verse]) -> HashMap<usize, usize> {
    let mut coverage: HashMap<usize, usize> = HashMap::new();
    for (ord, verse) in verses.iter().enumerate() {
        for idx in verse.word_start..=verse.word_end {
            if let Some(prev) = coverage.insert(idx, ord) {
                if prev != ord {
                    tracing::warn!(
                        word = idx,
                        first = prev,
                        second = ord,
                        "overlapping verse ranges in match list"
                    );
                }
            }
        }
    }
    coverage
}

/// Both overlay maps for a book's verse list, in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct ReaderOverlay {
    pub starts: HashMap<usize, Vec<usize>>,
    pub coverage: HashMap<usize, usize>,
}

pub fn overlay(verses: &[Verse]) -> ReaderOverlay {
    ReaderOverlay {
        starts: verse_start_map(verses),
        coverage: word_coverage_map(verses),
    }
}

/// Jump target for a table-of-contents entry; `None` when the index is out
/// of bounds for the current token list, which makes the jump a no-op.
pub fn chapter_jump(token_count: usize, word_start: usize) -> Option<usize> {
    (word_start < token_count).then_some(word_start)
}
