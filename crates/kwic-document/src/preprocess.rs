//! Optional text preprocessing.
//!
//! Callers apply these transformations before a document reaches the
//! analysis engine; the engine always sees content as given. The three
//! switches correspond to the `[settings]` section of a keywords file and
//! are applied in a fixed order: punctuation stripping, then case and
//! diacritic folding, then reference removal.

use std::sync::LazyLock;

use kwic_config::AnalysisSettings;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Matches a bibliography section header; everything from the header on is cut.
static BIBLIOGRAPHY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:references|bibliography|works cited|literature cited)(?:\s|:|$)")
        .expect("valid regex")
});

/// Matches numbered citations like [1], [1,2], or [1-3].
static NUMBERED_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+(?:[-,]\d+)*\]").expect("valid regex"));

/// Matches author-year citations like (Smith et al., 2023) or (IPCC, 2022).
static AUTHOR_YEAR_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([A-Za-z\s]+(?:et al\.)?(?:,|\s)+\d{4}\)").expect("valid regex"));

/// Matches DOI URLs with or without scheme.
static DOI_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:https?://)?(?:dx\.)?doi\.org/\S+").expect("valid regex")
});

/// Applies the enabled preprocessing transformations to `text`.
///
/// With all settings off this returns the text unchanged.
pub fn preprocess(text: &str, settings: &AnalysisSettings) -> String {
    let mut processed = text.to_string();

    if settings.strip_punctuation {
        processed = strip_punctuation(&processed);
    }
    if settings.normalize {
        processed = fold_text(&processed);
    }
    if settings.ignore_references {
        processed = strip_references(&processed);
    }

    processed
}

/// Replaces every non-alphanumeric, non-whitespace character with a space,
/// then collapses whitespace runs.
fn strip_punctuation(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    collapse_whitespace(&spaced)
}

/// Lowercases and strips combining diacritical marks via NFD decomposition.
fn fold_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Returns true for characters in the common combining-mark blocks.
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}' // Combining Half Marks
    )
}

/// Cuts the text at the first bibliography header, then removes inline
/// citations and DOI URLs.
fn strip_references(text: &str) -> String {
    let body = match BIBLIOGRAPHY_HEADER.find(text) {
        Some(header) => &text[..header.start()],
        None => text,
    };

    let without_numbered = NUMBERED_CITATION.replace_all(body, "");
    let without_author_year = AUTHOR_YEAR_CITATION.replace_all(&without_numbered, "");
    let without_dois = DOI_URL.replace_all(&without_author_year, "");
    collapse_whitespace(&without_dois)
}

/// Collapses whitespace runs to single spaces and trims the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
