//! Normalization of raw keyword entries.
//!
//! Converts [`RawKeyword`] entries into validated [`KeywordConfig`]s:
//! resolves the exact/fuzzy flag pairs into enums, splits comma separated
//! context term lists, fills defaults, clamps out-of-range values, and
//! collects a warning for everything that had to be adjusted or dropped.
//! The engine can then assume its input is well formed.

use std::fmt;

use crate::{
    ContextMatch, ContextRule, DEFAULT_CONTEXT_RANGE, DEFAULT_FUZZY_THRESHOLD, KeywordConfig,
    RawKeyword, RawKeywordFile, TermMatch,
};

/// A non-fatal problem found while normalizing a keywords file.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordWarning {
    /// An entry had an empty or missing word and was dropped.
    EmptyWord {
        /// Position of the entry in the file, starting at 1.
        entry: usize,
    },
    /// Both exact and fuzzy matching were requested; exact wins.
    ConflictingTermMatch {
        /// The affected keyword.
        word: String,
    },
    /// Both exact and fuzzy context matching were requested on one side;
    /// exact wins.
    ConflictingContextMatch {
        /// The affected keyword.
        word: String,
        /// Which side: "before" or "after".
        side: &'static str,
    },
    /// A similarity threshold was outside 0.0..=1.0 and was clamped.
    ThresholdClamped {
        /// The affected keyword.
        word: String,
        /// The out-of-range value from the file.
        value: f64,
    },
    /// A similarity threshold was not a finite number; the default is used.
    ThresholdInvalid {
        /// The affected keyword.
        word: String,
    },
    /// A context range of zero was raised to one.
    ContextRangeZero {
        /// The affected keyword.
        word: String,
        /// Which side: "before" or "after".
        side: &'static str,
    },
    /// Fuzzy matching on a multi-word keyword compares it as one token,
    /// which can never equal a single document word.
    FuzzyPhrase {
        /// The affected keyword.
        word: String,
    },
    /// The file defines no keywords.
    NoKeywords,
}

impl fmt::Display for KeywordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWord { entry } => {
                write!(f, "keyword entry {entry} has an empty word and was skipped")
            }
            Self::ConflictingTermMatch { word } => {
                write!(
                    f,
                    "keyword '{word}' requests both exact and fuzzy matching; using exact"
                )
            }
            Self::ConflictingContextMatch { word, side } => {
                write!(
                    f,
                    "keyword '{word}' requests both exact and fuzzy {side} context matching; using exact"
                )
            }
            Self::ThresholdClamped { word, value } => {
                write!(
                    f,
                    "keyword '{word}' similarity threshold {value} is outside 0..=1 and was clamped"
                )
            }
            Self::ThresholdInvalid { word } => {
                write!(
                    f,
                    "keyword '{word}' similarity threshold is not a number; using {DEFAULT_FUZZY_THRESHOLD}"
                )
            }
            Self::ContextRangeZero { word, side } => {
                write!(
                    f,
                    "keyword '{word}' {side} context range of 0 was raised to 1"
                )
            }
            Self::FuzzyPhrase { word } => {
                write!(
                    f,
                    "keyword '{word}' contains spaces but uses fuzzy matching, which compares single tokens"
                )
            }
            Self::NoKeywords => write!(f, "no keywords are defined"),
        }
    }
}

/// Normalizes raw keyword entries into validated configurations.
///
/// Entries without a usable word are dropped. The remaining configurations
/// keep their file order.
pub fn normalize(raw: &RawKeywordFile) -> (Vec<KeywordConfig>, Vec<KeywordWarning>) {
    let mut warnings = Vec::new();
    let entries = raw.keyword.as_deref().unwrap_or_default();

    let keywords: Vec<KeywordConfig> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| normalize_keyword(entry, index + 1, &mut warnings))
        .collect();

    if keywords.is_empty() {
        warnings.push(KeywordWarning::NoKeywords);
    }

    (keywords, warnings)
}

/// Normalizes a single entry, or drops it when the word is empty.
fn normalize_keyword(
    entry: &RawKeyword,
    position: usize,
    warnings: &mut Vec<KeywordWarning>,
) -> Option<KeywordConfig> {
    let word = entry.word.as_deref().unwrap_or_default().trim();
    if word.is_empty() {
        warnings.push(KeywordWarning::EmptyWord { entry: position });
        return None;
    }
    let word = word.to_string();

    let term_match = resolve_term_match(&word, entry, warnings);
    if matches!(term_match, TermMatch::Fuzzy { .. }) && word.split_whitespace().nth(1).is_some() {
        warnings.push(KeywordWarning::FuzzyPhrase { word: word.clone() });
    }

    let before = resolve_context_rule(
        &word,
        "before",
        entry.context_before.as_deref(),
        entry.context_range_before,
        entry.exact_context_before,
        entry.fuzzy_context_before,
        entry.fuzzy_context_threshold_before,
        warnings,
    );
    let after = resolve_context_rule(
        &word,
        "after",
        entry.context_after.as_deref(),
        entry.context_range_after,
        entry.exact_context_after,
        entry.fuzzy_context_after,
        entry.fuzzy_context_threshold_after,
        warnings,
    );

    Some(KeywordConfig {
        category: entry.category.clone().unwrap_or_default(),
        case_sensitive: entry.case_sensitive.unwrap_or(false),
        term_match,
        include_variants: entry.include_variants.unwrap_or(false),
        before,
        after,
        logic: entry.context_logic.unwrap_or_default(),
        word,
    })
}

/// Resolves the exact/fuzzy flag pair for the keyword itself.
fn resolve_term_match(
    word: &str,
    entry: &RawKeyword,
    warnings: &mut Vec<KeywordWarning>,
) -> TermMatch {
    let exact = entry.exact_text.unwrap_or(false);
    let fuzzy = entry.fuzzy_match.unwrap_or(false);

    if exact && fuzzy {
        warnings.push(KeywordWarning::ConflictingTermMatch {
            word: word.to_string(),
        });
    }

    if exact {
        TermMatch::Exact
    } else if fuzzy {
        TermMatch::Fuzzy {
            threshold: resolve_threshold(word, entry.fuzzy_threshold, warnings),
        }
    } else {
        TermMatch::WholeWord
    }
}

/// Resolves one side's context rule from its raw fields.
#[allow(clippy::too_many_arguments)]
fn resolve_context_rule(
    word: &str,
    side: &'static str,
    raw_terms: Option<&[String]>,
    range: Option<usize>,
    exact: Option<bool>,
    fuzzy: Option<bool>,
    threshold: Option<f64>,
    warnings: &mut Vec<KeywordWarning>,
) -> ContextRule {
    let terms = split_terms(raw_terms.unwrap_or_default());

    let range = match range {
        Some(0) => {
            warnings.push(KeywordWarning::ContextRangeZero {
                word: word.to_string(),
                side,
            });
            1
        }
        Some(n) => n,
        None => DEFAULT_CONTEXT_RANGE,
    };

    let exact = exact.unwrap_or(false);
    let fuzzy = fuzzy.unwrap_or(false);
    if exact && fuzzy && !terms.is_empty() {
        warnings.push(KeywordWarning::ConflictingContextMatch {
            word: word.to_string(),
            side,
        });
    }

    let term_match = if exact {
        ContextMatch::Exact
    } else if fuzzy {
        ContextMatch::Fuzzy {
            threshold: resolve_threshold(word, threshold, warnings),
        }
    } else {
        ContextMatch::WholeWord
    };

    ContextRule {
        terms,
        range,
        term_match,
    }
}

/// Splits raw term entries on commas, trims, and drops empties.
fn split_terms(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(String::from)
        .collect()
}

/// Clamps a similarity threshold into 0.0..=1.0, warning on adjustment.
fn resolve_threshold(
    word: &str,
    raw: Option<f64>,
    warnings: &mut Vec<KeywordWarning>,
) -> f64 {
    let Some(value) = raw else {
        return DEFAULT_FUZZY_THRESHOLD;
    };
    if !value.is_finite() {
        warnings.push(KeywordWarning::ThresholdInvalid {
            word: word.to_string(),
        });
        return DEFAULT_FUZZY_THRESHOLD;
    }
    if !(0.0..=1.0).contains(&value) {
        warnings.push(KeywordWarning::ThresholdClamped {
            word: word.to_string(),
            value,
        });
        return value.clamp(0.0, 1.0);
    }
    value
}
