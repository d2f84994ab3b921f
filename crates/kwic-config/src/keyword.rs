//! Normalized keyword configuration types.
//!
//! A [`KeywordConfig`] is the fully resolved form of one `[[keyword]]` entry
//! from a keywords file. The raw flag pairs from the file (`exact_text` plus
//! `fuzzy_match`, and the per-side context variants) are collapsed into the
//! [`TermMatch`] and [`ContextMatch`] enums during normalization, so
//! downstream code never sees a contradictory flag combination.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Deserialize;

use crate::identity::{ConfigId, compute_id};

/// Default similarity threshold for fuzzy matching.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Default context window size in words, per side.
pub const DEFAULT_CONTEXT_RANGE: usize = 5;

/// How the keyword itself is matched against document text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TermMatch {
    /// Literal substring scan, including hits inside longer words.
    Exact,
    /// Whole-token equality. Keywords containing spaces match as phrases.
    WholeWord,
    /// Whole-token similarity at the given threshold.
    Fuzzy {
        /// Minimum similarity in 0.0..=1.0 for a token to count as a match.
        /// A threshold of 0 means plain equality, same as the non-fuzzy path.
        threshold: f64,
    },
}

impl Hash for TermMatch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Exact => 0u8.hash(state),
            Self::WholeWord => 1u8.hash(state),
            Self::Fuzzy { threshold } => {
                2u8.hash(state);
                threshold.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for TermMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::WholeWord => write!(f, "word"),
            Self::Fuzzy { threshold } => write!(f, "fuzzy({threshold})"),
        }
    }
}

/// How context terms are matched against a window on one side of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ContextMatch {
    /// Word-boundary match of any term against the window text.
    #[default]
    WholeWord,
    /// Literal substring containment of any term in the window text.
    Exact,
    /// Any window token is similar enough to any term.
    Fuzzy {
        /// Minimum similarity in 0.0..=1.0, with 0 meaning plain equality.
        threshold: f64,
    },
}

impl Hash for ContextMatch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::WholeWord => 0u8.hash(state),
            Self::Exact => 1u8.hash(state),
            Self::Fuzzy { threshold } => {
                2u8.hash(state);
                threshold.to_bits().hash(state);
            }
        }
    }
}

/// How the before and after context requirements combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextLogic {
    /// Every side with terms must be satisfied.
    #[default]
    And,
    /// At least one side that has terms must be satisfied. A side without
    /// terms never satisfies this on its own.
    Or,
}

impl fmt::Display for ContextLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

/// Context requirement for one side of a match.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct ContextRule {
    /// Terms to look for in the window. Empty means no requirement.
    pub terms: Vec<String>,
    /// Window size in words. Always at least 1.
    pub range: usize,
    /// How the terms are matched against the window.
    pub term_match: ContextMatch,
}

impl Default for ContextRule {
    fn default() -> Self {
        Self::none()
    }
}

impl ContextRule {
    /// A rule with no terms: the side imposes no requirement.
    pub fn none() -> Self {
        Self {
            terms: Vec::new(),
            range: DEFAULT_CONTEXT_RANGE,
            term_match: ContextMatch::WholeWord,
        }
    }

    /// Returns true if this side has no terms configured.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// A fully resolved keyword configuration.
///
/// Every field participates in the configuration's identity: two entries with
/// the same word but any differing setting produce separate result groups.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct KeywordConfig {
    /// The word or phrase to search for. Non-empty and trimmed.
    pub word: String,
    /// Free-form category tag carried through to results.
    pub category: String,
    /// Match case exactly.
    pub case_sensitive: bool,
    /// How the keyword is matched.
    pub term_match: TermMatch,
    /// Also match simple suffix variants of the word.
    pub include_variants: bool,
    /// Requirement on the words before a match.
    pub before: ContextRule,
    /// Requirement on the words after a match.
    pub after: ContextRule,
    /// How the two context requirements combine.
    pub logic: ContextLogic,
}

impl KeywordConfig {
    /// Creates a configuration with default settings for the given word.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            category: String::new(),
            case_sensitive: false,
            term_match: TermMatch::WholeWord,
            include_variants: false,
            before: ContextRule::none(),
            after: ContextRule::none(),
            logic: ContextLogic::And,
        }
    }

    /// Returns the stable identity of this configuration.
    pub fn id(&self) -> ConfigId {
        compute_id(self)
    }

    /// Returns true if the keyword contains internal whitespace and is
    /// matched whole-word, which makes it a token-window phrase.
    pub fn is_phrase(&self) -> bool {
        matches!(self.term_match, TermMatch::WholeWord)
            && self.word.split_whitespace().nth(1).is_some()
    }
}
