//! Keywords file parsing.
//!
//! Parses keywords TOML files into intermediate [`RawKeywordFile`] structures
//! that keep every field optional. Defaults, flag resolution, and range
//! clamping are applied by the normalization pass, not here.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::{ConfigError, ContextLogic};

/// Raw keywords file as parsed directly from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawKeywordFile {
    /// Preprocessing settings section.
    pub settings: Option<RawSettings>,
    /// Keyword entries, in file order.
    pub keyword: Option<Vec<RawKeyword>>,
}

/// Raw preprocessing settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Replace punctuation with spaces before analysis.
    pub strip_punctuation: Option<bool>,
    /// Lowercase and strip diacritics before analysis.
    pub normalize: Option<bool>,
    /// Cut bibliography sections and inline citations before analysis.
    pub ignore_references: Option<bool>,
}

/// One raw `[[keyword]]` entry.
///
/// Field names mirror the TOML schema. The `exact_text`/`fuzzy_match` pair
/// and the per-side context pairs are resolved into enums during
/// normalization, with exact winning when both are set.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawKeyword {
    /// The word or phrase to search for.
    pub word: Option<String>,
    /// Free-form category tag carried through to results.
    pub category: Option<String>,
    /// Match case exactly.
    pub case_sensitive: Option<bool>,
    /// Match as a literal substring, including inside longer words.
    pub exact_text: Option<bool>,
    /// Match tokens by similarity instead of equality.
    pub fuzzy_match: Option<bool>,
    /// Similarity threshold for fuzzy matching (0.0 to 1.0).
    pub fuzzy_threshold: Option<f64>,
    /// Also match simple suffix variants of the word.
    pub include_variants: Option<bool>,
    /// Terms required before a match.
    /// Accepts a comma separated string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub context_before: Option<Vec<String>>,
    /// Terms required after a match.
    /// Accepts a comma separated string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub context_after: Option<Vec<String>>,
    /// Window size in words for the before side.
    pub context_range_before: Option<usize>,
    /// Window size in words for the after side.
    pub context_range_after: Option<usize>,
    /// Before terms match as literal substrings of the window.
    pub exact_context_before: Option<bool>,
    /// After terms match as literal substrings of the window.
    pub exact_context_after: Option<bool>,
    /// Before terms match window tokens by similarity.
    pub fuzzy_context_before: Option<bool>,
    /// After terms match window tokens by similarity.
    pub fuzzy_context_after: Option<bool>,
    /// Similarity threshold for the before side.
    pub fuzzy_context_threshold_before: Option<f64>,
    /// Similarity threshold for the after side.
    pub fuzzy_context_threshold_after: Option<f64>,
    /// How the two context sides combine: "and" or "or".
    pub context_logic: Option<ContextLogic>,
}

/// Parses a keywords file from disk.
///
/// Returns a `RawKeywordFile` with all fields as optionals, ready for
/// normalization.
pub fn parse_keyword_file(path: &Path) -> Result<RawKeywordFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_keyword_str(&contents, path)
}

/// Parses keywords from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_keyword_str(contents: &str, path: &Path) -> Result<RawKeywordFile, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}
