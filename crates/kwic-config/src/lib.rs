//! Keyword configuration for kwic.
//!
//! Keywords are defined in TOML files (conventionally `keywords.toml`) as a
//! list of `[[keyword]]` entries plus an optional `[settings]` preprocessing
//! section. Parsing keeps every field optional; normalization resolves the
//! exact/fuzzy flag pairs into enums, fills defaults, and reports warnings
//! for anything it had to adjust. Each resolved configuration carries a
//! stable identity hash so results never merge across entries that differ in
//! any setting.

#![warn(missing_docs)]

mod error;
mod identity;
mod keyword;
mod normalize;
mod raw;

use std::path::Path;

pub use error::ConfigError;
pub use identity::{ConfigId, IDENTITY_VERSION};
pub use keyword::{
    ContextLogic, ContextMatch, ContextRule, DEFAULT_CONTEXT_RANGE, DEFAULT_FUZZY_THRESHOLD,
    KeywordConfig, TermMatch,
};
pub use normalize::{KeywordWarning, normalize};
pub use raw::{
    RawKeyword, RawKeywordFile, RawSettings, parse_keyword_file, parse_keyword_str,
};

/// Conventional name of a keywords file.
pub const KEYWORDS_FILENAME: &str = "keywords.toml";

/// Preprocessing applied to document text before analysis.
///
/// These correspond to the `[settings]` section of a keywords file and
/// default to off. The transformations themselves live in `kwic-document`;
/// the engine never preprocesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Replace punctuation with spaces and collapse whitespace runs.
    pub strip_punctuation: bool,
    /// Lowercase and strip diacritics.
    pub normalize: bool,
    /// Cut bibliography sections and inline citations.
    pub ignore_references: bool,
}

impl AnalysisSettings {
    /// Builds settings from a raw `[settings]` section, if present.
    fn from_raw(raw: Option<&RawSettings>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        Self {
            strip_punctuation: raw.strip_punctuation.unwrap_or(false),
            normalize: raw.normalize.unwrap_or(false),
            ignore_references: raw.ignore_references.unwrap_or(false),
        }
    }
}

/// A parsed and normalized keywords file.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    /// Preprocessing settings from the `[settings]` section.
    pub settings: AnalysisSettings,
    /// Validated keyword configurations, in file order.
    pub keywords: Vec<KeywordConfig>,
    /// Problems found during normalization.
    pub warnings: Vec<KeywordWarning>,
}

impl KeywordSet {
    /// Loads and normalizes a keywords file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = parse_keyword_file(path)?;
        Ok(Self::from_raw(&raw))
    }

    /// Parses and normalizes keywords from a TOML string.
    ///
    /// The `path` parameter is used for error reporting.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw = parse_keyword_str(contents, path)?;
        Ok(Self::from_raw(&raw))
    }

    /// Normalizes an already parsed raw file.
    pub fn from_raw(raw: &RawKeywordFile) -> Self {
        let settings = AnalysisSettings::from_raw(raw.settings.as_ref());
        let (keywords, warnings) = normalize(raw);
        Self {
            settings,
            keywords,
            warnings,
        }
    }

    /// Looks up configurations by their word, case-insensitively.
    ///
    /// Several entries can share a word, so this returns all of them.
    pub fn find_by_word(&self, word: &str) -> Vec<&KeywordConfig> {
        self.keywords
            .iter()
            .filter(|config| config.word.eq_ignore_ascii_case(word))
            .collect()
    }
}
