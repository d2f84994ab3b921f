//! Context validation around candidate matches.

use std::ops::Range;

use kwic_config::{ContextLogic, ContextMatch, ContextRule, KeywordConfig};
use kwic_document::TokenizedText;
use regex::Regex;

use crate::error::EngineError;
use crate::similarity::fuzzy_matches;

/// Validates the word windows on both sides of candidate matches for one
/// configuration. Whole-word patterns are compiled at construction, once
/// per term per side.
pub(crate) struct ContextChecker {
    /// Requirement on the words before a match.
    before: SideChecker,
    /// Requirement on the words after a match.
    after: SideChecker,
    /// How the two sides combine.
    logic: ContextLogic,
}

impl ContextChecker {
    /// Builds both side checkers for a configuration.
    pub(crate) fn new(config: &KeywordConfig) -> Result<Self, EngineError> {
        Ok(Self {
            before: SideChecker::new(&config.before)?,
            after: SideChecker::new(&config.after)?,
            logic: config.logic,
        })
    }

    /// Word index ranges of the windows around a candidate spanning
    /// `word_index .. word_index + word_count`, clamped to the document.
    ///
    /// The after window starts past the last matched word, so a phrase
    /// match never has its own tail counted as context.
    pub(crate) fn windows(
        &self,
        tokens: &TokenizedText<'_>,
        word_index: usize,
        word_count: usize,
    ) -> (Range<usize>, Range<usize>) {
        let before = word_index.saturating_sub(self.before.rule.range)..word_index;
        let after_start = (word_index + word_count).min(tokens.len());
        let after = after_start..(after_start + self.after.rule.range).min(tokens.len());
        (before, after)
    }

    /// Applies both side rules under the configured combination logic.
    pub(crate) fn accepts(
        &self,
        tokens: &TokenizedText<'_>,
        word_index: usize,
        word_count: usize,
    ) -> bool {
        let (before, after) = self.windows(tokens, word_index, word_count);
        match self.logic {
            ContextLogic::And => {
                self.before.is_satisfied(tokens, before) && self.after.is_satisfied(tokens, after)
            }
            ContextLogic::Or => {
                // Only configured sides count toward the disjunction; with
                // neither side configured there is nothing to require.
                if self.before.is_empty() && self.after.is_empty() {
                    return true;
                }
                (!self.before.is_empty() && self.before.is_satisfied(tokens, before))
                    || (!self.after.is_empty() && self.after.is_satisfied(tokens, after))
            }
        }
    }
}

/// The requirement for one side of a match, ready to test windows.
struct SideChecker {
    /// The configured terms, range, and sub-match mode.
    rule: ContextRule,
    /// One compiled pattern per term, whole-word mode only.
    patterns: Vec<Regex>,
}

impl SideChecker {
    /// Builds the checker, compiling whole-word patterns up front.
    fn new(rule: &ContextRule) -> Result<Self, EngineError> {
        let patterns = match rule.term_match {
            ContextMatch::WholeWord => rule
                .terms
                .iter()
                .map(|term| whole_word_pattern(term))
                .collect::<Result<_, _>>()?,
            ContextMatch::Exact | ContextMatch::Fuzzy { .. } => Vec::new(),
        };
        Ok(Self { rule: rule.clone(), patterns })
    }

    /// True when the side has no terms configured.
    fn is_empty(&self) -> bool {
        self.rule.is_empty()
    }

    /// True when the window satisfies this side. A side with no terms is
    /// vacuously satisfied. Context comparisons ignore case in every mode.
    fn is_satisfied(&self, tokens: &TokenizedText<'_>, window: Range<usize>) -> bool {
        if self.rule.is_empty() {
            return true;
        }
        match self.rule.term_match {
            ContextMatch::Exact => {
                let text = tokens.window_text(window).to_lowercase();
                self.rule.terms.iter().any(|term| text.contains(&term.to_lowercase()))
            }
            ContextMatch::WholeWord => {
                let text = tokens.window_text(window);
                self.patterns.iter().any(|pattern| pattern.is_match(&text))
            }
            ContextMatch::Fuzzy { threshold } => window.into_iter().any(|index| {
                self.rule
                    .terms
                    .iter()
                    .any(|term| fuzzy_matches(tokens.token(index), term, threshold, false))
            }),
        }
    }
}

/// Case-insensitive word-boundary pattern for one context term.
fn whole_word_pattern(term: &str) -> Result<Regex, EngineError> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term))).map_err(|source| EngineError::Pattern {
        term: term.to_string(),
        source,
    })
}
