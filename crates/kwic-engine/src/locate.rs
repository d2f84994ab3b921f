//! Candidate enumeration for each matching mode.

use kwic_config::{KeywordConfig, TermMatch};
use kwic_document::TokenizedText;
use regex::{Regex, RegexBuilder};

use crate::context::ContextChecker;
use crate::error::EngineError;
use crate::result::MatchCandidate;
use crate::similarity::{equals, similarity};
use crate::variants::word_variants;

/// A keyword configuration with its derived scan state, built once per run
/// and shared across documents.
pub(crate) struct CompiledKeyword<'a> {
    /// The source configuration.
    pub(crate) config: &'a KeywordConfig,
    /// Compiled context rules for both sides.
    pub(crate) context: ContextChecker,
    /// How candidates are enumerated.
    mode: ScanMode,
}

/// Scan strategy, fixed by the configuration's matching mode.
enum ScanMode {
    /// Overlapping substring scan over the raw content.
    Exact(Regex),
    /// Fixed window of consecutive words equal to the phrase words.
    Phrase(Vec<String>),
    /// Word-at-a-time comparison against the term list, optionally fuzzy.
    Words {
        /// The word, plus its variants when enabled.
        terms: Vec<String>,
        /// Fuzzy threshold; `None` for plain whole-word equality.
        threshold: Option<f64>,
    },
}

impl<'a> CompiledKeyword<'a> {
    /// Compiles the configuration's matching mode and context rules.
    pub(crate) fn new(config: &'a KeywordConfig) -> Result<Self, EngineError> {
        let mode = match config.term_match {
            TermMatch::Exact => ScanMode::Exact(literal_pattern(&config.word, config.case_sensitive)?),
            TermMatch::WholeWord if config.is_phrase() => {
                ScanMode::Phrase(config.word.split_whitespace().map(ToString::to_string).collect())
            }
            TermMatch::WholeWord => ScanMode::Words { terms: search_terms(config), threshold: None },
            TermMatch::Fuzzy { threshold } => ScanMode::Words {
                terms: search_terms(config),
                threshold: Some(threshold),
            },
        };
        Ok(Self { config, context: ContextChecker::new(config)?, mode })
    }

    /// Enumerates raw candidates in scan order: by byte position in exact
    /// mode, by word index otherwise.
    pub(crate) fn locate(&self, tokens: &TokenizedText<'_>) -> Vec<MatchCandidate> {
        match &self.mode {
            ScanMode::Exact(pattern) => scan_exact(tokens, pattern),
            ScanMode::Phrase(words) => scan_phrase(tokens, words, self.config.case_sensitive),
            ScanMode::Words { terms, threshold } => {
                scan_words(tokens, terms, *threshold, self.config.case_sensitive)
            }
        }
    }
}

/// The word alone, or the word plus its variants when enabled.
fn search_terms(config: &KeywordConfig) -> Vec<String> {
    if config.include_variants {
        word_variants(&config.word)
    } else {
        vec![config.word.clone()]
    }
}

/// A literal-text pattern honoring the case flag.
fn literal_pattern(word: &str, case_sensitive: bool) -> Result<Regex, EngineError> {
    RegexBuilder::new(&regex::escape(word))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|source| EngineError::Pattern { term: word.to_string(), source })
}

/// Finds every occurrence of the literal pattern, overlapping ones
/// included: after each hit the scan resumes one character past the hit
/// start, not past its end.
fn scan_exact(tokens: &TokenizedText<'_>, pattern: &Regex) -> Vec<MatchCandidate> {
    let content = tokens.content();
    let mut candidates = Vec::new();
    let mut from = 0;
    while let Some(hit) = pattern.find_at(content, from) {
        // An empty word compiles to a zero-width pattern; it matches nothing.
        if hit.is_empty() {
            break;
        }
        let start = hit.start();
        let end = hit.end();
        let first_word = tokens.word_index_at(start);
        let last_word = tokens.word_index_at(end - 1);
        candidates.push(MatchCandidate {
            position: start,
            word_index: first_word,
            word_count: last_word - first_word + 1,
            matched_text: content[start..end].to_string(),
            similarity: 1.0,
        });
        let step = content[start..].chars().next().map_or(1, char::len_utf8);
        from = start + step;
    }
    candidates
}

/// Slides a window of `words.len()` consecutive document words, comparing
/// each slot for equality under the case flag. Windows overlap: the scan
/// advances one word at a time.
fn scan_phrase(tokens: &TokenizedText<'_>, words: &[String], case_sensitive: bool) -> Vec<MatchCandidate> {
    let mut candidates = Vec::new();
    if words.is_empty() || tokens.len() < words.len() {
        return candidates;
    }
    for start in 0..=(tokens.len() - words.len()) {
        let hit = words
            .iter()
            .enumerate()
            .all(|(offset, word)| equals(tokens.token(start + offset), word, case_sensitive));
        if hit {
            let last = start + words.len() - 1;
            candidates.push(MatchCandidate {
                position: tokens.span(start).start,
                word_index: start,
                word_count: words.len(),
                matched_text: tokens.text_between(start, last).to_string(),
                similarity: 1.0,
            });
        }
    }
    candidates
}

/// Compares each document word against the term list. The first matching
/// term wins, so one word never yields more than one candidate.
fn scan_words(
    tokens: &TokenizedText<'_>,
    terms: &[String],
    threshold: Option<f64>,
    case_sensitive: bool,
) -> Vec<MatchCandidate> {
    let mut candidates = Vec::new();
    for index in 0..tokens.len() {
        let token = tokens.token(index);
        let hit = terms
            .iter()
            .find_map(|term| word_score(token, term, threshold, case_sensitive));
        if let Some(score) = hit {
            candidates.push(MatchCandidate {
                position: tokens.span(index).start,
                word_index: index,
                word_count: 1,
                matched_text: token.to_string(),
                similarity: score,
            });
        }
    }
    candidates
}

/// Scores one word against one term. Equality modes score 1.0; fuzzy mode
/// scores the similarity when it clears the threshold. A threshold at or
/// below zero falls back to equality.
fn word_score(token: &str, term: &str, threshold: Option<f64>, case_sensitive: bool) -> Option<f64> {
    match threshold {
        None => equals(token, term, case_sensitive).then_some(1.0),
        Some(threshold) if threshold <= 0.0 => equals(token, term, case_sensitive).then_some(1.0),
        Some(threshold) => {
            let score = if case_sensitive {
                similarity(token, term)
            } else {
                similarity(&token.to_lowercase(), &term.to_lowercase())
            };
            (score >= threshold).then_some(score)
        }
    }
}
