//! Result types produced by an analysis run.

use std::collections::BTreeMap;

use kwic_config::{ConfigId, KeywordConfig};
use kwic_document::DocumentId;
use serde::Serialize;

/// A raw location produced by the match locator, before context validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    /// Byte offset of the match start in the document content.
    pub position: usize,
    /// Index of the first document word the match covers.
    pub word_index: usize,
    /// Number of document words the match covers. At least 1.
    pub word_count: usize,
    /// The matched document text, original case.
    pub matched_text: String,
    /// Similarity of the matched word to the keyword; 1.0 outside fuzzy mode.
    pub similarity: f64,
}

/// A match that passed context validation, with its captured surroundings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedMatch {
    /// Byte offset of the match start in the document content.
    pub position: usize,
    /// Index of the first document word the match covers.
    pub word_index: usize,
    /// Number of document words the match covers.
    pub word_count: usize,
    /// The matched document text, original case.
    pub matched_text: String,
    /// Similarity of the matched word to the keyword; 1.0 outside fuzzy mode.
    pub similarity: f64,
    /// Window of words before the match, joined with single spaces.
    pub words_before: String,
    /// Window of words after the match, joined with single spaces.
    pub words_after: String,
    /// The match with both windows around it.
    pub context: String,
}

impl AcceptedMatch {
    /// Promotes a validated candidate, attaching its window text.
    pub(crate) fn new(candidate: MatchCandidate, words_before: String, words_after: String) -> Self {
        let mut context = String::new();
        if !words_before.is_empty() {
            context.push_str(&words_before);
            context.push(' ');
        }
        context.push_str(&candidate.matched_text);
        if !words_after.is_empty() {
            context.push(' ');
            context.push_str(&words_after);
        }
        Self {
            position: candidate.position,
            word_index: candidate.word_index,
            word_count: candidate.word_count,
            matched_text: candidate.matched_text,
            similarity: candidate.similarity,
            words_before,
            words_after,
            context,
        }
    }
}

/// The outcome of scanning one document for one keyword configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordResult {
    /// Identity of the configuration that produced this result.
    pub config_id: ConfigId,
    /// The configured word.
    pub word: String,
    /// The configured category tag.
    pub category: String,
    /// Number of accepted matches. Always equals `matches.len()`.
    pub count: usize,
    /// Accepted matches in document scan order.
    pub matches: Vec<AcceptedMatch>,
    /// Set when the unit failed internally and was recorded with zero matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl KeywordResult {
    /// Builds a result from the accepted matches of one unit.
    pub(crate) fn from_matches(config: &KeywordConfig, matches: Vec<AcceptedMatch>) -> Self {
        Self {
            config_id: config.id(),
            word: config.word.clone(),
            category: config.category.clone(),
            count: matches.len(),
            matches,
            diagnostic: None,
        }
    }

    /// Records a failed unit as zero matches with a diagnostic message.
    pub(crate) fn failed(config: &KeywordConfig, diagnostic: String) -> Self {
        Self {
            config_id: config.id(),
            word: config.word.clone(),
            category: config.category.clone(),
            count: 0,
            matches: Vec::new(),
            diagnostic: Some(diagnostic),
        }
    }
}

/// All keyword results for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentResult {
    /// Id of the analyzed document.
    pub document_id: DocumentId,
    /// Display name of the analyzed document.
    pub document_name: String,
    /// Results keyed by configuration identity.
    pub keywords: BTreeMap<ConfigId, KeywordResult>,
}

impl DocumentResult {
    /// Looks up the result for one configuration.
    pub fn result_for(&self, id: ConfigId) -> Option<&KeywordResult> {
        self.keywords.get(&id)
    }

    /// Total accepted matches across every configuration.
    pub fn total_matches(&self) -> usize {
        self.keywords.values().map(|result| result.count).sum()
    }
}

/// The outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// One result per document, in input order.
    pub documents: Vec<DocumentResult>,
    /// False when cancellation stopped the run before every unit finished.
    pub complete: bool,
}

impl AnalysisReport {
    /// Total accepted matches across every document and configuration.
    pub fn total_matches(&self) -> usize {
        self.documents.iter().map(DocumentResult::total_matches).sum()
    }

    /// Iterates the per-document results for one configuration.
    pub fn results_for(&self, id: ConfigId) -> impl Iterator<Item = (&DocumentResult, &KeywordResult)> {
        self.documents
            .iter()
            .filter_map(move |document| document.keywords.get(&id).map(|result| (document, result)))
    }
}
