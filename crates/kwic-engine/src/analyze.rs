//! Batch analysis over (document, configuration) units.

use std::collections::BTreeMap;
use std::sync::Mutex;

use kwic_config::KeywordConfig;
use kwic_document::{Document, TokenizedText};
use rayon::prelude::*;

use crate::error::EngineError;
use crate::locate::CompiledKeyword;
use crate::observer::{AnalysisObserver, CancelToken, SilentObserver};
use crate::result::{AcceptedMatch, AnalysisReport, DocumentResult, KeywordResult, MatchCandidate};

/// Options controlling one analysis run.
pub struct AnalysisOptions<'a> {
    /// Receives progress and per-unit diagnostics.
    pub observer: &'a dyn AnalysisObserver,
    /// Checked at unit boundaries; cancellation keeps finished units.
    pub cancel: CancelToken,
    /// Run documents one after another instead of on the thread pool.
    pub sequential: bool,
}

impl Default for AnalysisOptions<'_> {
    fn default() -> Self {
        Self {
            observer: &SilentObserver,
            cancel: CancelToken::new(),
            sequential: false,
        }
    }
}

/// Scans every document for every keyword configuration.
///
/// Documents run in parallel unless [`AnalysisOptions::sequential`] is set;
/// the configurations of one document run in order on whichever worker
/// tokenized it. Each document is tokenized exactly once. Results come back
/// in input document order regardless of completion order, and a unit that
/// fails is recorded with zero matches and a diagnostic instead of aborting
/// the batch.
pub fn analyze(
    documents: &[Document],
    configs: &[KeywordConfig],
    options: &AnalysisOptions<'_>,
) -> AnalysisReport {
    let prepared: Vec<PreparedKeyword<'_>> = configs.iter().map(PreparedKeyword::new).collect();
    let runner = Runner {
        prepared: &prepared,
        total: documents.len() * configs.len(),
        progress: Mutex::new(0),
        options,
    };
    let results: Vec<DocumentResult> = if options.sequential {
        documents.iter().map(|document| runner.analyze_document(document)).collect()
    } else {
        documents.par_iter().map(|document| runner.analyze_document(document)).collect()
    };
    let complete = runner.completed() == runner.total;
    AnalysisReport { documents: results, complete }
}

/// A configuration prepared for scanning, or the preparation failure that
/// gets recorded against every document it would have scanned.
struct PreparedKeyword<'a> {
    /// The source configuration.
    config: &'a KeywordConfig,
    /// The compiled form, or the message every unit of it will report.
    compiled: Result<CompiledKeyword<'a>, String>,
}

impl<'a> PreparedKeyword<'a> {
    /// Compiles the configuration, capturing any failure as its message.
    fn new(config: &'a KeywordConfig) -> Self {
        let compiled = CompiledKeyword::new(config).map_err(|error| error.to_string());
        Self { config, compiled }
    }
}

/// Per-run scan state shared by all worker threads.
struct Runner<'a> {
    /// Configurations compiled once for the whole batch.
    prepared: &'a [PreparedKeyword<'a>],
    /// Number of (document, configuration) units in the batch.
    total: usize,
    /// Units finished so far. Guards the observer callback as well, so
    /// observed counts never go backwards across worker threads.
    progress: Mutex<usize>,
    /// Observer, cancellation token and mode flags from the caller.
    options: &'a AnalysisOptions<'a>,
}

impl Runner<'_> {
    /// Tokenizes one document and scans it with every prepared keyword.
    fn analyze_document(&self, document: &Document) -> DocumentResult {
        let tokens = TokenizedText::new(&document.content);
        let mut keywords = BTreeMap::new();
        for keyword in self.prepared {
            if self.options.cancel.is_cancelled() {
                break;
            }
            let result = match &keyword.compiled {
                Ok(compiled) => run_unit(document, &tokens, compiled).unwrap_or_else(|error| {
                    self.report_unit_error(document, keyword.config, &error.to_string())
                }),
                Err(message) => self.report_unit_error(document, keyword.config, message),
            };
            keywords.insert(result.config_id, result);
            self.record_unit();
        }
        DocumentResult {
            document_id: document.id.clone(),
            document_name: document.name.clone(),
            keywords,
        }
    }

    /// Notifies the observer of a failed unit and builds its zero-count
    /// result.
    fn report_unit_error(&self, document: &Document, config: &KeywordConfig, message: &str) -> KeywordResult {
        self.options.observer.on_unit_error(&document.id, config.id(), message);
        KeywordResult::failed(config, message.to_string())
    }

    /// Counts one finished unit and publishes the new progress.
    fn record_unit(&self) {
        let mut completed = self.progress.lock().expect("progress lock poisoned");
        *completed += 1;
        self.options.observer.on_progress(*completed, self.total);
    }

    /// Units finished over the whole run.
    fn completed(&self) -> usize {
        *self.progress.lock().expect("progress lock poisoned")
    }
}

/// Scans one unit: locates candidates, validates their context, and
/// captures the word windows of the survivors.
fn run_unit(
    document: &Document,
    tokens: &TokenizedText<'_>,
    keyword: &CompiledKeyword<'_>,
) -> Result<KeywordResult, EngineError> {
    let mut matches = Vec::new();
    for candidate in keyword.locate(tokens) {
        check_candidate(&candidate, document, tokens, &keyword.config.word)?;
        if !keyword.context.accepts(tokens, candidate.word_index, candidate.word_count) {
            continue;
        }
        let (before, after) = keyword.context.windows(tokens, candidate.word_index, candidate.word_count);
        let words_before = tokens.window_text(before);
        let words_after = tokens.window_text(after);
        matches.push(AcceptedMatch::new(candidate, words_before, words_after));
    }
    Ok(KeywordResult::from_matches(keyword.config, matches))
}

/// Bounds check between locator output and the tokenized document.
fn check_candidate(
    candidate: &MatchCandidate,
    document: &Document,
    tokens: &TokenizedText<'_>,
    word: &str,
) -> Result<(), EngineError> {
    let in_content = candidate.position <= document.content.len();
    let in_tokens = candidate.word_count >= 1 && candidate.word_index + candidate.word_count <= tokens.len();
    if in_content && in_tokens {
        return Ok(());
    }
    Err(EngineError::Internal {
        document: document.id.clone(),
        word: word.to_string(),
        detail: format!(
            "candidate at byte {} covers words {}..{} of {}",
            candidate.position,
            candidate.word_index,
            candidate.word_index + candidate.word_count,
            tokens.len()
        ),
    })
}

#[cfg(test)]
mod tests {
    use kwic_config::{ConfigId, ContextLogic, ContextMatch, ContextRule, TermMatch};
    use kwic_document::DocumentId;

    use super::*;

    fn doc(content: &str) -> Document {
        Document::new("doc-1.txt", "doc-1", content)
    }

    fn doc_named(name: &str) -> Document {
        Document::new(name, name.trim_end_matches(".txt"), "the fox")
    }

    fn run(documents: &[Document], configs: &[KeywordConfig]) -> AnalysisReport {
        analyze(documents, configs, &AnalysisOptions::default())
    }

    fn count_in(report: &AnalysisReport, document: usize, config: &KeywordConfig) -> usize {
        report.documents[document]
            .result_for(config.id())
            .map_or(0, |result| result.count)
    }

    fn context_rule(terms: &[&str], range: usize) -> ContextRule {
        ContextRule {
            terms: terms.iter().map(ToString::to_string).collect(),
            range,
            term_match: ContextMatch::Exact,
        }
    }

    #[test]
    fn counts_overlapping_exact_occurrences() {
        let mut config = KeywordConfig::new("aa");
        config.term_match = TermMatch::Exact;
        let report = run(&[doc("aaa")], &[config.clone()]);
        let result = report.documents[0].result_for(config.id()).unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(result.matches[0].position, 0);
        assert_eq!(result.matches[1].position, 1);
    }

    #[test]
    fn fuzzy_threshold_splits_accept_and_reject() {
        let mut loose = KeywordConfig::new("color");
        loose.term_match = TermMatch::Fuzzy { threshold: 0.8 };
        let mut strict = KeywordConfig::new("color");
        strict.term_match = TermMatch::Fuzzy { threshold: 0.9 };
        let report = run(&[doc("colour")], &[loose.clone(), strict.clone()]);
        assert_eq!(count_in(&report, 0, &loose), 1);
        assert_eq!(count_in(&report, 0, &strict), 0);
    }

    #[test]
    fn and_logic_needs_both_sides_or_logic_needs_one() {
        let text = "the quick brown fox jumps";
        let mut both = KeywordConfig::new("fox");
        both.before = context_rule(&["brown"], 2);
        both.after = context_rule(&["river"], 2);
        let mut either = both.clone();
        either.logic = ContextLogic::Or;
        let report = run(&[doc(text)], &[both.clone(), either.clone()]);
        assert_eq!(count_in(&report, 0, &both), 0);
        assert_eq!(count_in(&report, 0, &either), 1);
    }

    #[test]
    fn phrase_match_captures_surrounding_windows() {
        let config = KeywordConfig::new("primary production");
        let report = run(&[doc("net primary production rate")], &[config.clone()]);
        let result = report.documents[0].result_for(config.id()).unwrap();
        assert_eq!(result.count, 1);
        let accepted = &result.matches[0];
        assert_eq!(accepted.matched_text, "primary production");
        assert_eq!(accepted.words_before, "net");
        assert_eq!(accepted.words_after, "rate");
        assert_eq!(accepted.context, "net primary production rate");
    }

    #[test]
    fn same_word_with_different_flags_stays_isolated() {
        let insensitive = KeywordConfig::new("fox");
        let mut sensitive = KeywordConfig::new("fox");
        sensitive.case_sensitive = true;
        let report = run(&[doc("Fox fox")], &[insensitive.clone(), sensitive.clone()]);
        assert_ne!(insensitive.id(), sensitive.id());
        assert_eq!(count_in(&report, 0, &insensitive), 2);
        assert_eq!(count_in(&report, 0, &sensitive), 1);
        assert_eq!(report.documents[0].keywords.len(), 2);
    }

    #[test]
    fn empty_document_still_gets_a_result() {
        let config = KeywordConfig::new("fox");
        let report = run(&[doc("")], &[config.clone()]);
        let result = report.documents[0].result_for(config.id()).unwrap();
        assert_eq!(result.count, 0);
        assert!(result.matches.is_empty());
        assert!(report.complete);
    }

    #[test]
    fn match_windows_use_the_configured_ranges() {
        let mut config = KeywordConfig::new("fox");
        config.before.range = 3;
        config.after.range = 2;
        let report = run(&[doc("one two three four fox five six seven")], &[config.clone()]);
        let accepted = &report.documents[0].result_for(config.id()).unwrap().matches[0];
        assert_eq!(accepted.words_before, "two three four");
        assert_eq!(accepted.words_after, "five six");
    }

    #[test]
    fn variants_widen_the_match_set() {
        let plain = KeywordConfig::new("rate");
        let mut wide = KeywordConfig::new("rate");
        wide.include_variants = true;
        let report = run(&[doc("rates rated rating")], &[plain.clone(), wide.clone()]);
        assert_eq!(count_in(&report, 0, &plain), 0);
        assert_eq!(count_in(&report, 0, &wide), 3);
    }

    #[test]
    fn threshold_zero_fuzzy_agrees_with_word_mode() {
        let word = KeywordConfig::new("fox");
        let mut zero = KeywordConfig::new("fox");
        zero.term_match = TermMatch::Fuzzy { threshold: 0.0 };
        let report = run(&[doc("fox fix foxes Fox")], &[word.clone(), zero.clone()]);
        assert_eq!(count_in(&report, 0, &word), count_in(&report, 0, &zero));
        assert_eq!(count_in(&report, 0, &zero), 2);
    }

    #[test]
    fn documents_keep_input_order() {
        let documents = vec![doc_named("c.txt"), doc_named("a.txt"), doc_named("b.txt")];
        let report = run(&documents, &[KeywordConfig::new("fox")]);
        let names: Vec<_> = report.documents.iter().map(|d| d.document_name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let documents = vec![
            doc_named("a.txt"),
            Document::new("b.txt", "b", "fox foxes colour fox"),
            Document::new("c.txt", "c", ""),
        ];
        let mut fuzzy = KeywordConfig::new("color");
        fuzzy.term_match = TermMatch::Fuzzy { threshold: 0.8 };
        let configs = vec![KeywordConfig::new("fox"), fuzzy];
        let parallel = analyze(&documents, &configs, &AnalysisOptions::default());
        let sequential = analyze(
            &documents,
            &configs,
            &AnalysisOptions { sequential: true, ..AnalysisOptions::default() },
        );
        assert_eq!(parallel, sequential);
        assert!(parallel.complete);
    }

    struct RecordingObserver {
        calls: Mutex<Vec<(usize, usize)>>,
    }

    impl AnalysisObserver for RecordingObserver {
        fn on_progress(&self, completed: usize, total: usize) {
            self.calls.lock().unwrap().push((completed, total));
        }

        fn on_unit_error(&self, _document: &DocumentId, _config: ConfigId, _message: &str) {}
    }

    #[test]
    fn progress_is_monotonic_and_reaches_total() {
        let documents = vec![doc_named("a.txt"), doc_named("b.txt")];
        let configs = vec![KeywordConfig::new("fox"), KeywordConfig::new("the")];
        let observer = RecordingObserver { calls: Mutex::new(Vec::new()) };
        let options = AnalysisOptions { observer: &observer, ..AnalysisOptions::default() };
        analyze(&documents, &configs, &options);
        let calls = observer.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls.last(), Some(&(4, 4)));
        for pair in calls.windows(2) {
            assert!(pair[0].0 <= pair[1].0);
        }
        assert!(calls.iter().all(|(_, total)| *total == 4));
    }

    #[test]
    fn cancelled_run_returns_partial_results() {
        let token = CancelToken::new();
        token.cancel();
        let options = AnalysisOptions { cancel: token, ..AnalysisOptions::default() };
        let report = analyze(&[doc("the fox")], &[KeywordConfig::new("fox")], &options);
        assert!(!report.complete);
        assert!(report.documents[0].keywords.is_empty());
    }

    struct CancelAfterFirst {
        token: CancelToken,
    }

    impl AnalysisObserver for CancelAfterFirst {
        fn on_progress(&self, completed: usize, _total: usize) {
            if completed == 1 {
                self.token.cancel();
            }
        }

        fn on_unit_error(&self, _document: &DocumentId, _config: ConfigId, _message: &str) {}
    }

    #[test]
    fn cancellation_mid_run_keeps_finished_units() {
        let token = CancelToken::new();
        let observer = CancelAfterFirst { token: token.clone() };
        let options = AnalysisOptions {
            observer: &observer,
            cancel: token,
            sequential: true,
        };
        let configs = vec![
            KeywordConfig::new("fox"),
            KeywordConfig::new("the"),
            KeywordConfig::new("dog"),
        ];
        let report = analyze(&[doc("the fox")], &configs, &options);
        assert!(!report.complete);
        assert_eq!(report.documents[0].keywords.len(), 1);
        assert_eq!(count_in(&report, 0, &configs[0]), 1);
    }

    #[test]
    fn report_serializes_with_hex_config_keys() {
        let config = KeywordConfig::new("fox");
        let report = run(&[doc("the fox")], &[config]);
        let json = serde_json::to_value(&report).unwrap();
        let keywords = json["documents"][0]["keywords"].as_object().unwrap();
        assert_eq!(keywords.len(), 1);
        let key = keywords.keys().next().unwrap();
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(json["complete"], true);
    }
}
