//! Rendering of analysis results: tables, match listings, trees, JSON.

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use kwic_config::{AnalysisSettings, ConfigId, KeywordConfig, KeywordSet};
use kwic_document::{Document, TokenizedText};
use kwic_engine::{AcceptedMatch, AnalysisReport, DocumentResult};
use kwic_tree::{WordTree, WordTreeNode};
use serde::Serialize;

/// Prints the per-document count table followed by a totals line.
///
/// Rows are ordered documents outermost, keywords in file order, so
/// the table reads the same way the keywords file does.
pub fn print_summary(set: &KeywordSet, report: &AnalysisReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Document", "Keyword", "Category", "Mode", "Matches"]);

    for document in &report.documents {
        for config in &set.keywords {
            let Some(result) = document.result_for(config.id()) else {
                continue;
            };
            table.add_row(vec![
                Cell::new(&document.document_name),
                Cell::new(&result.word),
                Cell::new(&result.category),
                Cell::new(config.term_match.to_string()),
                Cell::new(result.count.to_string()),
            ]);
        }
    }

    println!("{table}");
    println!(
        "{} documents, {} keywords, {} matches",
        report.documents.len(),
        set.keywords.len(),
        report.total_matches()
    );
}

/// Prints every accepted match as a keyword-in-context line, grouped by
/// document and keyword.
pub fn print_matches(set: &KeywordSet, report: &AnalysisReport) {
    for document in &report.documents {
        for config in &set.keywords {
            let Some(result) = document.result_for(config.id()) else {
                continue;
            };
            if result.matches.is_empty() {
                continue;
            }
            println!();
            println!("{}: {} ({})", document.document_name, result.word, result.count);
            for accepted in &result.matches {
                println!("{}", match_line(accepted));
            }
        }
    }
}

/// Formats one match as `offset  before [matched] after`.
fn match_line(accepted: &AcceptedMatch) -> String {
    let mut line = format!("  {:>8}  ", accepted.position);
    if !accepted.words_before.is_empty() {
        line.push_str(&accepted.words_before);
        line.push(' ');
    }
    line.push('[');
    line.push_str(&accepted.matched_text);
    line.push(']');
    if !accepted.words_after.is_empty() {
        line.push(' ');
        line.push_str(&accepted.words_after);
    }
    line
}

/// JSON envelope for `analyze --json`.
///
/// Keyword descriptors carry the id each per-document result is keyed
/// by, so consumers can join the two without re-deriving identities.
#[derive(Serialize)]
struct JsonReport<'a> {
    /// One descriptor per configured keyword, in file order.
    keywords: Vec<KeywordDescriptor<'a>>,
    /// Per-document results, in scan order.
    documents: &'a [DocumentResult],
    /// False when the run was cancelled before every unit finished.
    complete: bool,
}

/// Identity and display fields for one configured keyword.
#[derive(Serialize)]
struct KeywordDescriptor<'a> {
    /// Identity key used in the per-document result maps.
    id: ConfigId,
    /// The configured word or phrase.
    word: &'a str,
    /// Free-form category tag.
    category: &'a str,
    /// Human readable match mode.
    mode: String,
}

/// Prints the full report as pretty JSON on stdout.
pub fn print_json_report(set: &KeywordSet, report: &AnalysisReport) -> serde_json::Result<()> {
    let envelope = JsonReport {
        keywords: set
            .keywords
            .iter()
            .map(|config| KeywordDescriptor {
                id: config.id(),
                word: &config.word,
                category: &config.category,
                mode: config.term_match.to_string(),
            })
            .collect(),
        documents: &report.documents,
        complete: report.complete,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Prints one word tree as indented text.
///
/// Call [`WordTree::sort_by_count`] first if branches should lead with
/// the most frequent continuations.
pub fn print_tree(tree: &WordTree, config: &KeywordConfig) {
    println!(
        "{}  [{}]  {} {}",
        tree.keyword,
        config.id(),
        tree.match_count,
        if tree.match_count == 1 { "match" } else { "matches" }
    );
    println!("  before:");
    print_nodes(&tree.before, 2);
    println!("  after:");
    print_nodes(&tree.after, 2);
}

/// Prints tree nodes recursively, two spaces per level.
fn print_nodes(nodes: &[WordTreeNode], depth: usize) {
    for node in nodes {
        println!("{}{} ({})", "  ".repeat(depth), node.word, node.count);
        print_nodes(&node.children, depth + 1);
    }
}

/// One tree in the `tree --json` output array.
#[derive(Serialize)]
struct TreeEntry<'a> {
    /// Identity of the configuration the tree was built for.
    config: ConfigId,
    /// Free-form category tag of that configuration.
    category: &'a str,
    /// The tree itself: keyword, match count, before and after branches.
    #[serde(flatten)]
    tree: &'a WordTree,
}

/// Prints word trees as a JSON array on stdout, one entry per
/// configuration that produced a tree.
pub fn print_trees_json(trees: &[(&KeywordConfig, WordTree)]) -> serde_json::Result<()> {
    let entries: Vec<TreeEntry<'_>> = trees
        .iter()
        .map(|(config, tree)| TreeEntry {
            config: config.id(),
            category: &config.category,
            tree,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

/// Prints how a document was read and tokenized.
pub fn print_inspection(document: &Document, settings: &AnalysisSettings) {
    let tokens = TokenizedText::new(&document.content);
    println!("Document: {}", document.name);
    println!("Id:       {}", document.id);
    println!(
        "Settings: strip_punctuation={} normalize={} ignore_references={}",
        settings.strip_punctuation, settings.normalize, settings.ignore_references
    );
    println!(
        "Content:  {} bytes, {} words",
        document.content.len(),
        tokens.len()
    );
    let preview: Vec<&str> = tokens.tokens().take(12).collect();
    if !preview.is_empty() {
        println!("Words:    {}", preview.join(" "));
    }
}
