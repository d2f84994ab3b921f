//! Word trees over accepted matches.
//!
//! A word tree shows which word sequences most often lead into and out of
//! a keyword across its matches. Every accepted match contributes one path
//! to each side: the `before` tree reads nearest-word-first toward the
//! start of the document, the `after` tree reads in document order. Counts
//! accumulate where paths share a prefix, so sibling weight encodes how
//! often a phrasing occurs.
//!
//! Trees are built on demand from an [`AnalysisReport`], never during the
//! scan itself.

#![warn(missing_docs)]

use kwic_config::ConfigId;
use kwic_document::DocumentId;
use kwic_engine::{AcceptedMatch, AnalysisReport};
use serde::Serialize;

/// Default number of words taken from each side of a match.
pub const DEFAULT_TREE_WINDOW: usize = 5;

/// Options for building a word tree from an analysis report.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Number of words taken from each side of a match. A display
    /// parameter, independent of the matching context ranges.
    pub window: usize,
    /// Restrict the tree to matches from one document.
    pub document: Option<DocumentId>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self { window: DEFAULT_TREE_WINDOW, document: None }
    }
}

/// A node in a word tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordTreeNode {
    /// The word at this node, lowercased and trimmed of punctuation.
    pub word: String,
    /// Number of matches whose window passes through this node.
    pub count: usize,
    /// Continuations, in first-seen order.
    pub children: Vec<WordTreeNode>,
}

/// Frequency trees of the word sequences around one keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordTree {
    /// The keyword at the junction of the two trees. The after tree hangs
    /// off this word; the before tree's root carries no word of its own.
    pub keyword: String,
    /// Number of matches the trees were built from.
    pub match_count: usize,
    /// First-level nodes of the before tree, nearest word first.
    pub before: Vec<WordTreeNode>,
    /// First-level nodes of the after tree, in document order.
    pub after: Vec<WordTreeNode>,
}

impl WordTree {
    /// Builds the trees for one keyword from a match list.
    ///
    /// Takes the last `window` words before each match and the first
    /// `window` words after it. Each match contributes exactly one path
    /// per side, so a node count never exceeds the match count.
    pub fn from_matches<'a, I>(keyword: &str, matches: I, window: usize) -> Self
    where
        I: IntoIterator<Item = &'a AcceptedMatch>,
    {
        let mut tree = Self {
            keyword: keyword.to_string(),
            match_count: 0,
            before: Vec::new(),
            after: Vec::new(),
        };
        for accepted in matches {
            tree.match_count += 1;
            insert_path(&mut tree.before, tree_words(&accepted.words_before).rev().take(window));
            insert_path(&mut tree.after, tree_words(&accepted.words_after).take(window));
        }
        tree
    }

    /// Sorts every level by descending count; ties keep first-seen order.
    pub fn sort_by_count(&mut self) {
        sort_nodes(&mut self.before);
        sort_nodes(&mut self.after);
    }
}

/// Builds the word tree for one configuration from a report, optionally
/// restricted to one document.
///
/// Returns `None` when the report holds no result for the configuration,
/// or none within the filtered document.
pub fn build_word_tree(report: &AnalysisReport, config: ConfigId, options: &TreeOptions) -> Option<WordTree> {
    let mut keyword: Option<&str> = None;
    let mut matches: Vec<&AcceptedMatch> = Vec::new();
    for document in &report.documents {
        if let Some(filter) = &options.document
            && document.document_id != *filter
        {
            continue;
        }
        let Some(result) = document.result_for(config) else {
            continue;
        };
        keyword.get_or_insert(&result.word);
        matches.extend(result.matches.iter());
    }
    keyword.map(|word| WordTree::from_matches(word, matches, options.window))
}

/// Cleans window text into tree words: lowercased, punctuation trimmed
/// from the edges, empties dropped.
fn tree_words(text: &str) -> impl DoubleEndedIterator<Item = String> + '_ {
    text.split_whitespace().filter_map(|word| {
        let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    })
}

/// Inserts one word path, bumping the count of every traversed node. New
/// siblings go to the back, keeping first-seen order stable.
fn insert_path(nodes: &mut Vec<WordTreeNode>, words: impl Iterator<Item = String>) {
    let mut current = nodes;
    for word in words {
        let index = match current.iter().position(|node| node.word == word) {
            Some(index) => index,
            None => {
                current.push(WordTreeNode { word, count: 0, children: Vec::new() });
                current.len() - 1
            }
        };
        current[index].count += 1;
        current = &mut current[index].children;
    }
}

/// Sorts one sibling level and every level below it. The sort is stable,
/// so equal counts keep their insertion order.
fn sort_nodes(nodes: &mut [WordTreeNode]) {
    nodes.sort_by(|a, b| b.count.cmp(&a.count));
    for node in nodes {
        sort_nodes(&mut node.children);
    }
}
