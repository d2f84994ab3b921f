//! Keyword match engine for kwic.
//!
//! This crate scans documents for configured keywords and reports every
//! accepted match with its surrounding words. It handles:
//! - Similarity scoring over normalized Levenshtein distance
//! - Match location in exact, phrase, and single-word (plain or fuzzy) modes
//! - Context validation with per-side rules and and/or combination logic
//! - Parallel batch runs with progress reporting and cooperative cancellation
//!
//! # Example
//!
//! ```
//! use kwic_config::KeywordConfig;
//! use kwic_document::Document;
//! use kwic_engine::{AnalysisOptions, analyze};
//!
//! let documents = vec![Document::new("notes.txt", "notes", "the quick brown fox")];
//! let configs = vec![KeywordConfig::new("fox")];
//!
//! let report = analyze(&documents, &configs, &AnalysisOptions::default());
//! assert_eq!(report.total_matches(), 1);
//! assert!(report.complete);
//! ```

#![warn(missing_docs)]

mod analyze;
mod context;
mod error;
mod locate;
mod observer;
mod result;
mod similarity;
mod variants;

pub use analyze::{AnalysisOptions, analyze};
pub use error::EngineError;
pub use observer::{AnalysisObserver, CancelToken, SilentObserver};
pub use result::{AcceptedMatch, AnalysisReport, DocumentResult, KeywordResult, MatchCandidate};
pub use similarity::{edit_distance, equals, fuzzy_matches, similarity};
pub use variants::word_variants;
