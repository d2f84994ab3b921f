//! kwic: keyword-in-context analysis
//!
//! A batch keyword matcher for text corpora. Users describe keywords in a
//! TOML file; kwic scans a set of documents for them, validates the words
//! around each hit against optional context rules, and reports per-document
//! match counts, full match listings, and word trees of the phrases leading
//! into and out of a keyword.

#![warn(missing_docs)]
