//! Engine error types.

use kwic_document::DocumentId;
use thiserror::Error;

/// Errors raised while preparing or scanning a single (document,
/// configuration) unit.
///
/// These never abort a batch: the runner records the failing unit with zero
/// matches and a diagnostic, then continues with the remaining units.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A search pattern failed to compile.
    #[error("cannot build search pattern for '{term}': {source}")]
    Pattern {
        /// The offending search term.
        term: String,
        /// The underlying build failure.
        source: regex::Error,
    },

    /// The locator produced a candidate outside the document bounds.
    #[error("scan error for '{word}' in {document}: {detail}")]
    Internal {
        /// The affected document.
        document: DocumentId,
        /// The configured word.
        word: String,
        /// Description of the violated bound.
        detail: String,
    },
}
