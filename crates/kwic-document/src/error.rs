//! Error types for document loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading documents from disk.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a document file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file extension is not a recognized document type.
    #[error("unsupported file type: {path}")]
    UnsupportedFileType {
        /// Path with the unrecognized extension.
        path: PathBuf,
    },
}
