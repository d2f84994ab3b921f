//! Document model and text preparation for kwic.
//!
//! A [`Document`] is an in-memory piece of text with an opaque id and a
//! display name. This crate owns everything that happens to text before
//! matching: loading from disk, the optional preprocessing stage, and
//! whitespace tokenization with byte-offset to word-index mapping.

#![warn(missing_docs)]

mod error;
mod preprocess;
mod token;

use std::{fmt, fs, path::Path};

use kwic_config::AnalysisSettings;
use serde::Serialize;

pub use error::DocumentError;
pub use preprocess::preprocess;
pub use token::{Span, TokenizedText};

/// Opaque document identifier, unique within a batch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An in-memory text document ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Opaque identifier, unique within a batch.
    pub id: DocumentId,
    /// Human readable name shown in results.
    pub name: String,
    /// The text to analyze. May be empty.
    pub content: String,
}

impl Document {
    /// Creates a document from its parts.
    pub fn new(
        id: impl Into<DocumentId>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Returns true when the path has an extension kwic can read.
pub fn is_supported_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("txt" | "md" | "markdown")
    )
}

/// Reads a document from disk, applying the given preprocessing settings.
///
/// Supported extensions are `.txt`, `.md` and `.markdown`; all are treated
/// as plain text. The path string becomes the document id and the file stem
/// its name.
pub fn read_document(path: &Path, settings: &AnalysisSettings) -> Result<Document, DocumentError> {
    if !is_supported_file(path) {
        return Err(DocumentError::UnsupportedFileType {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Document::new(
        path.display().to_string(),
        name,
        preprocess(&content, settings),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_display_round_trips() {
        let id = DocumentId::new("doc-1");
        assert_eq!(id.to_string(), "doc-1");
        assert_eq!(id.as_str(), "doc-1");
        assert_eq!(DocumentId::from("doc-1"), id);
    }

    #[test]
    fn read_document_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        fs::write(&path, "carbon cycle notes").unwrap();

        let doc = read_document(&path, &AnalysisSettings::default()).unwrap();
        assert_eq!(doc.name, "report");
        assert_eq!(doc.content, "carbon cycle notes");
        assert_eq!(doc.id.as_str(), path.display().to_string());
    }

    #[test]
    fn read_document_applies_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        fs::write(&path, "Carbon, CYCLE!").unwrap();

        let settings = AnalysisSettings {
            strip_punctuation: true,
            normalize: true,
            ignore_references: false,
        };
        let doc = read_document(&path, &settings).unwrap();
        assert_eq!(doc.content, "carbon cycle");
    }

    #[test]
    fn read_document_rejects_unknown_extension() {
        let result = read_document(Path::new("slides.pdf"), &AnalysisSettings::default());
        assert!(matches!(
            result.unwrap_err(),
            DocumentError::UnsupportedFileType { .. }
        ));
    }

    #[test]
    fn read_document_missing_file() {
        let result = read_document(
            Path::new("/nonexistent/report.txt"),
            &AnalysisSettings::default(),
        );
        assert!(matches!(result.unwrap_err(), DocumentError::ReadFile { .. }));
    }
}
