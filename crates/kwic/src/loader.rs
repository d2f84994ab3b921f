//! Document loading for the command line.
//!
//! Command line paths may be files or directories. Directories are walked
//! recursively with hidden entries skipped; unreadable files are collected
//! as warnings rather than aborting the run.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use kwic_config::AnalysisSettings;
use kwic_document::{Document, is_supported_file, read_document};
use walkdir::WalkDir;

/// Documents gathered from the command line, in discovery order.
pub struct LoadedDocuments {
    /// Successfully read documents.
    pub documents: Vec<Document>,
    /// One line per file that was skipped, with the reason.
    pub skipped: Vec<String>,
}

/// Loads every readable document under the given paths.
///
/// Files are read as given and any failure is reported. Directories are
/// walked recursively; files with unsupported extensions are passed over
/// silently during a walk, since most trees contain plenty of them.
pub fn load_documents(paths: &[PathBuf], settings: &AnalysisSettings) -> LoadedDocuments {
    let mut loaded = LoadedDocuments {
        documents: Vec::new(),
        skipped: Vec::new(),
    };
    for path in paths {
        if path.is_dir() {
            load_directory(path, settings, &mut loaded);
        } else {
            load_file(path, settings, &mut loaded);
        }
    }
    loaded
}

/// Walks `root` and loads every supported file under it.
fn load_directory(root: &Path, settings: &AnalysisSettings, loaded: &mut LoadedDocuments) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        // The root itself may be hidden ("." is); only prune below it.
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                loaded.skipped.push(format!("{}: {error}", root.display()));
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_supported_file(entry.path()) {
            continue;
        }
        load_file(entry.path(), settings, loaded);
    }
}

/// Reads one file into a document, recording a failure as skipped.
fn load_file(path: &Path, settings: &AnalysisSettings, loaded: &mut LoadedDocuments) {
    match read_document(path, settings) {
        Ok(document) => loaded.documents.push(document),
        Err(error) => loaded.skipped.push(error.to_string()),
    }
}

/// Checks if a file name is hidden (starts with '.').
fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with('.'))
}
