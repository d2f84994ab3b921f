//! Command-line interface for the `kwic` keyword analysis tool.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use kwic_config::{AnalysisSettings, KEYWORDS_FILENAME, KeywordConfig, KeywordSet};
use kwic_document::{Document, DocumentId, read_document};
use kwic_engine::{AnalysisOptions, AnalysisReport, analyze};
use kwic_tree::{DEFAULT_TREE_WINDOW, TreeOptions, WordTree, build_word_tree};

mod loader;
mod output;
mod progress;

#[derive(Parser)]
#[command(name = "kwic")]
#[command(about = "Keyword-in-context analysis for text corpora")]
/// Top-level CLI options.
struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    command: Commands,
}

#[derive(Subcommand)]
/// Supported `kwic` subcommands.
enum Commands {
    /// Scan documents for the configured keywords
    Analyze {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Keywords file to use
        #[arg(short = 'k', long, default_value = KEYWORDS_FILENAME)]
        keywords: PathBuf,

        /// Print every match with its surrounding words
        #[arg(long)]
        matches: bool,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,

        /// Scan documents one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Do not draw a progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Show word trees of the phrases around a keyword's matches
    Tree {
        /// The keyword to build trees for
        word: String,

        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Keywords file to use
        #[arg(short = 'k', long, default_value = KEYWORDS_FILENAME)]
        keywords: PathBuf,

        /// Words shown on each side of the keyword
        #[arg(long, default_value_t = DEFAULT_TREE_WINDOW)]
        window: usize,

        /// Only use matches from this document id
        #[arg(long)]
        document: Option<String>,

        /// Output the trees as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how kwic reads and tokenizes a file
    Inspect {
        /// File to inspect
        file: PathBuf,

        /// Keywords file supplying preprocessing settings
        #[arg(short = 'k', long, default_value = KEYWORDS_FILENAME)]
        keywords: PathBuf,
    },

    /// Create a keywords file in the current directory
    Init {
        /// Overwrite an existing keywords file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            paths,
            keywords,
            matches,
            json,
            sequential,
            no_progress,
        } => cmd_analyze(&paths, &keywords, matches, json, sequential, no_progress),
        Commands::Tree {
            word,
            paths,
            keywords,
            window,
            document,
            json,
        } => cmd_tree(&word, &paths, &keywords, window, document.as_deref(), json),
        Commands::Inspect { file, keywords } => cmd_inspect(&file, &keywords),
        Commands::Init { force } => cmd_init(force),
    }
}

/// Default keywords template with commented examples.
const KEYWORDS_TEMPLATE: &str = include_str!("../templates/keywords.toml");

/// Implements the `kwic analyze` command.
fn cmd_analyze(
    paths: &[PathBuf],
    keywords_path: &Path,
    show_matches: bool,
    json: bool,
    sequential: bool,
    no_progress: bool,
) -> ExitCode {
    let Some(set) = load_keywords(keywords_path) else {
        return ExitCode::FAILURE;
    };
    let Some(documents) = load_corpus(paths, &set.settings) else {
        return ExitCode::FAILURE;
    };

    let report = run_analysis(&documents, &set.keywords, sequential, no_progress || json);

    // Failed units stay in the report as zero-count results.
    for document in &report.documents {
        for result in document.keywords.values() {
            if let Some(diagnostic) = &result.diagnostic {
                eprintln!(
                    "warning: {}: {}: {diagnostic}",
                    document.document_name, result.word
                );
            }
        }
    }
    if !report.complete {
        eprintln!("warning: analysis stopped before finishing");
    }

    if json {
        if let Err(e) = output::print_json_report(&set, &report) {
            eprintln!("error: failed to encode report: {e}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    output::print_summary(&set, &report);
    if show_matches {
        output::print_matches(&set, &report);
    }
    ExitCode::SUCCESS
}

/// Runs the engine, drawing a progress bar unless `quiet` is set.
fn run_analysis(
    documents: &[Document],
    keywords: &[KeywordConfig],
    sequential: bool,
    quiet: bool,
) -> AnalysisReport {
    if quiet {
        let options = AnalysisOptions {
            sequential,
            ..AnalysisOptions::default()
        };
        return analyze(documents, keywords, &options);
    }

    let bar = progress::ScanProgress::new(documents.len() * keywords.len());
    let options = AnalysisOptions {
        observer: &bar,
        sequential,
        ..AnalysisOptions::default()
    };
    let report = analyze(documents, keywords, &options);
    bar.finish();
    report
}

/// Implements the `kwic tree` command.
fn cmd_tree(
    word: &str,
    paths: &[PathBuf],
    keywords_path: &Path,
    window: usize,
    document: Option<&str>,
    json: bool,
) -> ExitCode {
    let Some(set) = load_keywords(keywords_path) else {
        return ExitCode::FAILURE;
    };
    let selected: Vec<KeywordConfig> = set.find_by_word(word).into_iter().cloned().collect();
    if selected.is_empty() {
        eprintln!(
            "error: no keyword entry for '{word}' in {}",
            keywords_path.display()
        );
        return ExitCode::FAILURE;
    }
    let Some(documents) = load_corpus(paths, &set.settings) else {
        return ExitCode::FAILURE;
    };
    if let Some(id) = document
        && !documents.iter().any(|doc| doc.id.as_str() == id)
    {
        eprintln!("error: no document with id '{id}'");
        if let Some(first) = documents.first() {
            eprintln!("document ids are paths as loaded, for example: {}", first.id);
        }
        return ExitCode::FAILURE;
    }

    // Only the selected configurations need scanning.
    let report = analyze(&documents, &selected, &AnalysisOptions::default());

    let options = TreeOptions {
        window,
        document: document.map(DocumentId::from),
    };
    let mut trees: Vec<(&KeywordConfig, WordTree)> = Vec::new();
    for config in &selected {
        if let Some(mut tree) = build_word_tree(&report, config.id(), &options) {
            tree.sort_by_count();
            trees.push((config, tree));
        }
    }

    if json {
        if let Err(e) = output::print_trees_json(&trees) {
            eprintln!("error: failed to encode trees: {e}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    for (index, (config, tree)) in trees.iter().enumerate() {
        if index > 0 {
            println!();
        }
        output::print_tree(tree, config);
    }
    ExitCode::SUCCESS
}

/// Implements the `kwic inspect` command.
fn cmd_inspect(file: &Path, keywords_path: &Path) -> ExitCode {
    // A missing keywords file just means default settings here.
    let settings = if keywords_path.exists() {
        match KeywordSet::load(keywords_path) {
            Ok(set) => set.settings,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        AnalysisSettings::default()
    };

    let document = match read_document(file, &settings) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    output::print_inspection(&document, &settings);
    ExitCode::SUCCESS
}

/// Implements the `kwic init` command.
fn cmd_init(force: bool) -> ExitCode {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("error: could not determine current directory: {e}");
            return ExitCode::FAILURE;
        }
    };
    let path = cwd.join(KEYWORDS_FILENAME);

    // Check if a keywords file already exists
    if path.exists() && !force {
        eprintln!("error: keywords file already exists: {}", path.display());
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    if let Err(e) = fs::write(&path, KEYWORDS_TEMPLATE) {
        eprintln!("error: failed to write {}: {e}", path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", path.display());
    ExitCode::SUCCESS
}

/// Loads and validates the keywords file, printing warnings as they are
/// found. Prints an error and returns `None` when the set is unusable.
fn load_keywords(path: &Path) -> Option<KeywordSet> {
    let set = match KeywordSet::load(path) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("error: {e}");
            return None;
        }
    };
    for warning in &set.warnings {
        eprintln!("warning: {warning}");
    }
    if set.keywords.is_empty() {
        eprintln!("error: no keywords defined in {}", path.display());
        eprintln!("add [[keyword]] entries or run 'kwic init'");
        return None;
    }
    Some(set)
}

/// Loads documents under the given paths, printing a warning per skipped
/// file. Prints an error and returns `None` when nothing could be read.
fn load_corpus(paths: &[PathBuf], settings: &AnalysisSettings) -> Option<Vec<Document>> {
    let loaded = loader::load_documents(paths, settings);
    for skipped in &loaded.skipped {
        eprintln!("warning: {skipped}");
    }
    if loaded.documents.is_empty() {
        eprintln!("error: no readable documents under the given paths");
        return None;
    }
    Some(loaded.documents)
}
