//! Batch runner: the only place that touches the file system.
//!
//! A run validates its configuration, walks the target path, and migrates one
//! file at a time. A file that cannot be read, parsed or written is recorded
//! in the report and left as it was; the batch carries on.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::diagnostics::Diagnostic;
use crate::error::{MigrateError, Result};
use crate::source::{parse_languages, Language, ParsedFile};
use crate::transforms::{Registry, Transform, TransformResult};

/// Dependency directories are never migrated.
const DEPENDENCY_DIR: &str = "node_modules";

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub transform: String,
    pub languages: Vec<String>,
    /// A file or a directory.
    pub path: PathBuf,
    /// Regexes matched against each path component below `path`.
    pub ignore: Vec<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Unchanged,
    Rewritten,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub language: Language,
    pub status: FileStatus,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub transform: String,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(FileStatus::Failed) > 0
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|f| &f.diagnostics)
    }

    pub fn file(&self, path: &Path) -> Option<&FileReport> {
        self.files.iter().find(|f| f.path == path)
    }
}

pub fn compile_ignore(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| MigrateError::InvalidIgnorePattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

fn is_excluded(entry: &DirEntry, ignore: &[Regex]) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    name == DEPENDENCY_DIR || ignore.iter().any(|re| re.is_match(name))
}

/// First requested language that claims the file's extension.
fn language_for(path: &Path, languages: &[Language]) -> Option<Language> {
    languages.iter().copied().find(|l| l.matches(path))
}

/// Files under `root` to migrate, each paired with the language it is parsed as.
pub fn discover(root: &Path, languages: &[Language], ignore: &[Regex]) -> Result<Vec<(PathBuf, Language)>> {
    fs::metadata(root).map_err(|e| MigrateError::io(root, e))?;

    let mut files = vec![];
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e, ignore));
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable path");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(language) = language_for(entry.path(), languages) {
            files.push((entry.into_path(), language));
        }
    }
    Ok(files)
}

/// Replace `path` with `contents` through a temporary file in the same directory.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let io = |e| MigrateError::io(path, e);
    let permissions = fs::metadata(path).map_err(io)?.permissions();
    let mut tmp = NamedTempFile::new_in(dir).map_err(io)?;
    tmp.write_all(contents.as_bytes()).map_err(io)?;
    tmp.as_file().set_permissions(permissions).map_err(io)?;
    tmp.persist(path).map_err(|e| io(e.error))?;
    Ok(())
}

fn migrate_file(transform: &dyn Transform, path: &Path, language: Language, dry_run: bool) -> Result<TransformResult> {
    let source = fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;
    let file = ParsedFile::parse(path, source, language)?;
    let result = transform.apply(&file)?;
    if let Some(output) = &result.output {
        if !dry_run {
            write_atomically(path, output)?;
        }
    }
    Ok(result)
}

fn process_file(transform: &dyn Transform, path: PathBuf, language: Language, dry_run: bool) -> FileReport {
    match migrate_file(transform, &path, language, dry_run) {
        Ok(result) => {
            let status = if result.is_unchanged() {
                debug!(path = %path.display(), "unchanged");
                FileStatus::Unchanged
            } else {
                info!(path = %path.display(), dry_run, "rewritten");
                FileStatus::Rewritten
            };
            FileReport {
                path,
                language,
                status,
                diagnostics: result.diagnostics,
            }
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "leaving file untouched");
            let diagnostic = Diagnostic::error(&path, err.to_string());
            FileReport {
                path,
                language,
                status: FileStatus::Failed,
                diagnostics: vec![diagnostic],
            }
        }
    }
}

/// Run one transform over every matching file under `options.path`.
///
/// Configuration errors are returned before any file is read. Per-file
/// failures end up in the report.
pub fn run(options: &RunOptions) -> Result<RunReport> {
    let registry = Registry::builtin();
    let transform = registry.get(&options.transform)?;
    let languages = parse_languages(&options.languages)?;
    let ignore = compile_ignore(&options.ignore)?;

    let files = discover(&options.path, &languages, &ignore)?;
    info!(
        transform = transform.name(),
        files = files.len(),
        dry_run = options.dry_run,
        "starting migration"
    );

    let mut report = RunReport {
        transform: transform.name().to_string(),
        dry_run: options.dry_run,
        files: Vec::with_capacity(files.len()),
    };
    for (path, language) in files {
        report.files.push(process_file(transform, path, language, options.dry_run));
    }

    info!(
        rewritten = report.count(FileStatus::Rewritten),
        unchanged = report.count(FileStatus::Unchanged),
        failed = report.count(FileStatus::Failed),
        "migration finished"
    );
    Ok(report)
}
