use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the migration toolkit.
///
/// Configuration errors abort a run before any file is touched. Parse and
/// I/O errors are scoped to a single file; the runner records them and moves
/// on.
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("unknown transform '{name}' (available: {})", available.join(", "))]
    UnknownTransform { name: String, available: Vec<String> },

    #[error("unsupported language '{name}' (supported: TypeScript, JavaScript, Flow)")]
    UnknownLanguage { name: String },

    #[error("no language given; pass at least one of TypeScript, JavaScript, Flow")]
    NoLanguage,

    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to load config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MigrateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error must stop the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownTransform { .. }
                | Self::UnknownLanguage { .. }
                | Self::NoLanguage
                | Self::InvalidIgnorePattern { .. }
                | Self::Config { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
