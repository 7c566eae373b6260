use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MigrateError, Result};

/// Optional JSON file passed with `--config`.
///
/// ```json
/// { "ignore": ["^generated$", "\\.stories\\.tsx$"], "dry_run": true }
/// ```
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub ignore: Vec<String>,
    pub dry_run: bool,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| MigrateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(path, &text)
    }

    pub fn from_json(path: &Path, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| MigrateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
