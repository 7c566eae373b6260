//! Transform registry.
//!
//! Every transform is a named, stateless rewrite of a single file. The
//! catalogue is data: each category (prop renames, flag-to-enum conversion,
//! value remaps, export renames, token remaps, package moves) has one generic
//! routine and a table per registered transform.

mod catalogue;
pub mod props;
pub mod relocate;
pub mod rename;
pub mod theme;

use std::path::Path;

use crate::diagnostics::Diagnostic;
use crate::error::{MigrateError, Result};
use crate::rewrite::Rewriter;
use crate::source::{Language, ParsedFile};

pub use catalogue::{CIRCUIT_UI, ICONS, INTL};

/// Outcome of running one transform over one file.
#[derive(Debug, Default)]
pub struct TransformResult {
    /// Rewritten source; `None` means the file must be left alone.
    pub output: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TransformResult {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn is_unchanged(&self) -> bool {
        self.output.is_none()
    }
}

/// Collects edits and diagnostics while a transform walks a file.
pub struct TransformContext<'a> {
    pub file: &'a ParsedFile,
    pub rewriter: Rewriter<'a>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> TransformContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self {
            file,
            rewriter: Rewriter::new(file),
            diagnostics: vec![],
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warn(&self.file.path, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(&self.file.path, message));
    }

    pub fn finish(self) -> TransformResult {
        TransformResult {
            output: self.rewriter.finish(),
            diagnostics: self.diagnostics,
        }
    }
}

pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Rewrite `file`. Must not touch the file system.
    fn apply(&self, file: &ParsedFile) -> Result<TransformResult>;
}

pub struct Registry {
    transforms: Vec<Box<dyn Transform>>,
}

impl Registry {
    /// The built-in catalogue.
    pub fn builtin() -> Self {
        Self {
            transforms: catalogue::all(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Transform> {
        self.transforms.iter().map(|t| t.as_ref())
    }

    pub fn get(&self, name: &str) -> Result<&dyn Transform> {
        self.iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| MigrateError::UnknownTransform {
                name: name.to_string(),
                available: self.names().into_iter().map(String::from).collect(),
            })
    }
}

/// Parse `source` and run the transform called `name` over it.
pub fn apply_transform(name: &str, source: &str, path: &Path, language: Language) -> Result<TransformResult> {
    let registry = Registry::builtin();
    let transform = registry.get(name)?;
    let file = ParsedFile::parse(path, source, language)?;
    transform.apply(&file)
}

#[cfg(test)]
pub(crate) fn run_tsx(name: &str, code: &str) -> TransformResult {
    apply_transform(name, code, Path::new("src/App.tsx"), Language::TypeScript).expect("transform should succeed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_are_unique() {
        let registry = Registry::builtin();
        let mut names = registry.names();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert!(names.contains(&"badge-variant-enum"));
    }

    #[test]
    fn unknown_transform_fails_fast() {
        let err = apply_transform("does-not-exist", "", Path::new("a.tsx"), Language::TypeScript).unwrap_err();
        match err {
            MigrateError::UnknownTransform { name, available } => {
                assert_eq!(name, "does-not-exist");
                assert!(available.iter().any(|n| n == "currency-utils"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn badge_color_becomes_variant() {
        let result = run_tsx(
            "badge-variant-enum",
            "import { Badge } from '@sumup/circuit-ui';\n\nconst a = <Badge color=\"danger\">x</Badge>;\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some("import { Badge } from '@sumup/circuit-ui';\n\nconst a = <Badge variant=\"danger\">x</Badge>;\n")
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn byte_order_mark_is_kept_and_edits_stay_in_place() {
        let result = run_tsx(
            "badge-variant-enum",
            "\u{feff}import { Badge } from '@sumup/circuit-ui';\n\nconst a = <Badge color=\"danger\">x</Badge>;\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some("\u{feff}import { Badge } from '@sumup/circuit-ui';\n\nconst a = <Badge variant=\"danger\">x</Badge>;\n")
        );
    }
}
