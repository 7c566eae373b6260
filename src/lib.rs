//! Codemods that upgrade code using `@sumup/circuit-ui`, `@sumup/icons` and
//! the currency helpers now in `@sumup/intl` across major versions.
//!
//! A transform parses one file with swc, finds nodes bound to the targeted
//! package, and rewrites them as span-based text edits so that everything it
//! does not touch keeps its formatting. Constructs it cannot migrate safely
//! are left alone and reported as [`Diagnostic`]s.
//!
//! ```no_run
//! use std::path::Path;
//! use circuit_migrate::{apply_transform, Language};
//!
//! let result = apply_transform(
//!     "badge-variant-enum",
//!     "import { Badge } from '@sumup/circuit-ui';\nconst a = <Badge color=\"danger\" />;\n",
//!     Path::new("src/App.tsx"),
//!     Language::TypeScript,
//! )?;
//! assert!(result.output.is_some());
//! # Ok::<(), circuit_migrate::MigrateError>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod imports;
pub mod matcher;
pub mod rewrite;
pub mod runner;
pub mod source;
pub mod styled;
pub mod transforms;

pub use config::FileConfig;
pub use diagnostics::{Diagnostic, Severity};
pub use error::{MigrateError, Result};
pub use runner::{run, FileReport, FileStatus, RunOptions, RunReport};
pub use source::{parse_languages, Language, ParsedFile};
pub use transforms::{apply_transform, Registry, Transform, TransformResult};
