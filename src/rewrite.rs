//! Span-based rewriting.
//!
//! Transforms never print the whole tree. Every action becomes a text edit on
//! the original source, so code outside the edited nodes keeps its exact
//! formatting and comments. New statements are built as AST nodes and printed
//! on their own with the swc code generator.

use swc_core::{
    common::{sync::Lrc, SourceMap, Span, Spanned, SyntaxContext, DUMMY_SP},
    ecma::{
        ast::{
            CallExpr, Ident, ImportDecl, ImportNamedSpecifier, ImportPhase, ImportSpecifier, Module, ModuleDecl,
            ModuleExportName, ModuleItem, Str,
        },
        codegen::{text_writer::JsWriter, Config, Emitter},
    },
};
use tracing::debug;

use crate::error::{MigrateError, Result};
use crate::source::ParsedFile;

/// A structural edit on the nodes a matcher selected.
#[derive(Debug, Clone)]
pub enum RewriteAction {
    /// Replace the node at `span` with source text.
    Replace { span: Span, text: String },
    /// Rename an identifier node.
    Rename { span: Span, name: String },
    /// Delete exactly the node at `span`.
    Remove { span: Span },
    /// Delete a JSX attribute together with the whitespace in front of it.
    RemoveAttribute { span: Span },
    /// Insert a new import declaration on the line after `after`.
    InsertImport { after: Span, decl: ImportDecl },
    /// Swap the declaration at `span` for a new one.
    ReplaceImport { span: Span, decl: ImportDecl },
    /// Add `names` to an existing import declaration.
    AppendSpecifiers { decl: ImportDecl, names: Vec<String> },
    /// Drop the specifiers at `indices`; the whole declaration goes when none remain.
    RemoveImportSpecifiers { decl: ImportDecl, indices: Vec<usize> },
    /// Rewrite a call's arguments as `args[order[0]], args[order[1]], ...`.
    ReorderArguments { call: CallExpr, order: Vec<usize> },
}

#[derive(Debug, Clone)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

pub struct Rewriter<'a> {
    file: &'a ParsedFile,
    edits: Vec<Edit>,
}

impl<'a> Rewriter<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file, edits: vec![] }
    }

    pub fn file(&self) -> &'a ParsedFile {
        self.file
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    fn push(&mut self, start: usize, end: usize, text: impl Into<String>) {
        self.edits.push(Edit {
            start,
            end,
            text: text.into(),
        });
    }

    fn span_range(&self, span: Span) -> (usize, usize) {
        (self.file.offset(span.lo), self.file.offset(span.hi))
    }

    pub fn apply(&mut self, action: RewriteAction) -> Result<()> {
        match action {
            RewriteAction::Replace { span, text } => {
                let (start, end) = self.span_range(span);
                self.push(start, end, text);
            }
            RewriteAction::Rename { span, name } => {
                let (start, end) = self.span_range(span);
                self.push(start, end, name);
            }
            RewriteAction::Remove { span } => {
                let (start, end) = self.span_range(span);
                self.push(start, end, "");
            }
            RewriteAction::RemoveAttribute { span } => {
                let (start, end) = self.span_range(span);
                let source = &self.file.source;
                let trimmed = source[..start].trim_end_matches(|c: char| c.is_whitespace()).len();
                self.push(trimmed, end, "");
            }
            RewriteAction::InsertImport { after, decl } => {
                let text = self.print_import(decl)?;
                let at = self.file.offset(after.hi);
                self.push(at, at, format!("{}{text}", self.file.newline()));
            }
            RewriteAction::ReplaceImport { span, decl } => {
                let text = self.print_import(decl)?;
                let (start, end) = self.span_range(span);
                self.push(start, end, text);
            }
            RewriteAction::AppendSpecifiers { decl, names } => self.append_specifiers(&decl, &names),
            RewriteAction::RemoveImportSpecifiers { decl, indices } => self.remove_specifiers(&decl, &indices),
            RewriteAction::ReorderArguments { call, order } => {
                let (Some(first), Some(last)) = (call.args.first(), call.args.last()) else {
                    return Ok(());
                };
                let start = self.file.offset(first.span().lo);
                let end = self.file.offset(last.span().hi);
                let args: Vec<&str> = order
                    .iter()
                    .filter_map(|&i| call.args.get(i))
                    .map(|a| self.file.text(a.span()))
                    .collect();
                let text = args.join(", ");
                self.push(start, end, text);
            }
        }
        Ok(())
    }

    fn print_import(&self, decl: ImportDecl) -> Result<String> {
        let text = print_module_item(self.file.source_map(), ModuleItem::ModuleDecl(ModuleDecl::Import(decl)))
            .map_err(|e| MigrateError::io(&self.file.path, e))?;
        Ok(text.trim_end().to_string())
    }

    /// Delete a statement and, when it sits alone on its line, the line itself.
    fn remove_statement(&mut self, span: Span) {
        let (mut start, mut end) = self.span_range(span);
        let source = &self.file.source;
        let line_start = source[..start].rfind('\n').map(|p| p + 1).unwrap_or(0);
        let rest = &source[end..];
        let line_end = rest.find('\n');
        if source[line_start..start].trim().is_empty() {
            if let Some(nl) = line_end.filter(|&nl| rest[..nl].trim().is_empty()) {
                start = line_start;
                end += nl + 1;
            } else if rest.trim().is_empty() {
                start = line_start;
                end = source.len();
            }
        }
        self.push(start, end, "");
    }

    fn append_specifiers(&mut self, decl: &ImportDecl, names: &[String]) {
        if names.is_empty() {
            return;
        }
        let joined = names.join(", ");
        let last_named = decl
            .specifiers
            .iter()
            .rev()
            .find(|s| matches!(s, ImportSpecifier::Named(_)));
        match (last_named, decl.specifiers.first()) {
            (Some(spec), _) => {
                let at = self.file.offset(spec.span().hi);
                self.push(at, at, format!(", {joined}"));
            }
            (None, Some(ImportSpecifier::Default(def))) => {
                let at = self.file.offset(def.span.hi);
                self.push(at, at, format!(", {{ {joined} }}"));
            }
            _ => debug!(path = %self.file.path.display(), "cannot append specifiers to this import"),
        }
    }

    fn remove_specifiers(&mut self, decl: &ImportDecl, indices: &[usize]) {
        let specs = &decl.specifiers;
        let kept: Vec<usize> = (0..specs.len()).filter(|i| !indices.contains(i)).collect();
        let Some(&last_kept) = kept.last() else {
            self.remove_statement(decl.span);
            return;
        };

        let named_kept = kept.iter().any(|&i| matches!(specs[i], ImportSpecifier::Named(_)));
        if !named_kept {
            // `import Def, { a } from 'x'` -> `import Def from 'x'`
            let from = self.file.offset(specs[last_kept].span().hi);
            let Some(last) = specs.last() else { return };
            let after_last = self.file.offset(last.span().hi);
            if let Some(close) = self.file.source[after_last..].find('}') {
                self.push(from, after_last + close + 1, "");
            }
            return;
        }

        let mut removed: Vec<usize> = indices.iter().copied().filter(|&i| i < specs.len()).collect();
        removed.sort_unstable();
        removed.dedup();
        for &i in removed.iter().filter(|&&i| i < last_kept) {
            let start = self.file.offset(specs[i].span().lo);
            let end = self.file.offset(specs[i + 1].span().lo);
            self.push(start, end, "");
        }
        if let Some(&tail) = removed.iter().filter(|&&i| i > last_kept).max() {
            let start = self.file.offset(specs[last_kept].span().hi);
            let end = self.file.offset(specs[tail].span().hi);
            self.push(start, end, "");
        }
    }

    /// Rewritten source, or `None` when nothing changed.
    pub fn finish(self) -> Option<String> {
        if self.edits.is_empty() {
            return None;
        }
        let mut edits = self.edits;
        edits.sort_by_key(|e| (e.start, e.end));

        let source = &self.file.source;
        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for edit in edits {
            if edit.start < cursor {
                debug!(
                    path = %self.file.path.display(),
                    start = edit.start,
                    "dropping edit overlapping an earlier one"
                );
                continue;
            }
            out.push_str(&source[cursor..edit.start]);
            out.push_str(&edit.text);
            cursor = edit.end;
        }
        out.push_str(&source[cursor..]);

        if out == *source {
            return None;
        }
        if self.file.has_bom() {
            out.insert(0, '\u{feff}');
        }
        Some(out)
    }
}

/// `import { a, b as c } from '<source>';` built the same way the parser would
/// have produced it. `quote` is the quote character the file already uses.
pub fn named_import_decl(source: &str, quote: char, specifiers: &[(String, Option<String>)]) -> ImportDecl {
    ImportDecl {
        span: DUMMY_SP,
        specifiers: specifiers
            .iter()
            .map(|(imported, local)| {
                let (local, imported) = match local {
                    Some(local) if local != imported => (
                        local.clone(),
                        Some(ModuleExportName::Ident(Ident::new(imported.clone().into(), DUMMY_SP, SyntaxContext::empty()))),
                    ),
                    _ => (imported.clone(), None),
                };
                ImportSpecifier::Named(ImportNamedSpecifier {
                    span: DUMMY_SP,
                    local: Ident::new(local.into(), DUMMY_SP, SyntaxContext::empty()),
                    imported,
                    is_type_only: false,
                })
            })
            .collect(),
        src: Box::new(Str {
            span: DUMMY_SP,
            value: source.into(),
            raw: Some(format!("{quote}{source}{quote}").into()),
        }),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }
}

/// Quote character used by an existing string literal.
pub fn quote_of(file: &ParsedFile, lit: &Str) -> char {
    match file.text(lit.span).chars().next() {
        Some('"') => '"',
        _ => '\'',
    }
}

fn print_module_item(cm: &Lrc<SourceMap>, item: ModuleItem) -> std::io::Result<String> {
    let module = Module {
        span: DUMMY_SP,
        body: vec![item],
        shebang: None,
    };
    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(cm.clone(), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: Config::default(),
            comments: None,
            cm: cm.clone(),
            wr: writer,
        };
        emitter.emit_module(&module)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
