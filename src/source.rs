//! Source files and the parser boundary.
//!
//! Each file is parsed into its own [`SourceMap`] so that nothing is shared
//! between files. Spans are translated back to byte offsets of the original
//! text, which is what the rewriter edits.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use swc_core::{
    common::{sync::Lrc, BytePos, FileName, SourceMap, Span, Spanned},
    ecma::{
        ast::{EsVersion, Module},
        parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax},
    },
};

use crate::error::{MigrateError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    TypeScript,
    JavaScript,
    Flow,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::TypeScript, Language::JavaScript, Language::Flow];

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &["ts", "tsx"],
            Language::JavaScript | Language::Flow => &["js", "jsx"],
        }
    }

    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions().contains(&ext))
            .unwrap_or(false)
    }

    /// Parser dialect for a file of this language.
    ///
    /// `.ts` files are parsed without JSX so that `<T>value` casts stay legal.
    /// Flow has no dedicated dialect; its annotations are close enough to
    /// TypeScript for the constructs the transforms look at.
    pub fn syntax_for(self, path: &Path) -> Syntax {
        match self {
            Language::TypeScript => Syntax::Typescript(TsSyntax {
                tsx: !matches!(path.extension().and_then(|e| e.to_str()), Some("ts")),
                decorators: true,
                ..Default::default()
            }),
            Language::JavaScript => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                ..Default::default()
            }),
            Language::Flow => Syntax::Typescript(TsSyntax {
                tsx: true,
                ..Default::default()
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
            Language::Flow => "Flow",
        };
        f.write_str(name)
    }
}

impl FromStr for Language {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Ok(Language::TypeScript),
            "javascript" | "js" => Ok(Language::JavaScript),
            "flow" => Ok(Language::Flow),
            _ => Err(MigrateError::UnknownLanguage { name: s.to_string() }),
        }
    }
}

/// Parse a list of language names, failing on the first unknown one.
pub fn parse_languages<S: AsRef<str>>(names: &[S]) -> Result<Vec<Language>> {
    let mut out = Vec::new();
    for name in names {
        let lang = name.as_ref().parse::<Language>()?;
        if !out.contains(&lang) {
            out.push(lang);
        }
    }
    if out.is_empty() {
        return Err(MigrateError::NoLanguage);
    }
    Ok(out)
}

const BOM: char = '\u{feff}';

/// One parsed source file.
pub struct ParsedFile {
    pub path: PathBuf,
    pub language: Language,
    /// File text without a leading byte order mark.
    pub source: String,
    pub module: Module,
    bom: bool,
    start_pos: BytePos,
    source_map: Lrc<SourceMap>,
}

impl ParsedFile {
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>, language: Language) -> Result<Self> {
        let path = path.into();
        let mut source = source.into();
        // swc drops a leading BOM from the source file, which would shift
        // every span against `source`.
        let bom = source.starts_with(BOM);
        if bom {
            source.replace_range(..BOM.len_utf8(), "");
        }
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(Lrc::new(FileName::Real(path.clone())), source.clone());

        let lexer = Lexer::new(
            language.syntax_for(&path),
            EsVersion::EsNext,
            StringInput::from(&*fm),
            None,
        );
        let mut parser = Parser::new_from(lexer);
        let parse_error = |err: swc_core::ecma::parser::error::Error| {
            let loc = cm.lookup_char_pos(err.span().lo);
            MigrateError::Parse {
                path: path.clone(),
                message: format!("{} (line {}, column {})", err.kind().msg(), loc.line, loc.col_display + 1),
            }
        };

        let module = parser.parse_module().map_err(&parse_error)?;
        // Recovered errors still mean the tree may not match the text.
        if let Some(err) = parser.take_errors().into_iter().next() {
            return Err(parse_error(err));
        }

        Ok(Self {
            start_pos: fm.start_pos,
            path,
            language,
            source,
            module,
            bom,
            source_map: cm,
        })
    }

    /// Byte offset of `pos` in [`ParsedFile::source`].
    pub fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize
    }

    /// Whether the file on disk starts with a byte order mark.
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    /// Line break used by the file, `\r\n` when its first line ends that way.
    pub fn newline(&self) -> &'static str {
        match self.source.find('\n') {
            Some(i) if self.source[..i].ends_with('\r') => "\r\n",
            _ => "\n",
        }
    }

    pub fn text(&self, span: Span) -> &str {
        &self.source[self.offset(span.lo)..self.offset(span.hi)]
    }

    pub fn source_map(&self) -> &Lrc<SourceMap> {
        &self.source_map
    }

    pub fn line_of(&self, span: Span) -> usize {
        if span.is_dummy() {
            return 0;
        }
        self.source_map.lookup_char_pos(span.lo).line
    }
}

#[cfg(test)]
pub(crate) fn parse_tsx(code: &str) -> ParsedFile {
    ParsedFile::parse("test.tsx", code, Language::TypeScript).expect("fixture should parse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_core::ecma::ast::{ModuleDecl, ModuleItem};

    #[test]
    fn languages_parse_case_insensitively() {
        let langs = parse_languages(&["TypeScript", "javascript", "FLOW", "ts"]).unwrap();
        assert_eq!(langs, vec![Language::TypeScript, Language::JavaScript, Language::Flow]);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = parse_languages(&["TypeScript", "Elm"]).unwrap_err();
        assert!(matches!(err, MigrateError::UnknownLanguage { ref name } if name == "Elm"));
        assert!(matches!(parse_languages::<&str>(&[]), Err(MigrateError::NoLanguage)));
    }

    #[test]
    fn extension_filter() {
        assert!(Language::TypeScript.matches(Path::new("src/App.tsx")));
        assert!(!Language::TypeScript.matches(Path::new("src/App.js")));
        assert!(Language::Flow.matches(Path::new("src/App.jsx")));
        assert!(!Language::JavaScript.matches(Path::new("README")));
    }

    #[test]
    fn spans_map_back_to_source_text() {
        let file = parse_tsx("import { Button } from '@sumup/circuit-ui';\n");
        let ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) = &file.module.body[0] else {
            panic!("expected import");
        };
        assert_eq!(file.text(decl.src.span), "'@sumup/circuit-ui'");
        assert_eq!(file.line_of(decl.span), 1);
    }

    #[test]
    fn ts_files_allow_angle_bracket_casts() {
        let file = ParsedFile::parse("cast.ts", "const a = <string>b;", Language::TypeScript);
        assert!(file.is_ok());
    }

    #[test]
    fn byte_order_mark_does_not_shift_spans() {
        let file = parse_tsx("\u{feff}import { Button } from '@sumup/circuit-ui';\n");
        let ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) = &file.module.body[0] else {
            panic!("expected import");
        };
        assert!(file.has_bom());
        assert_eq!(file.text(decl.src.span), "'@sumup/circuit-ui'");
        assert!(!parse_tsx("const a = 1;\n").has_bom());
    }

    #[test]
    fn newline_style_follows_the_first_line() {
        assert_eq!(parse_tsx("const a = 1;\r\nconst b = 2;\r\n").newline(), "\r\n");
        assert_eq!(parse_tsx("const a = 1;\nconst b = 2;\n").newline(), "\n");
        assert_eq!(parse_tsx("const a = 1;").newline(), "\n");
    }

    #[test]
    fn flow_maybe_types_are_not_supported() {
        let err = ParsedFile::parse("a.js", "function f(x: ?string) {}\n", Language::Flow).err();
        assert!(matches!(err, Some(MigrateError::Parse { .. })));
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let err = ParsedFile::parse("broken.jsx", "const = ;", Language::JavaScript)
            .err()
            .expect("should fail");
        assert!(matches!(err, MigrateError::Parse { ref path, .. } if path == Path::new("broken.jsx")));
    }
}
