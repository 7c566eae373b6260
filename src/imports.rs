//! Import resolution: which local names a module binds from a package.

use serde::Serialize;
use swc_core::ecma::ast::{ImportDecl, ImportNamedSpecifier, ImportSpecifier, Module, ModuleDecl, ModuleExportName, ModuleItem};

/// One named import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    pub exported_name: String,
    pub local_name: String,
    pub source_path: String,
}

pub(crate) fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(i) => i.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string(),
    }
}

/// Name a specifier imports, falling back to the local name when not aliased.
pub(crate) fn imported_name(named: &ImportNamedSpecifier) -> String {
    named
        .imported
        .as_ref()
        .map(export_name)
        .unwrap_or_else(|| named.local.sym.to_string())
}

/// Import declarations whose source literal is exactly `source_path`.
pub fn import_decls<'a>(module: &'a Module, source_path: &'a str) -> impl Iterator<Item = &'a ImportDecl> + 'a {
    module.body.iter().filter_map(move |item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) if decl.src.value.as_ref() == source_path => Some(decl),
        _ => None,
    })
}

/// Every named import of `source_path` in `module`.
///
/// Default and namespace specifiers carry no exported name and are skipped.
/// An empty result means the file does not use the package at all.
pub fn find_imports_by_path(module: &Module, source_path: &str) -> Vec<ImportBinding> {
    let mut out = vec![];
    for decl in import_decls(module, source_path) {
        for s in &decl.specifiers {
            if let ImportSpecifier::Named(named) = s {
                out.push(ImportBinding {
                    exported_name: imported_name(named),
                    local_name: named.local.sym.to_string(),
                    source_path: source_path.to_string(),
                });
            }
        }
    }
    out
}

/// Local alias of `exported` when it is imported from `source_path`.
pub fn local_name_for(module: &Module, source_path: &str, exported: &str) -> Option<String> {
    find_imports_by_path(module, source_path)
        .into_iter()
        .find(|b| b.exported_name == exported)
        .map(|b| b.local_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_tsx;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_named_and_aliased_imports() {
        let file = parse_tsx(
            "import { Button, Body as Text } from '@sumup/circuit-ui';\n\
             import React from 'react';\n",
        );
        let bindings = find_imports_by_path(&file.module, "@sumup/circuit-ui");
        assert_eq!(
            bindings,
            vec![
                ImportBinding {
                    exported_name: "Button".into(),
                    local_name: "Button".into(),
                    source_path: "@sumup/circuit-ui".into(),
                },
                ImportBinding {
                    exported_name: "Body".into(),
                    local_name: "Text".into(),
                    source_path: "@sumup/circuit-ui".into(),
                },
            ]
        );
    }

    #[test]
    fn collects_across_multiple_declarations() {
        let file = parse_tsx(
            "import { Button } from '@sumup/circuit-ui';\n\
             import type { ButtonProps } from '@sumup/circuit-ui';\n",
        );
        let names: Vec<_> = find_imports_by_path(&file.module, "@sumup/circuit-ui")
            .into_iter()
            .map(|b| b.local_name)
            .collect();
        assert_eq!(names, vec!["Button", "ButtonProps"]);
    }

    #[test]
    fn missing_package_yields_no_bindings() {
        let file = parse_tsx("import { Button } from './Button';\nimport * as C from '@sumup/circuit-ui';\n");
        assert!(find_imports_by_path(&file.module, "@sumup/circuit-ui").is_empty());
        assert_eq!(local_name_for(&file.module, "./Button", "Button").as_deref(), Some("Button"));
    }

    #[test]
    fn requires_exact_source_match() {
        let file = parse_tsx("import { Button } from '@sumup/circuit-ui/legacy';\n");
        assert!(find_imports_by_path(&file.module, "@sumup/circuit-ui").is_empty());
    }
}
