//! Renamed and removed exports of a package (components, icons, types).
//!
//! A rename rewrites the import specifier and every reference to its local
//! binding. Only names bound by an import from the package are touched, so an
//! unrelated `Text` declared elsewhere never changes.

use swc_core::ecma::{
    ast::{
        ExportNamedSpecifier, Ident, ImportDecl, ImportSpecifier, LabeledStmt, Module, ModuleExportName, NamedExport,
        ObjectPatProp, Prop, TsEnumMember, TsMethodSignature, TsPropertySignature,
    },
    visit::{Visit, VisitWith},
};

use super::TransformContext;
use crate::error::Result;
use crate::imports::{import_decls, imported_name};
use crate::rewrite::RewriteAction;

#[derive(Debug, Clone, Copy)]
pub enum ExportChange {
    Renamed(&'static str),
    /// No successor exists; the operator gets a hint instead of a rewrite.
    Removed { hint: &'static str },
}

#[derive(Debug)]
pub struct ExportRule {
    pub name: &'static str,
    pub change: ExportChange,
}

/// Records the edits that rename every reference to `local`.
struct ReferenceRenamer<'a> {
    local: &'a str,
    new_name: &'a str,
    out: Vec<RewriteAction>,
}

impl ReferenceRenamer<'_> {
    fn is_local(&self, ident: &Ident) -> bool {
        ident.sym.as_ref() == self.local
    }
}

impl Visit for ReferenceRenamer<'_> {
    // The specifier itself is rewritten by the caller.
    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_ident(&mut self, ident: &Ident) {
        if self.is_local(ident) {
            self.out.push(RewriteAction::Rename {
                span: ident.span,
                name: self.new_name.to_string(),
            });
        }
    }

    // `{ Text }` keeps its key: `{ Text: Body }`.
    fn visit_prop(&mut self, prop: &Prop) {
        if let Prop::Shorthand(ident) = prop {
            if self.is_local(ident) {
                self.out.push(RewriteAction::Replace {
                    span: ident.span,
                    text: format!("{}: {}", self.local, self.new_name),
                });
            }
            return;
        }
        prop.visit_children_with(self);
    }

    fn visit_object_pat_prop(&mut self, prop: &ObjectPatProp) {
        if let ObjectPatProp::Assign(assign) = prop {
            if self.is_local(&assign.key.id) {
                self.out.push(RewriteAction::Replace {
                    span: assign.key.id.span,
                    text: format!("{}: {}", self.local, self.new_name),
                });
                if let Some(value) = &assign.value {
                    value.visit_with(self);
                }
                return;
            }
        }
        prop.visit_children_with(self);
    }

    // `export { Text } from './other'` names another module's binding.
    fn visit_named_export(&mut self, n: &NamedExport) {
        if n.src.is_none() {
            n.visit_children_with(self);
        }
    }

    // `export { Text }` keeps the exported name: `export { Body as Text }`.
    fn visit_export_named_specifier(&mut self, spec: &ExportNamedSpecifier) {
        if let ModuleExportName::Ident(orig) = &spec.orig {
            if self.is_local(orig) {
                let text = match &spec.exported {
                    Some(_) => self.new_name.to_string(),
                    None => format!("{} as {}", self.new_name, self.local),
                };
                self.out.push(RewriteAction::Replace { span: orig.span, text });
            }
        }
    }

    // Keys of type members and enum members are names, not references.
    fn visit_ts_property_signature(&mut self, n: &TsPropertySignature) {
        if n.computed {
            n.key.visit_with(self);
        }
        n.type_ann.visit_with(self);
    }

    fn visit_ts_method_signature(&mut self, n: &TsMethodSignature) {
        if n.computed {
            n.key.visit_with(self);
        }
        n.params.visit_with(self);
        n.type_ann.visit_with(self);
        n.type_params.visit_with(self);
    }

    fn visit_ts_enum_member(&mut self, n: &TsEnumMember) {
        n.init.visit_with(self);
    }

    fn visit_labeled_stmt(&mut self, n: &LabeledStmt) {
        n.body.visit_with(self);
    }
}

struct IdentFinder<'a> {
    name: &'a str,
    found: bool,
}

impl Visit for IdentFinder<'_> {
    fn visit_ident(&mut self, ident: &Ident) {
        if ident.sym.as_ref() == self.name {
            self.found = true;
        }
    }
}

/// Whether any identifier in `module` is spelled `name`.
pub(crate) fn binds_name(module: &Module, name: &str) -> bool {
    let mut finder = IdentFinder { name, found: false };
    module.visit_with(&mut finder);
    finder.found
}

/// Rewrite references to the renamed local binding `local`.
pub(crate) fn rename_references(module: &Module, local: &str, new_name: &str) -> Vec<RewriteAction> {
    let mut renamer = ReferenceRenamer {
        local,
        new_name,
        out: vec![],
    };
    module.visit_with(&mut renamer);
    renamer.out
}

pub fn rename_exports(ctx: &mut TransformContext<'_>, package: &str, rules: &[ExportRule]) -> Result<()> {
    let file = ctx.file;
    let module = &file.module;
    let decls: Vec<ImportDecl> = import_decls(module, package).cloned().collect();

    for decl in &decls {
        for spec in &decl.specifiers {
            let ImportSpecifier::Named(named) = spec else {
                continue;
            };
            let exported = imported_name(named);
            let Some(rule) = rules.iter().find(|r| r.name == exported) else {
                continue;
            };
            let line = ctx.file.line_of(named.span);
            let local = named.local.sym.to_string();

            let new_name = match rule.change {
                ExportChange::Removed { hint } => {
                    ctx.error(format!(
                        "`{exported}` (imported on line {line}) was removed from {package}; {hint}"
                    ));
                    continue;
                }
                ExportChange::Renamed(new_name) => new_name,
            };

            match &named.imported {
                // `{ Text as Copy }` -> `{ Body as Copy }`, local references stay.
                Some(imported) if local != exported => {
                    let action = if local == new_name {
                        RewriteAction::Replace {
                            span: named.span,
                            text: new_name.to_string(),
                        }
                    } else {
                        RewriteAction::Rename {
                            span: export_name_span(imported),
                            name: new_name.to_string(),
                        }
                    };
                    ctx.rewriter.apply(action)?;
                }
                _ if binds_name(module, new_name) => {
                    // The new name is taken in this file; alias instead of renaming uses.
                    ctx.rewriter.apply(RewriteAction::Replace {
                        span: named.span,
                        text: format!("{new_name} as {local}"),
                    })?;
                }
                _ => {
                    ctx.rewriter.apply(RewriteAction::Replace {
                        span: named.span,
                        text: if named.is_type_only {
                            format!("type {new_name}")
                        } else {
                            new_name.to_string()
                        },
                    })?;
                    for action in rename_references(module, &local, new_name) {
                        ctx.rewriter.apply(action)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn export_name_span(name: &ModuleExportName) -> swc_core::common::Span {
    match name {
        ModuleExportName::Ident(i) => i.span,
        ModuleExportName::Str(s) => s.span,
    }
}

#[cfg(test)]
mod tests {
    use crate::transforms::run_tsx;
    use pretty_assertions::assert_eq;

    #[test]
    fn renames_import_and_every_reference() {
        let result = run_tsx(
            "component-names-v2",
            "import { Text, Button } from '@sumup/circuit-ui';\n\
             import type { TextProps } from '@sumup/circuit-ui';\n\
             const Red = styled(Text)`color: red;`;\n\
             const C = (p: TextProps) => <Text {...p}>x</Text>;\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some(
                "import { Body, Button } from '@sumup/circuit-ui';\n\
                 import type { BodyProps } from '@sumup/circuit-ui';\n\
                 const Red = styled(Body)`color: red;`;\n\
                 const C = (p: BodyProps) => <Body {...p}>x</Body>;\n"
            )
        );
    }

    #[test]
    fn re_exports_from_other_modules_are_untouched() {
        let result = run_tsx(
            "component-names-v2",
            "import { Text } from '@sumup/circuit-ui';\n\
             export { Text } from './other';\n\
             export { Text as Copy } from './copy';\n\
             const a = <Text />;\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some(
                "import { Body } from '@sumup/circuit-ui';\n\
                 export { Text } from './other';\n\
                 export { Text as Copy } from './copy';\n\
                 const a = <Body />;\n"
            )
        );
    }

    #[test]
    fn keeps_property_names_and_object_keys() {
        let result = run_tsx(
            "component-names-v2",
            "import { Text } from '@sumup/circuit-ui';\n\
             const map = { Text, other: theme.Text };\n\
             interface Slots { Text: string }\n\
             export { Text };\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some(
                "import { Body } from '@sumup/circuit-ui';\n\
                 const map = { Text: Body, other: theme.Text };\n\
                 interface Slots { Text: string }\n\
                 export { Body as Text };\n"
            )
        );
    }

    #[test]
    fn aliased_imports_only_change_the_imported_name() {
        let result = run_tsx(
            "component-names-v2",
            "import { Text as Copy } from '@sumup/circuit-ui';\nconst a = <Copy />;\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some("import { Body as Copy } from '@sumup/circuit-ui';\nconst a = <Copy />;\n")
        );
    }

    #[test]
    fn unrelated_identifiers_with_the_same_name_are_untouched() {
        let code = "import { Text } from './Text';\nconst a = <Text />;\n";
        let result = run_tsx("component-names-v2", code);
        assert!(result.is_unchanged());
    }

    #[test]
    fn taken_names_are_aliased() {
        let result = run_tsx(
            "component-names-v2",
            "import { Text } from '@sumup/circuit-ui';\nimport { Body } from './Body';\nconst a = <Text />;\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some("import { Body as Text } from '@sumup/circuit-ui';\nimport { Body } from './Body';\nconst a = <Text />;\n")
        );
    }

    #[test]
    fn renamed_icons_are_rewritten() {
        let result = run_tsx(
            "icon-names-v2",
            "import { ThumbUp } from '@sumup/icons';\nconst a = <ThumbUp size=\"24\" />;\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some("import { Like } from '@sumup/icons';\nconst a = <Like size=\"24\" />;\n")
        );
    }

    #[test]
    fn removed_icons_are_reported_and_kept() {
        let code = "import { Bold } from '@sumup/icons';\nconst a = <Bold />;\n";
        let result = run_tsx("icon-names-v2", code);
        assert!(result.is_unchanged());
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.severity, crate::diagnostics::Severity::Error);
        assert!(diag.message.contains("`Bold`"));
    }

    #[test]
    fn renaming_twice_changes_nothing() {
        let first = run_tsx(
            "component-names-v2",
            "import { Heading } from '@sumup/circuit-ui';\nconst a = <Heading />;\n",
        );
        let second = run_tsx("component-names-v2", first.output.as_deref().unwrap());
        assert!(second.is_unchanged());
    }
}
