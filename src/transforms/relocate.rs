//! Functions that moved to another package, possibly with a new name and a
//! different parameter order.
//!
//! A symbol is migrated only when every use of it is a plain call with the
//! expected number of arguments. Anything else (a reference passed around, a
//! spread argument, a wrong arity) leaves the symbol and its import alone and
//! produces a warning.

use std::collections::BTreeMap;

use swc_core::{
    common::Spanned,
    ecma::{
        ast::{CallExpr, Callee, Expr, Ident, ImportDecl, ImportSpecifier, Module},
        visit::{Visit, VisitWith},
    },
};
use tracing::debug;

use super::TransformContext;
use crate::error::Result;
use crate::imports::{import_decls, imported_name};
use crate::rewrite::{named_import_decl, quote_of, RewriteAction};
use crate::transforms::rename::binds_name;

#[derive(Debug)]
pub struct FunctionMove {
    pub name: &'static str,
    pub to: &'static str,
    pub new_name: &'static str,
    /// Number of arguments the old function takes.
    pub old_arity: usize,
    /// Old argument index for each new parameter position. Old arguments
    /// missing from the list are dropped.
    pub args: &'static [usize],
}

impl FunctionMove {
    fn reorders(&self) -> bool {
        self.args.len() != self.old_arity || self.args.iter().enumerate().any(|(i, &a)| i != a)
    }
}

/// A moved specifier found in one of the old package's imports.
struct Candidate<'r> {
    decl: usize,
    spec: usize,
    local: String,
    aliased: bool,
    rule: &'r FunctionMove,
    calls: Vec<CallExpr>,
}

#[derive(Default)]
struct UsageCollector<'a> {
    local: &'a str,
    calls: Vec<CallExpr>,
    other_uses: usize,
    arity: usize,
}

impl Visit for UsageCollector<'_> {
    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Callee::Expr(callee) = &call.callee {
            if let Expr::Ident(ident) = &**callee {
                if ident.sym.as_ref() == self.local {
                    let plain = call.args.len() == self.arity && call.args.iter().all(|a| a.spread.is_none());
                    if plain && call.type_args.is_none() {
                        self.calls.push(call.clone());
                    } else {
                        self.other_uses += 1;
                    }
                    call.args.visit_with(self);
                    return;
                }
            }
        }
        call.visit_children_with(self);
    }

    fn visit_ident(&mut self, ident: &Ident) {
        if ident.sym.as_ref() == self.local {
            self.other_uses += 1;
        }
    }
}

fn collect_calls(module: &Module, local: &str, arity: usize) -> (Vec<CallExpr>, usize) {
    let mut collector = UsageCollector {
        local,
        arity,
        ..Default::default()
    };
    module.visit_with(&mut collector);
    (collector.calls, collector.other_uses)
}

fn args_contain(outer: &CallExpr, inner: &CallExpr) -> bool {
    match (outer.args.first(), outer.args.last()) {
        (Some(first), Some(last)) => first.span().lo <= inner.span.lo && inner.span.hi <= last.span().hi,
        _ => false,
    }
}

pub fn move_functions(ctx: &mut TransformContext<'_>, package: &str, rules: &[FunctionMove]) -> Result<()> {
    let file = ctx.file;
    let module = &file.module;
    let decls: Vec<ImportDecl> = import_decls(module, package).cloned().collect();

    let mut candidates = vec![];
    for (d, decl) in decls.iter().enumerate() {
        for (s, spec) in decl.specifiers.iter().enumerate() {
            let ImportSpecifier::Named(named) = spec else {
                continue;
            };
            let exported = imported_name(named);
            let Some(rule) = rules.iter().find(|r| r.name == exported) else {
                continue;
            };
            let local = named.local.sym.to_string();
            let line = ctx.file.line_of(named.span);
            let (calls, other_uses) = collect_calls(module, &local, rule.old_arity);
            if other_uses > 0 {
                ctx.warn(format!(
                    "`{local}` (imported on line {line}) is used other than as a call with {} plain arguments; move it to {} manually",
                    rule.old_arity,
                    rule.to
                ));
                continue;
            }
            let aliased = local != exported;
            if !aliased && binds_name(module, rule.new_name) && !imports_name(module, rule.to, rule.new_name) {
                ctx.warn(format!(
                    "`{}` is already bound in this file; move `{local}` (line {line}) to {} manually",
                    rule.new_name, rule.to
                ));
                continue;
            }
            candidates.push(Candidate {
                decl: d,
                spec: s,
                local,
                aliased,
                rule,
                calls,
            });
        }
    }

    // Reordering a call whose arguments contain another moved call would
    // discard the inner edit; leave the outer symbol for the operator.
    let nested: Vec<usize> = (0..candidates.len())
        .filter(|&i| {
            candidates[i].calls.iter().any(|outer| {
                candidates
                    .iter()
                    .flat_map(|c| &c.calls)
                    .any(|inner| inner.span != outer.span && args_contain(outer, inner))
            })
        })
        .collect();
    for &i in nested.iter().rev() {
        let c = candidates.remove(i);
        ctx.warn(format!(
            "`{}` wraps another call that also moves to {}; migrate it manually",
            c.local, c.rule.to
        ));
    }
    if candidates.is_empty() {
        return Ok(());
    }

    for c in &candidates {
        for call in &c.calls {
            if !c.aliased {
                if let Callee::Expr(callee) = &call.callee {
                    ctx.rewriter.apply(RewriteAction::Rename {
                        span: callee.span(),
                        name: c.rule.new_name.to_string(),
                    })?;
                }
            }
            if c.rule.reorders() {
                ctx.rewriter.apply(RewriteAction::ReorderArguments {
                    call: call.clone(),
                    order: c.rule.args.to_vec(),
                })?;
            }
        }
    }

    // New specifiers grouped by target package, in source order.
    let mut targets: BTreeMap<&str, Vec<(String, Option<String>)>> = BTreeMap::new();
    for c in &candidates {
        let spec = if c.aliased {
            (c.rule.new_name.to_string(), Some(c.local.clone()))
        } else {
            (c.rule.new_name.to_string(), None)
        };
        let entry = targets.entry(c.rule.to).or_default();
        if !entry.contains(&spec) {
            entry.push(spec);
        }
    }

    let mut removed: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for c in &candidates {
        removed.entry(c.decl).or_default().push(c.spec);
    }
    let first_decl = candidates.iter().map(|c| c.decl).min().unwrap_or(0);
    let anchor = &decls[first_decl];
    let quote = quote_of(ctx.file, &anchor.src);

    // Inserting after a declaration that disappears would overlap its
    // removal, so the first new import takes its place instead.
    let mut anchor_free = removed
        .get(&first_decl)
        .is_some_and(|specs| specs.len() == anchor.specifiers.len());
    for (d, specs) in &removed {
        if *d == first_decl && anchor_free {
            continue;
        }
        ctx.rewriter.apply(RewriteAction::RemoveImportSpecifiers {
            decl: decls[*d].clone(),
            indices: specs.clone(),
        })?;
    }

    for (target, specs) in targets {
        let existing = import_decls(module, target)
            .find(|d| !d.type_only && !d.specifiers.iter().any(|s| matches!(s, ImportSpecifier::Namespace(_))))
            .cloned();
        if let Some(existing) = existing {
            let names: Vec<String> = specs
                .iter()
                .filter(|(name, local)| !existing_binds(&existing, name, local.as_deref()))
                .map(|(name, local)| match local {
                    Some(local) => format!("{name} as {local}"),
                    None => name.clone(),
                })
                .collect();
            debug!(path = %ctx.file.path.display(), target, "appending to existing import");
            ctx.rewriter.apply(RewriteAction::AppendSpecifiers { decl: existing, names })?;
            continue;
        }

        let decl = named_import_decl(target, quote, &specs);
        if anchor_free {
            ctx.rewriter.apply(RewriteAction::ReplaceImport {
                span: anchor.span,
                decl,
            })?;
            anchor_free = false;
        } else {
            ctx.rewriter.apply(RewriteAction::InsertImport {
                after: anchor.span,
                decl,
            })?;
        }
    }

    if anchor_free {
        // Every new name was appended elsewhere; the old declaration just goes.
        ctx.rewriter.apply(RewriteAction::RemoveImportSpecifiers {
            decl: anchor.clone(),
            indices: (0..anchor.specifiers.len()).collect(),
        })?;
    }
    Ok(())
}

fn imports_name(module: &Module, package: &str, name: &str) -> bool {
    import_decls(module, package).any(|d| existing_binds(d, name, None))
}

fn existing_binds(decl: &ImportDecl, name: &str, local: Option<&str>) -> bool {
    decl.specifiers.iter().any(|s| match s {
        ImportSpecifier::Named(named) => {
            imported_name(named) == name && named.local.sym.as_ref() == local.unwrap_or(name)
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use crate::transforms::run_tsx;
    use pretty_assertions::assert_eq;

    #[test]
    fn moves_reorders_and_merges_into_one_import() {
        let result = run_tsx(
            "currency-utils",
            "import { Button, formatCurrencyForLocale, formatAmountForLocale } from '@sumup/circuit-ui';\n\
             const a = formatCurrencyForLocale(amount, currency, locale);\n\
             const b = formatAmountForLocale(amount, currency, locale);\n",
        );
        let out = result.output.expect("file is rewritten");
        assert_eq!(out.matches("from '@sumup/intl'").count(), 1, "{out}");
        assert!(out.starts_with("import { Button } from '@sumup/circuit-ui';\nimport {"), "{out}");
        assert!(out.contains("formatCurrency,") || out.contains("formatCurrency }"), "{out}");
        assert!(out.contains("formatNumber"), "{out}");
        assert!(out.contains("const a = formatCurrency(amount, locale, currency);\n"), "{out}");
        assert!(out.contains("const b = formatNumber(amount, locale);\n"), "{out}");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn empty_old_import_is_replaced_in_place() {
        let result = run_tsx(
            "currency-utils",
            "import React from 'react';\nimport { formatCurrencyForLocale } from '@sumup/circuit-ui';\n\nformatCurrencyForLocale(1, 'EUR', 'de-DE');\n",
        );
        let out = result.output.expect("file is rewritten");
        assert!(!out.contains("@sumup/circuit-ui"), "{out}");
        assert!(out.starts_with("import React from 'react';\nimport { formatCurrency } from '@sumup/intl';\n\n"), "{out}");
        assert!(out.ends_with("formatCurrency(1, 'de-DE', 'EUR');\n"), "{out}");
    }

    #[test]
    fn appends_to_an_existing_target_import() {
        let result = run_tsx(
            "currency-utils",
            "import { formatDate } from '@sumup/intl';\nimport { Body, formatCurrencyForLocale } from '@sumup/circuit-ui';\nformatCurrencyForLocale(1, 'EUR', 'de-DE');\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some("import { formatDate, formatCurrency } from '@sumup/intl';\nimport { Body } from '@sumup/circuit-ui';\nformatCurrency(1, 'de-DE', 'EUR');\n")
        );
    }

    #[test]
    fn dropped_arguments_are_removed_from_the_call() {
        let result = run_tsx(
            "currency-utils",
            "import { formatAmountForLocale } from '@sumup/circuit-ui';\nformatAmountForLocale(1, 'EUR', 'de-DE');\n",
        );
        assert_eq!(
            result.output.as_deref(),
            Some("import { formatNumber } from '@sumup/intl';\nformatNumber(1, 'de-DE');\n")
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn non_call_uses_block_the_move() {
        let code = "import { formatCurrencyForLocale } from '@sumup/circuit-ui';\nconst f = formatCurrencyForLocale;\n";
        let result = run_tsx("currency-utils", code);
        assert!(result.is_unchanged());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn wrong_arity_blocks_the_move() {
        let code = "import { formatCurrencyForLocale } from '@sumup/circuit-ui';\nformatCurrencyForLocale(1, 'EUR');\n";
        let result = run_tsx("currency-utils", code);
        assert!(result.is_unchanged());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn aliased_imports_keep_their_local_name() {
        let result = run_tsx(
            "currency-utils",
            "import { formatCurrencyForLocale as fmt } from '@sumup/circuit-ui';\nfmt(1, 'EUR', 'de-DE');\n",
        );
        let out = result.output.expect("file is rewritten");
        assert!(out.contains("formatCurrency as fmt"), "{out}");
        assert!(out.ends_with("fmt(1, 'de-DE', 'EUR');\n"), "{out}");
    }

    #[test]
    fn second_run_is_a_no_op() {
        let first = run_tsx(
            "currency-utils",
            "import { formatCurrencyForLocale } from '@sumup/circuit-ui';\nformatCurrencyForLocale(1, 'EUR', 'de-DE');\n",
        );
        let second = run_tsx("currency-utils", first.output.as_deref().unwrap());
        assert!(second.is_unchanged());
    }
}
