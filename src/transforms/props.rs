//! JSX prop rewrites for components imported from a package: renaming a prop,
//! turning boolean flags into an enum prop, and remapping enum values.
//!
//! Every routine reaches the component's styled aliases as well as the
//! component itself.

use std::collections::BTreeMap;

use swc_core::{
    common::Spanned,
    ecma::ast::{JSXAttr, JSXOpeningElement},
};

use super::TransformContext;
use crate::error::Result;
use crate::imports::local_name_for;
use crate::matcher::{attr_string_value, find_jsx_attribute, find_jsx_elements_by_name, has_attr, ValueMatcher};
use crate::rewrite::RewriteAction;
use crate::styled::component_name_set;

/// Rename `from` to `to` on `components`, keeping the value node as is.
#[derive(Debug)]
pub struct PropRename {
    pub components: &'static [&'static str],
    pub from: &'static str,
    pub to: &'static str,
}

/// Replace boolean shorthand flags with one enum prop:
/// `<Body bold>` becomes `<Body variant="highlight">`.
#[derive(Debug)]
pub struct FlagToEnum {
    pub component: &'static str,
    pub prop: &'static str,
    /// `(flag, value)` pairs.
    pub flags: &'static [(&'static str, &'static str)],
}

/// Remap literal values of `prop`. A `None` target strips the prop.
#[derive(Debug)]
pub struct ValueRemap {
    pub component: &'static str,
    pub prop: &'static str,
    pub values: &'static [(&'static str, Option<&'static str>)],
}

/// Opening elements of the component exported as `component` from `package`,
/// including styled aliases. Empty when the file does not import it.
pub(crate) fn component_elements(ctx: &TransformContext<'_>, package: &str, component: &str) -> Vec<JSXOpeningElement> {
    let module = &ctx.file.module;
    match local_name_for(module, package, component) {
        Some(local) => find_jsx_elements_by_name(module, component_name_set(module, &local)),
        None => vec![],
    }
}

fn display_name(element: &JSXOpeningElement, fallback: &str) -> String {
    crate::matcher::element_name(&element.name)
        .unwrap_or(fallback)
        .to_string()
}

pub fn rename_props(ctx: &mut TransformContext<'_>, package: &str, rules: &[PropRename]) -> Result<()> {
    for rule in rules {
        for component in rule.components {
            let elements = component_elements(ctx, package, component);
            for found in find_jsx_attribute(&elements, rule.from, ValueMatcher::Any) {
                let element = &elements[found.element];
                if has_attr(element, rule.to) {
                    let line = ctx.file.line_of(found.attr.span);
                    ctx.warn(format!(
                        "<{}> on line {line} sets both `{}` and `{}`; remove `{}` manually",
                        display_name(element, component),
                        rule.from,
                        rule.to,
                        rule.from
                    ));
                    continue;
                }
                ctx.rewriter.apply(RewriteAction::Rename {
                    span: found.attr.name.span(),
                    name: rule.to.to_string(),
                })?;
            }
        }
    }
    Ok(())
}

pub fn flags_to_enum(ctx: &mut TransformContext<'_>, package: &str, rules: &[FlagToEnum]) -> Result<()> {
    for rule in rules {
        let elements = component_elements(ctx, package, rule.component);
        let mut by_element: BTreeMap<usize, Vec<(&str, &str, JSXAttr)>> = BTreeMap::new();
        for &(flag, value) in rule.flags {
            for found in find_jsx_attribute(&elements, flag, ValueMatcher::Any) {
                by_element.entry(found.element).or_default().push((flag, value, found.attr));
            }
        }

        for (idx, flags) in by_element {
            let element = &elements[idx];
            let name = display_name(element, rule.component);
            let line = ctx.file.line_of(element.span);

            if flags.len() > 1 {
                let names: Vec<_> = flags.iter().map(|(f, _, _)| format!("`{f}`")).collect();
                ctx.warn(format!(
                    "<{name}> on line {line} combines {}; choose a single `{}` manually",
                    names.join(", "),
                    rule.prop
                ));
                continue;
            }
            let Some((flag, value, attr)) = flags.into_iter().next() else {
                continue;
            };
            if has_attr(element, rule.prop) {
                ctx.warn(format!(
                    "<{name}> on line {line} sets both `{flag}` and `{}`; remove `{flag}` manually",
                    rule.prop
                ));
                continue;
            }
            if !ValueMatcher::Shorthand.matches(attr.value.as_ref()) {
                ctx.warn(format!(
                    "`{flag}` on <{name}> (line {line}) has an explicit value; replace it with `{}=\"{value}\"` manually",
                    rule.prop
                ));
                continue;
            }
            ctx.rewriter.apply(RewriteAction::Replace {
                span: attr.span,
                text: format!("{}=\"{value}\"", rule.prop),
            })?;
        }
    }
    Ok(())
}

pub fn remap_values(ctx: &mut TransformContext<'_>, package: &str, rules: &[ValueRemap]) -> Result<()> {
    for rule in rules {
        let elements = component_elements(ctx, package, rule.component);
        for found in find_jsx_attribute(&elements, rule.prop, ValueMatcher::Explicit) {
            let Some(value) = found.attr.value.as_ref() else {
                continue;
            };
            let Some(current) = attr_string_value(value) else {
                let name = display_name(&elements[found.element], rule.component);
                let line = ctx.file.line_of(found.attr.span);
                ctx.warn(format!(
                    "`{}` on <{name}> (line {line}) is not a string literal; check its value manually",
                    rule.prop
                ));
                continue;
            };
            match rule.values.iter().find(|(from, _)| *from == current) {
                Some((_, Some(to))) => ctx.rewriter.apply(RewriteAction::Replace {
                    span: value.span(),
                    text: format!("\"{to}\""),
                })?,
                Some((_, None)) => ctx.rewriter.apply(RewriteAction::RemoveAttribute { span: found.attr.span })?,
                None => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::transforms::run_tsx;
    use pretty_assertions::assert_eq;

    const IMPORT: &str = "import { Body, Button, Headline, SubHeadline, Input } from '@sumup/circuit-ui';\n";

    fn run(name: &str, body: &str) -> (Option<String>, Vec<String>) {
        let result = run_tsx(name, &format!("{IMPORT}{body}"));
        let output = result.output.map(|o| o.trim_start_matches(IMPORT).to_string());
        (output, result.diagnostics.into_iter().map(|d| d.message).collect())
    }

    #[test]
    fn shorthand_bold_becomes_highlight_variant() {
        let (out, diags) = run("body-variant-highlight", "const a = <Body bold>Hi</Body>;\n");
        assert_eq!(out.as_deref(), Some("const a = <Body variant=\"highlight\">Hi</Body>;\n"));
        assert!(diags.is_empty());
    }

    #[test]
    fn explicit_bold_is_left_alone_and_reported() {
        let (out, diags) = run("body-variant-highlight", "const a = <Body bold={!true}>Hi</Body>;\n");
        assert_eq!(out, None);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("`bold`"));
        assert!(diags[0].contains("Body"));
    }

    #[test]
    fn competing_flags_are_reported() {
        let (out, diags) = run("button-variant-enum", "const a = <Button primary secondary>Go</Button>;\n");
        assert_eq!(out, None);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn existing_target_prop_blocks_conversion() {
        let (out, diags) = run("button-variant-enum", "const a = <Button primary variant=\"secondary\" />;\n");
        assert_eq!(out, None);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn headline_sizes_follow_the_table() {
        let sizes = ["zetta", "exa", "peta", "tera", "giga", "mega", "kilo"];
        let expected = ["zetta", "one", "one", "two", "three", "four", "four"];
        for (input, want) in sizes.iter().zip(expected) {
            let code = format!("const a = <Headline size=\"{input}\">x</Headline>;\n");
            let (out, _) = run("typography-sizes", &code);
            let out = out.unwrap_or(code.clone());
            assert_eq!(out, format!("const a = <Headline size=\"{want}\">x</Headline>;\n"), "size {input}");
        }
    }

    #[test]
    fn removed_sizes_are_stripped() {
        let (out, _) = run("typography-sizes", "const a = <SubHeadline size=\"kilo\" as=\"h3\">x</SubHeadline>;\n");
        assert_eq!(out.as_deref(), Some("const a = <SubHeadline as=\"h3\">x</SubHeadline>;\n"));
    }

    #[test]
    fn dynamic_values_are_reported_not_rewritten() {
        let (out, diags) = run("typography-sizes", "const a = <Headline size={size}>x</Headline>;\n");
        assert_eq!(out, None);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn styled_aliases_are_rewritten_like_the_component() {
        let (out, _) = run(
            "button-size-giga",
            "const Red = styled(Button)`color: red;`;\nconst a = <><Button size=\"giga\" /><Red size=\"giga\" /></>;\n",
        );
        assert_eq!(
            out.as_deref(),
            Some("const Red = styled(Button)`color: red;`;\nconst a = <><Button size=\"mega\" /><Red size=\"mega\" /></>;\n")
        );
    }

    #[test]
    fn deep_ref_becomes_ref() {
        let (out, _) = run("input-deepref-prop", "const a = <Input deepRef={inputRef} label=\"Name\" />;\n");
        assert_eq!(out.as_deref(), Some("const a = <Input ref={inputRef} label=\"Name\" />;\n"));
    }

    #[test]
    fn existing_target_prop_blocks_rename() {
        let (out, diags) = run("input-deepref-prop", "const a = <Input deepRef={a} ref={b} />;\n");
        assert_eq!(out, None);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("`deepRef` and `ref`"), "{}", diags[0]);
        assert!(diags[0].contains("line 2"), "{}", diags[0]);
    }

    #[test]
    fn components_from_other_packages_are_ignored() {
        let result = run_tsx(
            "body-variant-highlight",
            "import { Body } from './Body';\nconst a = <Body bold>Hi</Body>;\n",
        );
        assert!(result.is_unchanged());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let first = run_tsx(
            "typography-sizes",
            &format!("{IMPORT}const a = <Headline size=\"exa\">x</Headline>;\n"),
        );
        let migrated = first.output.expect("first run rewrites");
        let second = run_tsx("typography-sizes", &migrated);
        assert!(second.is_unchanged());
    }
}
