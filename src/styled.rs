//! Styled aliases: local names created by wrapping a component in `styled(...)`.
//!
//! Detection is purely syntactic. Only a callee spelled `styled` is
//! recognised, so `import s from '@emotion/styled'` followed by `s(Button)`
//! is missed, and nothing is followed across modules.

use std::collections::BTreeSet;

use swc_core::ecma::{
    ast::{Callee, Expr, Ident, Module, VarDeclarator},
    visit::{Visit, VisitWith},
};

const STYLING_FUNCTION: &str = "styled";

/// Component identifier wrapped by `expr`, if it is a styled call chain.
fn styled_target(expr: &Expr) -> Option<&Ident> {
    match expr {
        Expr::TaggedTpl(t) => styled_target(&t.tag),
        Expr::Paren(p) => styled_target(&p.expr),
        Expr::Member(m) => styled_target(&m.obj),
        Expr::Call(c) => {
            let Callee::Expr(callee) = &c.callee else {
                return None;
            };
            match &**callee {
                Expr::Ident(f) if f.sym.as_ref() == STYLING_FUNCTION => {
                    match c.args.first() {
                        Some(arg) if arg.spread.is_none() => match &*arg.expr {
                            Expr::Ident(target) => Some(target),
                            _ => None,
                        },
                        _ => None,
                    }
                }
                other => styled_target(other),
            }
        }
        _ => None,
    }
}

struct StyledCollector<'a> {
    target: &'a str,
    out: Vec<String>,
}

impl Visit for StyledCollector<'_> {
    fn visit_var_declarator(&mut self, d: &VarDeclarator) {
        if let (Some(name), Some(init)) = (d.name.as_ident(), &d.init) {
            if styled_target(init).is_some_and(|t| t.sym.as_ref() == self.target) {
                self.out.push(name.id.sym.to_string());
            }
        }
        d.visit_children_with(self);
    }
}

/// Names declared as `const X = styled(<local_name>)...`.
pub fn find_styled_component_names(module: &Module, local_name: &str) -> Vec<String> {
    let mut collector = StyledCollector {
        target: local_name,
        out: vec![],
    };
    module.visit_with(&mut collector);
    collector.out
}

/// `local_name` plus every styled alias of it, transitively.
pub fn component_name_set(module: &Module, local_name: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::from([local_name.to_string()]);
    let mut pending = vec![local_name.to_string()];
    while let Some(name) = pending.pop() {
        for alias in find_styled_component_names(module, &name) {
            if names.insert(alias.clone()) {
                pending.push(alias);
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_tsx;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_tagged_template_aliases() {
        let file = parse_tsx(
            "const Red = styled(Button)`color: red;`;\n\
             const Plain = styled(Button);\n\
             const Fn = styled(Button)(({ theme }) => ({ color: theme.colors.p500 }));\n\
             const Other = styled(Card)`margin: 0;`;\n",
        );
        assert_eq!(
            find_styled_component_names(&file.module, "Button"),
            vec!["Red", "Plain", "Fn"]
        );
    }

    #[test]
    fn follows_attrs_chains_and_nested_scopes() {
        let file = parse_tsx(
            "function make() {\n  const Inner = styled(Button).attrs({ type: 'button' })`x`;\n  return Inner;\n}\n",
        );
        assert_eq!(find_styled_component_names(&file.module, "Button"), vec!["Inner"]);
    }

    #[test]
    fn name_set_is_transitive() {
        let file = parse_tsx(
            "const A = styled(Button)`a`;\nconst B = styled(A)`b`;\nconst C = styled.div`c`;\n",
        );
        let set = component_name_set(&file.module, "Button");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["A", "B", "Button"]);
    }

    #[test]
    fn renamed_styling_function_is_a_known_gap() {
        let file = parse_tsx(
            "import s from '@emotion/styled';\nconst Red = s(Button)`color: red;`;\n",
        );
        assert!(find_styled_component_names(&file.module, "Button").is_empty());
    }
}
