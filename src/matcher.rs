//! Node matchers. Each finder returns owned copies of the matched nodes; the
//! spans they carry are what the rewriter edits.

use std::collections::HashSet;

use swc_core::ecma::{
    ast::{
        Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElementName, JSXExpr, JSXOpeningElement, Lit,
        MemberExpr, MemberProp, Module, SimpleAssignTarget,
    },
    visit::{Visit, VisitWith},
};

/// Tag name of a plain `<Ident>` element.
pub fn element_name(name: &JSXElementName) -> Option<&str> {
    match name {
        JSXElementName::Ident(id) => Some(id.sym.as_ref()),
        JSXElementName::JSXMemberExpr(_) | JSXElementName::JSXNamespacedName(_) => None,
    }
}

pub fn attr_name(attr: &JSXAttr) -> Option<&str> {
    match &attr.name {
        JSXAttrName::Ident(id) => Some(id.sym.as_ref()),
        JSXAttrName::JSXNamespacedName(_) => None,
    }
}

pub fn has_attr(element: &JSXOpeningElement, key: &str) -> bool {
    element.attrs.iter().any(|a| {
        if let JSXAttrOrSpread::JSXAttr(attr) = a {
            return attr_name(attr) == Some(key);
        }
        false
    })
}

fn expr_string_value(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string()),
        Expr::Tpl(t) if t.exprs.is_empty() && t.quasis.len() == 1 => Some(t.quasis[0].raw.to_string()),
        Expr::Paren(p) => expr_string_value(&p.expr),
        Expr::TsConstAssertion(c) => expr_string_value(&c.expr),
        Expr::TsAs(a) => expr_string_value(&a.expr),
        _ => None,
    }
}

/// String value of an attribute, whichever node shape the parser chose for
/// it: `size="mega"`, `size={'mega'}` and ``size={`mega`}`` all give `mega`.
pub fn attr_string_value(value: &JSXAttrValue) -> Option<String> {
    match value {
        JSXAttrValue::Lit(Lit::Str(s)) => Some(s.value.to_string()),
        JSXAttrValue::JSXExprContainer(container) => match &container.expr {
            JSXExpr::Expr(expr) => expr_string_value(expr),
            JSXExpr::JSXEmptyExpr(_) => None,
        },
        _ => None,
    }
}

/// Constraint on the value of a JSX attribute.
#[derive(Debug, Clone, Copy)]
pub enum ValueMatcher<'a> {
    Any,
    /// `<X flag>` with no value.
    Shorthand,
    /// Anything but the shorthand form.
    Explicit,
    Literal(&'a str),
    OneOf(&'a [&'a str]),
}

impl ValueMatcher<'_> {
    pub fn matches(&self, value: Option<&JSXAttrValue>) -> bool {
        match self {
            ValueMatcher::Any => true,
            ValueMatcher::Shorthand => value.is_none(),
            ValueMatcher::Explicit => value.is_some(),
            ValueMatcher::Literal(expected) => value
                .and_then(attr_string_value)
                .is_some_and(|v| v == *expected),
            ValueMatcher::OneOf(options) => value
                .and_then(attr_string_value)
                .is_some_and(|v| options.contains(&v.as_str())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttributeMatch {
    /// Index into the element slice the attribute was found in.
    pub element: usize,
    pub attr: JSXAttr,
}

struct ElementCollector {
    names: HashSet<String>,
    out: Vec<JSXOpeningElement>,
}

impl Visit for ElementCollector {
    fn visit_jsx_opening_element(&mut self, n: &JSXOpeningElement) {
        if element_name(&n.name).is_some_and(|name| self.names.contains(name)) {
            self.out.push(n.clone());
        }
        n.visit_children_with(self);
    }
}

/// Opening elements whose tag is one of `names`, in source order.
pub fn find_jsx_elements_by_name<I, S>(module: &Module, names: I) -> Vec<JSXOpeningElement>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut collector = ElementCollector {
        names: names.into_iter().map(|n| n.as_ref().to_string()).collect(),
        out: vec![],
    };
    if collector.names.is_empty() {
        return vec![];
    }
    module.visit_with(&mut collector);
    collector.out
}

/// Attributes called `attr` on `elements` whose value satisfies `matcher`.
pub fn find_jsx_attribute(elements: &[JSXOpeningElement], attr: &str, matcher: ValueMatcher<'_>) -> Vec<AttributeMatch> {
    let mut out = vec![];
    for (idx, element) in elements.iter().enumerate() {
        for a in &element.attrs {
            if let JSXAttrOrSpread::JSXAttr(jsx_attr) = a {
                if attr_name(jsx_attr) == Some(attr) && matcher.matches(jsx_attr.value.as_ref()) {
                    out.push(AttributeMatch {
                        element: idx,
                        attr: jsx_attr.clone(),
                    });
                }
            }
        }
    }
    out
}

/// Segments of a statically known member chain rooted at an identifier:
/// `theme.borderRadius['mega']` gives `["theme", "borderRadius", "mega"]`.
pub fn static_member_path(expr: &MemberExpr) -> Option<Vec<String>> {
    fn walk(e: &Expr, out: &mut Vec<String>) -> bool {
        match e {
            Expr::Ident(i) => {
                out.push(i.sym.to_string());
                true
            }
            Expr::Member(m) => walk_member(m, out),
            _ => false,
        }
    }
    fn walk_member(m: &MemberExpr, out: &mut Vec<String>) -> bool {
        if !walk(&m.obj, out) {
            return false;
        }
        match &m.prop {
            MemberProp::Ident(p) => {
                out.push(p.sym.to_string());
                true
            }
            MemberProp::Computed(c) => match &*c.expr {
                Expr::Lit(Lit::Str(s)) => {
                    out.push(s.value.to_string());
                    true
                }
                _ => false,
            },
            MemberProp::PrivateName(_) => false,
        }
    }
    let mut out = vec![];
    walk_member(expr, &mut out).then_some(out)
}

struct DottedCollector<'a> {
    path: Vec<&'a str>,
    out: Vec<MemberExpr>,
}

impl Visit for DottedCollector<'_> {
    fn visit_member_expr(&mut self, n: &MemberExpr) {
        if let Some(segments) = static_member_path(n) {
            if segments.len() == self.path.len() && segments.iter().zip(&self.path).all(|(a, b)| a.as_str() == *b) {
                self.out.push(n.clone());
                return;
            }
        }
        n.visit_children_with(self);
    }

    // Writes to a token are never rewritten.
    fn visit_simple_assign_target(&mut self, n: &SimpleAssignTarget) {
        if let SimpleAssignTarget::Member(m) = n {
            m.obj.visit_with(self);
            if let MemberProp::Computed(c) = &m.prop {
                c.visit_with(self);
            }
            return;
        }
        n.visit_children_with(self);
    }
}

/// Member expressions spelling exactly the dotted `path`.
pub fn find_dotted_property(module: &Module, path: &str) -> Vec<MemberExpr> {
    let mut collector = DottedCollector {
        path: path.split('.').collect(),
        out: vec![],
    };
    module.visit_with(&mut collector);
    collector.out
}
