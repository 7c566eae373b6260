//! Theme token remaps.
//!
//! Theme objects reach components through props and styled callbacks rather
//! than imports, so these rewrites are not gated on an import. A token is
//! matched as an exact member chain under one of the theme roots.

use swc_core::common::Spanned;

use super::TransformContext;
use crate::error::Result;
use crate::matcher::find_dotted_property;
use crate::rewrite::RewriteAction;

/// Receivers a theme is commonly reached through.
pub const THEME_ROOTS: &[&str] = &["theme", "props.theme"];

#[derive(Debug, Clone, Copy)]
pub enum TokenReplacement {
    /// Another token under the same root, e.g. `borderRadius.bit`.
    Path(&'static str),
    /// A fixed value, printed as a string literal.
    Literal(&'static str),
}

#[derive(Debug)]
pub struct TokenRemap {
    /// Path below the theme root, e.g. `borderRadius.kilo`.
    pub path: &'static str,
    pub replacement: TokenReplacement,
}

pub fn remap_tokens(ctx: &mut TransformContext<'_>, rules: &[TokenRemap]) -> Result<()> {
    for rule in rules {
        for root in THEME_ROOTS {
            for found in find_dotted_property(&ctx.file.module, &format!("{root}.{}", rule.path)) {
                let text = match rule.replacement {
                    TokenReplacement::Path(path) => format!("{root}.{path}"),
                    TokenReplacement::Literal(value) => format!("'{value}'"),
                };
                ctx.rewriter.apply(RewriteAction::Replace {
                    span: found.span(),
                    text,
                })?;
            }
        }
    }
    Ok(())
}
