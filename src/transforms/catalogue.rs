//! The registered transforms. Each entry is a table handed to one of the
//! generic routines; adding a migration means adding data here.

use tracing::debug;

use super::props::{flags_to_enum, remap_values, rename_props, FlagToEnum, PropRename, ValueRemap};
use super::relocate::{move_functions, FunctionMove};
use super::rename::{rename_exports, ExportChange, ExportRule};
use super::theme::{remap_tokens, TokenRemap, TokenReplacement};
use super::{Transform, TransformContext, TransformResult};
use crate::error::Result;
use crate::imports::import_decls;
use crate::source::ParsedFile;

pub const CIRCUIT_UI: &str = "@sumup/circuit-ui";
pub const ICONS: &str = "@sumup/icons";
pub const INTL: &str = "@sumup/intl";

#[derive(Debug)]
enum Rules {
    Props(&'static [PropRename]),
    Flags(&'static [FlagToEnum]),
    Values(&'static [ValueRemap]),
    Exports(&'static [ExportRule]),
    Tokens(&'static [TokenRemap]),
    Moves(&'static [FunctionMove]),
}

#[derive(Debug)]
struct Catalogued {
    name: &'static str,
    description: &'static str,
    /// Files that import nothing from this package are left alone.
    package: Option<&'static str>,
    rules: Rules,
}

impl Transform for Catalogued {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, file: &ParsedFile) -> Result<TransformResult> {
        let package = self.package.unwrap_or_default();
        if self.package.is_some() && import_decls(&file.module, package).next().is_none() {
            debug!(path = %file.path.display(), transform = self.name, package, "no import from package");
            return Ok(TransformResult::unchanged());
        }

        let mut ctx = TransformContext::new(file);
        match self.rules {
            Rules::Props(rules) => rename_props(&mut ctx, package, rules)?,
            Rules::Flags(rules) => flags_to_enum(&mut ctx, package, rules)?,
            Rules::Values(rules) => remap_values(&mut ctx, package, rules)?,
            Rules::Exports(rules) => rename_exports(&mut ctx, package, rules)?,
            Rules::Tokens(rules) => remap_tokens(&mut ctx, rules)?,
            Rules::Moves(rules) => move_functions(&mut ctx, package, rules)?,
        }
        Ok(ctx.finish())
    }
}

// -----------------------------------------------------------------------------
// Table helpers
// -----------------------------------------------------------------------------

const fn renamed(name: &'static str, to: &'static str) -> ExportRule {
    ExportRule {
        name,
        change: ExportChange::Renamed(to),
    }
}

const fn removed(name: &'static str, hint: &'static str) -> ExportRule {
    ExportRule {
        name,
        change: ExportChange::Removed { hint },
    }
}

const NO_RICH_TEXT_ICONS: &str = "rich text icons have no successor, inline the SVG if it is still needed";

// -----------------------------------------------------------------------------
// Props
// -----------------------------------------------------------------------------

static INPUT_DEEP_REF: &[PropRename] = &[PropRename {
    components: &["Input", "TextArea", "Select", "CurrencyInput", "SearchInput"],
    from: "deepRef",
    to: "ref",
}];

static HAMBURGER_LABELS: &[PropRename] = &[
    PropRename {
        components: &["Hamburger"],
        from: "labelActive",
        to: "activeLabel",
    },
    PropRename {
        components: &["Hamburger"],
        from: "labelInActive",
        to: "inactiveLabel",
    },
];

static TOGGLE_LABELS: &[PropRename] = &[
    PropRename {
        components: &["Toggle"],
        from: "labelChecked",
        to: "checkedLabel",
    },
    PropRename {
        components: &["Toggle"],
        from: "labelUnchecked",
        to: "uncheckedLabel",
    },
];

static BADGE_VARIANT: &[PropRename] = &[PropRename {
    components: &["Badge"],
    from: "color",
    to: "variant",
}];

static BODY_HIGHLIGHT: &[FlagToEnum] = &[FlagToEnum {
    component: "Body",
    prop: "variant",
    flags: &[("bold", "highlight")],
}];

static BUTTON_VARIANT: &[FlagToEnum] = &[FlagToEnum {
    component: "Button",
    prop: "variant",
    flags: &[("primary", "primary"), ("secondary", "secondary"), ("tertiary", "tertiary")],
}];

static LIST_VARIANT: &[FlagToEnum] = &[FlagToEnum {
    component: "List",
    prop: "variant",
    flags: &[("ordered", "ordered")],
}];

static INLINE_MESSAGE_VARIANT: &[FlagToEnum] = &[FlagToEnum {
    component: "InlineMessage",
    prop: "variant",
    flags: &[("success", "success"), ("warning", "warning"), ("danger", "danger")],
}];

static TYPOGRAPHY_SIZES: &[ValueRemap] = &[
    ValueRemap {
        component: "Headline",
        prop: "size",
        values: &[
            ("exa", Some("one")),
            ("peta", Some("one")),
            ("tera", Some("two")),
            ("giga", Some("three")),
            ("mega", Some("four")),
            ("kilo", Some("four")),
        ],
    },
    ValueRemap {
        component: "SubHeadline",
        prop: "size",
        values: &[("mega", None), ("kilo", None)],
    },
    ValueRemap {
        component: "Body",
        prop: "size",
        values: &[("kilo", Some("two")), ("mega", Some("one"))],
    },
];

static BUTTON_SIZES: &[ValueRemap] = &[ValueRemap {
    component: "Button",
    prop: "size",
    values: &[("giga", Some("mega"))],
}];

// -----------------------------------------------------------------------------
// Exports
// -----------------------------------------------------------------------------

static COMPONENT_NAMES: &[ExportRule] = &[
    renamed("Text", "Body"),
    renamed("TextProps", "BodyProps"),
    renamed("Heading", "Headline"),
    renamed("HeadingProps", "HeadlineProps"),
    renamed("SubHeading", "SubHeadline"),
    renamed("SubHeadingProps", "SubHeadlineProps"),
];

static ICON_NAMES: &[ExportRule] = &[
    renamed("Checkmark", "Confirm"),
    renamed("CircleCheckmark", "ConfirmCircle"),
    renamed("CircleCross", "Alert"),
    renamed("CircleInfo", "Info"),
    renamed("CircleWarning", "Notify"),
    renamed("Bin", "Delete"),
    renamed("Pen", "Edit"),
    renamed("ThumbUp", "Like"),
    renamed("ThumbDown", "Dislike"),
    removed("Bold", NO_RICH_TEXT_ICONS),
    removed("Italic", NO_RICH_TEXT_ICONS),
    removed("Underline", NO_RICH_TEXT_ICONS),
    removed("SumUpLogo", "use the `SumUpLogo` component from @sumup/circuit-ui"),
];

// -----------------------------------------------------------------------------
// Theme tokens and moved functions
// -----------------------------------------------------------------------------

static BORDER_RADIUS: &[TokenRemap] = &[
    TokenRemap {
        path: "borderRadius.kilo",
        replacement: TokenReplacement::Literal("1px"),
    },
    TokenRemap {
        path: "borderRadius.mega",
        replacement: TokenReplacement::Path("borderRadius.bit"),
    },
    TokenRemap {
        path: "borderRadius.giga",
        replacement: TokenReplacement::Path("borderRadius.byte"),
    },
];

static CURRENCY_UTILS: &[FunctionMove] = &[
    FunctionMove {
        name: "formatCurrencyForLocale",
        to: INTL,
        new_name: "formatCurrency",
        old_arity: 3,
        args: &[0, 2, 1],
    },
    FunctionMove {
        name: "formatAmountForLocale",
        to: INTL,
        new_name: "formatNumber",
        old_arity: 3,
        args: &[0, 2],
    },
];

// -----------------------------------------------------------------------------
// Registry
// -----------------------------------------------------------------------------

pub(crate) fn all() -> Vec<Box<dyn Transform>> {
    let entries = [
        Catalogued {
            name: "input-deepref-prop",
            description: "Rename `deepRef` to `ref` on form inputs",
            package: Some(CIRCUIT_UI),
            rules: Rules::Props(INPUT_DEEP_REF),
        },
        Catalogued {
            name: "hamburger-label-props",
            description: "Rename the Hamburger `labelActive`/`labelInActive` props",
            package: Some(CIRCUIT_UI),
            rules: Rules::Props(HAMBURGER_LABELS),
        },
        Catalogued {
            name: "toggle-label-props",
            description: "Rename the Toggle `labelChecked`/`labelUnchecked` props",
            package: Some(CIRCUIT_UI),
            rules: Rules::Props(TOGGLE_LABELS),
        },
        Catalogued {
            name: "badge-variant-enum",
            description: "Rename the Badge `color` prop to `variant`",
            package: Some(CIRCUIT_UI),
            rules: Rules::Props(BADGE_VARIANT),
        },
        Catalogued {
            name: "body-variant-highlight",
            description: "Replace the Body `bold` flag with `variant=\"highlight\"`",
            package: Some(CIRCUIT_UI),
            rules: Rules::Flags(BODY_HIGHLIGHT),
        },
        Catalogued {
            name: "button-variant-enum",
            description: "Replace the Button `primary`/`secondary`/`tertiary` flags with `variant`",
            package: Some(CIRCUIT_UI),
            rules: Rules::Flags(BUTTON_VARIANT),
        },
        Catalogued {
            name: "list-variant-enum",
            description: "Replace the List `ordered` flag with `variant=\"ordered\"`",
            package: Some(CIRCUIT_UI),
            rules: Rules::Flags(LIST_VARIANT),
        },
        Catalogued {
            name: "inline-message-variant-enum",
            description: "Replace the InlineMessage status flags with `variant`",
            package: Some(CIRCUIT_UI),
            rules: Rules::Flags(INLINE_MESSAGE_VARIANT),
        },
        Catalogued {
            name: "typography-sizes",
            description: "Map Headline, SubHeadline and Body sizes to the numbered scale",
            package: Some(CIRCUIT_UI),
            rules: Rules::Values(TYPOGRAPHY_SIZES),
        },
        Catalogued {
            name: "button-size-giga",
            description: "Replace the removed Button `giga` size with `mega`",
            package: Some(CIRCUIT_UI),
            rules: Rules::Values(BUTTON_SIZES),
        },
        Catalogued {
            name: "component-names-v2",
            description: "Rename Text, Heading and SubHeading to Body, Headline and SubHeadline",
            package: Some(CIRCUIT_UI),
            rules: Rules::Exports(COMPONENT_NAMES),
        },
        Catalogued {
            name: "icon-names-v2",
            description: "Rename icons and report the ones removed from @sumup/icons",
            package: Some(ICONS),
            rules: Rules::Exports(ICON_NAMES),
        },
        Catalogued {
            name: "theme-border-radius",
            description: "Remap the legacy `theme.borderRadius` tokens",
            package: None,
            rules: Rules::Tokens(BORDER_RADIUS),
        },
        Catalogued {
            name: "currency-utils",
            description: "Move the currency formatters to @sumup/intl",
            package: Some(CIRCUIT_UI),
            rules: Rules::Moves(CURRENCY_UTILS),
        },
    ];
    entries
        .into_iter()
        .map(|t| Box::new(t) as Box<dyn Transform>)
        .collect()
}
