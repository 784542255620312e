//! Utility-class classification.
//!
//! Decides which utility classes become semantic component props, which are
//! rewritten to design-system tokens, which are dropped, and which are kept.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::passes::{Control, Layout, Shape};

#[derive(Debug, Error)]
pub enum ClassMapError {
    #[error("failed to read class map {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid class map: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Categorized outcome of running [`ClassMap::classify`] over one class string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTransformResult {
    pub mapped_classes: Vec<String>,
    pub removed_classes: Vec<String>,
    pub preserved_classes: Vec<String>,
    pub transformed_classes: String,
}

/// Props derived from a flex container's classes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlexProps {
    pub direction: Option<&'static str>,
    pub gap: Option<String>,
    pub align: Option<&'static str>,
    pub justify: Option<&'static str>,
    pub wrap: Option<&'static str>,
}

impl FlexProps {
    pub fn into_props(self) -> Vec<(&'static str, String)> {
        let mut props = Vec::new();
        if let Some(direction) = self.direction {
            props.push(("direction", direction.to_string()));
        }
        if let Some(gap) = self.gap {
            props.push(("gap", gap));
        }
        if let Some(align) = self.align {
            props.push(("align", align.to_string()));
        }
        if let Some(justify) = self.justify {
            props.push(("justify", justify.to_string()));
        }
        if let Some(wrap) = self.wrap {
            props.push(("wrap", wrap.to_string()));
        }
        props
    }
}

/// Props derived from a grid container's classes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridProps {
    pub columns: Option<String>,
    pub rows: Option<String>,
    pub gap: Option<String>,
}

impl GridProps {
    pub fn into_props(self) -> Vec<(&'static str, String)> {
        [("columns", self.columns), ("rows", self.rows), ("gap", self.gap)]
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    Primary,
    Secondary,
    Outline,
    Ghost,
    Danger,
}

impl ButtonVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Outline => "outline",
            Self::Ghost => "ghost",
            Self::Danger => "danger",
        }
    }
}

/// Tokens split by whether a shape absorbed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Absorption {
    pub absorbed: Vec<String>,
    pub remaining: Vec<String>,
}

const FLEX_DIRECTIONS: &[(&str, &str)] = &[
    ("flex-row", "row"),
    ("flex-col", "column"),
    ("flex-row-reverse", "row-reverse"),
    ("flex-col-reverse", "column-reverse"),
];

const FLEX_ALIGN: &[(&str, &str)] = &[
    ("items-start", "start"),
    ("items-center", "center"),
    ("items-end", "end"),
    ("items-stretch", "stretch"),
    ("items-baseline", "baseline"),
];

const FLEX_JUSTIFY: &[(&str, &str)] = &[
    ("justify-start", "start"),
    ("justify-center", "center"),
    ("justify-end", "end"),
    ("justify-between", "between"),
    ("justify-around", "around"),
    ("justify-evenly", "evenly"),
];

const FLEX_WRAP: &[(&str, &str)] = &[
    ("flex-wrap", "wrap"),
    ("flex-nowrap", "nowrap"),
    ("flex-wrap-reverse", "wrap-reverse"),
];

/// Styling a Button component owns
const BUTTON_ABSORBED: &[&str] = &[
    "bg-*", "hover:*", "focus:*", "active:*", "disabled:*", "px-*", "py-*", "rounded*",
    "font-*", "shadow*", "border*", "transition*", "duration-*", "cursor-pointer",
    "text-white", "text-xs", "text-sm", "text-base", "text-lg",
];

/// Styling an Input / TextArea component owns
const FIELD_ABSORBED: &[&str] = &[
    "border*", "rounded*", "px-*", "py-*", "p-*", "bg-white", "focus:*", "placeholder*",
    "shadow*", "outline-none", "text-sm", "text-base", "transition*",
];

fn lookup(table: &[(&str, &'static str)], token: &str) -> Option<&'static str> {
    table.iter().find(|(class, _)| *class == token).map(|(_, value)| *value)
}

/// `prefix*` matches by prefix, anything else must match exactly
fn matches_pattern(pattern: &str, token: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => token.starts_with(prefix),
        None => pattern == token,
    }
}

/// Class vocabulary used by every pass. Loadable from JSON; any table left
/// out of the JSON keeps its built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassMap {
    /// Spacing scale suffix (`4` in `gap-4`) to size token
    pub spacing: BTreeMap<String, String>,
    /// Utility class to design-system class
    pub rewrites: BTreeMap<String, String>,
    /// Classes the components make redundant; `prefix*` globs allowed
    pub removals: Vec<String>,
}

impl Default for ClassMap {
    fn default() -> Self {
        let spacing = [
            ("0", "none"), ("0.5", "xs"), ("1", "xs"), ("1.5", "xs"), ("2", "sm"), ("3", "sm"),
            ("4", "md"), ("5", "md"), ("6", "lg"), ("8", "xl"), ("10", "2xl"), ("12", "2xl"),
        ];
        let rewrites = [
            ("bg-white", "bg-background"),
            ("bg-gray-50", "bg-muted"),
            ("bg-gray-100", "bg-muted"),
            ("text-gray-900", "text-foreground"),
            ("text-gray-800", "text-foreground"),
            ("text-gray-600", "text-muted-foreground"),
            ("text-gray-500", "text-muted-foreground"),
            ("border-gray-200", "border-border"),
            ("border-gray-300", "border-border"),
            ("bg-blue-600", "bg-primary"),
            ("text-blue-600", "text-primary"),
        ];
        let removals = ["focus:outline-none", "focus:ring*", "focus:border-*", "transition*", "duration-*", "ease-*"];

        Self {
            spacing: spacing.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            rewrites: rewrites.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            removals: removals.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl ClassMap {
    pub fn from_json(json: &str) -> Result<Self, ClassMapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassMapError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ClassMapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn spacing_token(&self, token: &str, prefix: &str) -> Option<String> {
        token.strip_prefix(prefix).and_then(|scale| self.spacing.get(scale)).cloned()
    }

    /// Run the residual class sweep over one class string
    pub fn classify(&self, class_string: &str) -> ClassTransformResult {
        let mut result = ClassTransformResult::default();
        let mut kept: Vec<&str> = Vec::new();

        for token in class_string.split_whitespace() {
            if let Some(replacement) = self.rewrites.get(token) {
                result.mapped_classes.push(token.to_string());
                kept.push(replacement);
            } else if self.removals.iter().any(|p| matches_pattern(p, token)) {
                result.removed_classes.push(token.to_string());
            } else {
                result.preserved_classes.push(token.to_string());
                kept.push(token);
            }
        }

        result.transformed_classes = kept.join(" ");
        result
    }

    pub fn derive_flex_props(&self, tokens: &[String]) -> FlexProps {
        let mut props = FlexProps::default();
        for token in tokens {
            let token = token.as_str();
            if let Some(direction) = lookup(FLEX_DIRECTIONS, token) {
                props.direction = Some(direction);
            } else if let Some(align) = lookup(FLEX_ALIGN, token) {
                props.align = Some(align);
            } else if let Some(justify) = lookup(FLEX_JUSTIFY, token) {
                props.justify = Some(justify);
            } else if let Some(wrap) = lookup(FLEX_WRAP, token) {
                props.wrap = Some(wrap);
            } else if let Some(gap) = self.spacing_token(token, "gap-") {
                props.gap = Some(gap);
            }
        }
        props
    }

    pub fn derive_grid_props(&self, tokens: &[String]) -> GridProps {
        let mut props = GridProps::default();
        for token in tokens {
            if let Some(columns) = token.strip_prefix("grid-cols-").filter(|n| is_count(n)) {
                props.columns = Some(columns.to_string());
            } else if let Some(rows) = token.strip_prefix("grid-rows-").filter(|n| is_count(n)) {
                props.rows = Some(rows.to_string());
            } else if let Some(gap) = self.spacing_token(token, "gap-") {
                props.gap = Some(gap);
            }
        }
        props
    }

    /// Whether `shape` turns `token` into a prop or owns its styling
    pub fn absorbs(&self, token: &str, shape: Shape) -> bool {
        match shape {
            Shape::Container(Layout::Flex) => {
                token == "flex"
                    || lookup(FLEX_DIRECTIONS, token).is_some()
                    || lookup(FLEX_ALIGN, token).is_some()
                    || lookup(FLEX_JUSTIFY, token).is_some()
                    || lookup(FLEX_WRAP, token).is_some()
                    || self.spacing_token(token, "gap-").is_some()
            }
            Shape::Container(Layout::Grid) => {
                token == "grid"
                    || token.strip_prefix("grid-cols-").is_some_and(is_count)
                    || token.strip_prefix("grid-rows-").is_some_and(is_count)
                    || self.spacing_token(token, "gap-").is_some()
            }
            Shape::Control(Control::Button) => BUTTON_ABSORBED.iter().any(|p| matches_pattern(p, token)),
            Shape::Control(Control::Input | Control::TextArea) => {
                FIELD_ABSORBED.iter().any(|p| matches_pattern(p, token))
            }
            Shape::Leaf => false,
        }
    }

    pub fn filter_absorbed(&self, tokens: &[String], shape: Shape) -> Absorption {
        let (absorbed, remaining): (Vec<String>, Vec<String>) =
            tokens.iter().cloned().partition(|t| self.absorbs(t, shape));
        Absorption { absorbed, remaining }
    }

    /// Guess a Button variant from its utility classes
    pub fn detect_button_variant(&self, tokens: &[String]) -> Option<ButtonVariant> {
        if tokens.iter().any(|t| t.contains("red-") || t.contains("danger") || t.contains("destructive")) {
            return Some(ButtonVariant::Danger);
        }

        let background = tokens.iter().find(|t| t.starts_with("bg-") && *t != "bg-transparent");
        let has_border = tokens.iter().any(|t| t == "border" || t.starts_with("border-"));

        match background {
            None if has_border => Some(ButtonVariant::Outline),
            None if tokens.iter().any(|t| t.starts_with("hover:bg-")) => Some(ButtonVariant::Ghost),
            None => None,
            Some(bg) if is_neutral_background(bg) => Some(ButtonVariant::Secondary),
            Some(_) => Some(ButtonVariant::Primary),
        }
    }
}

fn is_count(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_neutral_background(token: &str) -> bool {
    ["bg-white", "bg-gray-", "bg-slate-", "bg-zinc-", "bg-neutral-", "bg-stone-"]
        .iter()
        .any(|p| token.starts_with(p))
}
