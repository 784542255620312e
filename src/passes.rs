//! Replacement passes.
//!
//! Each pass rewrites one markup shape and reports how many occurrences it
//! committed. Passes run in the order of [`PIPELINE`]; later passes rely on
//! the shapes earlier ones produced.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::attributes::{class_attribute, parse_attributes};
use crate::classes::ClassMap;
use crate::debug::{DebugContext, DebugLevel};
use crate::scanner::{self, TagOccurrence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Flex,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Button,
    Input,
    TextArea,
}

/// What kind of element a pass rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Container(Layout),
    Control(Control),
    /// Plain rename with attributes copied as-is (labels)
    Leaf,
}

impl Shape {
    /// Native tag name this shape is found under
    pub fn source_tag(&self) -> &'static str {
        match self {
            Shape::Container(_) => "div",
            Shape::Control(Control::Button) => "button",
            Shape::Control(Control::Input) => "input",
            Shape::Control(Control::TextArea) => "textarea",
            Shape::Leaf => "label",
        }
    }

    /// Semantic component that replaces it
    pub fn component(&self) -> &'static str {
        match self {
            Shape::Container(Layout::Flex) => "Flex",
            Shape::Container(Layout::Grid) => "Grid",
            Shape::Control(Control::Button) => "Button",
            Shape::Control(Control::Input) => "Input",
            Shape::Control(Control::TextArea) => "TextArea",
            Shape::Leaf => "Label",
        }
    }

    /// Void elements never get a closing tag
    fn is_void(&self) -> bool {
        matches!(self, Shape::Control(Control::Input))
    }

    /// Semantic name for a native attribute, if this shape renames it
    fn rename_attribute(&self, name: &str) -> Option<&'static str> {
        match (self, name) {
            (Shape::Control(Control::Button), "onClick") => Some("onPress"),
            (Shape::Control(_), "disabled") => Some("isDisabled"),
            _ => None,
        }
    }

    /// Containers only qualify when their literal class list carries this exact token
    fn marker_class(&self) -> Option<&'static str> {
        match self {
            Shape::Container(Layout::Flex) => Some("flex"),
            Shape::Container(Layout::Grid) => Some("grid"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Structural(Shape),
    /// Re-run every remaining literal class attribute through the class map
    ClassStrings,
}

/// The fixed pass order
pub const PIPELINE: [Pass; 7] = [
    Pass::Structural(Shape::Container(Layout::Flex)),
    Pass::Structural(Shape::Container(Layout::Grid)),
    Pass::Structural(Shape::Control(Control::Button)),
    Pass::Structural(Shape::Control(Control::Input)),
    Pass::Structural(Shape::Control(Control::TextArea)),
    Pass::Structural(Shape::Leaf),
    Pass::ClassStrings,
];

/// Running class counts for the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassStats {
    pub mapped: usize,
    pub removed: usize,
    pub preserved: usize,
}

impl ClassStats {
    pub fn add(&mut self, other: ClassStats) {
        self.mapped += other.mapped;
        self.removed += other.removed;
        self.preserved += other.preserved;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub code: String,
    pub count: usize,
    pub classes: ClassStats,
}

impl Pass {
    /// Report category for occurrences this pass rewrote
    pub fn category(&self) -> &'static str {
        match self {
            Pass::Structural(Shape::Container(Layout::Flex)) => "flex-layout",
            Pass::Structural(Shape::Container(Layout::Grid)) => "grid-layout",
            Pass::Structural(Shape::Control(Control::Button)) => "button",
            Pass::Structural(Shape::Control(Control::Input)) => "input",
            Pass::Structural(Shape::Control(Control::TextArea)) => "textarea",
            Pass::Structural(Shape::Leaf) => "label",
            Pass::ClassStrings => "utility-classes",
        }
    }

    /// Component introduced when this pass commits anything
    pub fn component(&self) -> Option<&'static str> {
        match self {
            Pass::Structural(shape) => Some(shape.component()),
            Pass::ClassStrings => None,
        }
    }

    pub fn run(&self, code: &str, class_map: &ClassMap, debug: &DebugContext) -> PassOutcome {
        match self {
            Pass::Structural(shape) => rewrite_shape(code, *shape, class_map, debug),
            Pass::ClassStrings => rewrite_class_strings(code, class_map),
        }
    }
}

fn rewrite_shape(code: &str, shape: Shape, class_map: &ClassMap, debug: &DebugContext) -> PassOutcome {
    let tag = shape.source_tag();
    let occurrences = match shape.marker_class() {
        Some(marker) => scanner::find_occurrences_where(code, tag, |occ| {
            crate::attributes::class_tokens(&occ.attributes).iter().any(|t| t == marker)
        }),
        None => scanner::find_occurrences(code, tag),
    };

    let mut output = code.to_string();
    let mut count = 0;
    let mut classes = ClassStats::default();

    // Back to front: every splice lands above the offsets still to be processed
    for occurrence in occurrences.iter().rev() {
        let close = if occurrence.self_closing {
            None
        } else if shape.is_void() {
            // `<input></input>` collapses to one self-closing element
            if let Some(close) = scanner::find_matching_close(&output, occurrence.start_index, tag) {
                output.replace_range(occurrence.tag_end..close + tag.len() + 3, "");
            }
            None
        } else {
            match scanner::find_matching_close(&output, occurrence.start_index, tag) {
                Some(close) => Some(close),
                None => {
                    debug.log_at_offset(
                        DebugLevel::Warn,
                        format!("skipping <{}> without a matching </{}>", tag, tag),
                        &output,
                        occurrence.open_index(),
                    );
                    continue;
                }
            }
        };

        let (opening, stats) = build_opening(shape, occurrence, class_map);
        if let Some(close) = close {
            output.replace_range(close..close + tag.len() + 3, &format!("</{}>", shape.component()));
        }
        output.replace_range(occurrence.open_index()..occurrence.tag_end, &opening);
        classes.add(stats);
        count += 1;
    }

    PassOutcome { code: output, count, classes }
}

/// Render the replacement opening tag for one occurrence
fn build_opening(shape: Shape, occurrence: &TagOccurrence, class_map: &ClassMap) -> (String, ClassStats) {
    let component = shape.component();
    let mut stats = ClassStats::default();

    if shape == Shape::Leaf {
        let end = if occurrence.self_closing { "/>" } else { ">" };
        return (format!("<{}{}{}", component, occurrence.attributes, end), stats);
    }

    let attrs = parse_attributes(&occurrence.attributes);
    let tokens: Vec<String> = class_attribute(&attrs)
        .and_then(|a| a.string_value())
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let mut parts: Vec<String> = match shape {
        Shape::Container(Layout::Flex) => class_map.derive_flex_props(&tokens).into_props(),
        Shape::Container(Layout::Grid) => class_map.derive_grid_props(&tokens).into_props(),
        Shape::Control(Control::Button) => class_map
            .detect_button_variant(&tokens)
            .map(|variant| vec![("variant", variant.as_str().to_string())])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
    .into_iter()
    .map(|(name, value)| format!("{}=\"{}\"", name, value))
    .collect();

    let absorption = class_map.filter_absorbed(&tokens, shape);
    match shape {
        Shape::Container(_) => stats.mapped += absorption.absorbed.len(),
        _ => stats.removed += absorption.absorbed.len(),
    }

    for attr in &attrs {
        let is_literal_class = (attr.name == "className" || attr.name == "class") && attr.string_value().is_some();
        if is_literal_class {
            if !absorption.remaining.is_empty() {
                let quote = attr.quote();
                parts.push(format!("{}={}{}{}", attr.name, quote, absorption.remaining.join(" "), quote));
            }
        } else if let Some(renamed) = shape.rename_attribute(attr.name) {
            parts.push(attr.renamed(renamed));
        } else {
            parts.push(attr.raw.to_string());
        }
    }

    let mut tag = format!("<{}", component);
    for part in &parts {
        tag.push(' ');
        tag.push_str(part);
    }
    if occurrence.self_closing || shape.is_void() {
        tag.push_str(" />");
    } else {
        tag.push('>');
    }
    (tag, stats)
}

static CLASS_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\s+)(className|class)=(?:"([^"]*)"|'([^']*)')"#).expect("class attribute regex")
});

/// Residual sweep over literal class attributes. Matches anywhere in the
/// text, so markup quoted inside JS strings or JSX comments is swept too.
fn rewrite_class_strings(code: &str, class_map: &ClassMap) -> PassOutcome {
    let mut count = 0;
    let mut classes = ClassStats::default();

    let output = CLASS_ATTR.replace_all(code, |caps: &Captures| {
        let (quote, value) = match (caps.get(3), caps.get(4)) {
            (Some(double), _) => ('"', double.as_str()),
            (None, Some(single)) => ('\'', single.as_str()),
            (None, None) => ('"', ""),
        };
        let result = class_map.classify(value);
        classes.mapped += result.mapped_classes.len();
        classes.removed += result.removed_classes.len();
        classes.preserved += result.preserved_classes.len();
        if !result.mapped_classes.is_empty() || !result.removed_classes.is_empty() {
            count += 1;
        }

        if result.transformed_classes.is_empty() {
            String::new()
        } else {
            format!("{}{}={}{}{}", &caps[1], &caps[2], quote, result.transformed_classes, quote)
        }
    });

    PassOutcome { code: output.into_owned(), count, classes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(pass: Pass, code: &str) -> PassOutcome {
        pass.run(code, &ClassMap::default(), &DebugContext::default())
    }

    const FLEX: Pass = Pass::Structural(Shape::Container(Layout::Flex));
    const GRID: Pass = Pass::Structural(Shape::Container(Layout::Grid));
    const BUTTON: Pass = Pass::Structural(Shape::Control(Control::Button));
    const INPUT: Pass = Pass::Structural(Shape::Control(Control::Input));
    const TEXTAREA: Pass = Pass::Structural(Shape::Control(Control::TextArea));
    const LABEL: Pass = Pass::Structural(Shape::Leaf);

    #[test]
    fn test_pipeline_order_is_fixed() {
        let categories: Vec<_> = PIPELINE.iter().map(Pass::category).collect();
        assert_eq!(categories, vec!["flex-layout", "grid-layout", "button", "input", "textarea", "label", "utility-classes"]);
    }

    #[test]
    fn test_flex_wraps_outer_and_leaves_inner_div() {
        let out = run(FLEX, r#"<div className="flex"><div>inner</div></div>"#);
        assert_eq!(out.code, "<Flex><div>inner</div></Flex>");
        assert_eq!(out.count, 1);
        assert_eq!(out.classes.mapped, 1);
    }

    #[test]
    fn test_flex_token_must_be_exact() {
        let src = r#"<div className="inline-flex flex-col">x</div>"#;
        let out = run(FLEX, src);
        assert_eq!(out.code, src);
        assert_eq!(out.count, 0);
    }

    #[test]
    fn test_nested_flex_containers() {
        let src = r#"<div className="flex flex-col gap-4"><div className="flex items-center p-2"><span/></div><div>x</div></div>"#;
        let out = run(FLEX, src);
        assert_eq!(
            out.code,
            r#"<Flex direction="column" gap="md"><Flex align="center" className="p-2"><span/></Flex><div>x</div></Flex>"#
        );
        assert_eq!(out.count, 2);
    }

    #[test]
    fn test_unmatched_container_is_left_alone() {
        let src = r#"<div className="flex"><span>open"#;
        let out = run(FLEX, src);
        assert_eq!(out.code, src);
        assert_eq!(out.count, 0);
    }

    #[test]
    fn test_self_closing_container() {
        let out = run(GRID, r#"<div className="grid grid-cols-2" />"#);
        assert_eq!(out.code, r#"<Grid columns="2" />"#);
    }

    #[test]
    fn test_unknown_attributes_survive_verbatim() {
        let out = run(FLEX, r#"<div data-testid="row" className="flex p-4" {...rest} style={{ color: "red" }}>x</div>"#);
        assert_eq!(
            out.code,
            r#"<Flex data-testid="row" className="p-4" {...rest} style={{ color: "red" }}>x</Flex>"#
        );
    }

    #[test]
    fn test_button_translation() {
        let out = run(BUTTON, r#"<button className="bg-red-600 text-white px-4 w-full" onClick={() => remove(id)} disabled={busy}>Delete</button>"#);
        assert_eq!(
            out.code,
            r#"<Button variant="danger" className="w-full" onPress={() => remove(id)} isDisabled={busy}>Delete</Button>"#
        );
        assert_eq!(out.classes.removed, 3);
    }

    #[test]
    fn test_input_is_always_self_closing() {
        let out = run(INPUT, r#"<input type="email" className="border rounded px-3 w-full" disabled><p>after</p>"#);
        assert_eq!(out.code, r#"<Input type="email" className="w-full" isDisabled /><p>after</p>"#);
        assert_eq!(out.count, 1);
    }

    #[test]
    fn test_textarea_keeps_body() {
        let out = run(TEXTAREA, r#"<textarea rows={4} className="border">Hi</textarea>"#);
        assert_eq!(out.code, "<TextArea rows={4}>Hi</TextArea>");
    }

    #[test]
    fn test_label_is_plain_rename() {
        let out = run(LABEL, "<label htmlFor=\"email\"\n  className=\"text-sm\">Email</label>");
        assert_eq!(out.code, "<Label htmlFor=\"email\"\n  className=\"text-sm\">Email</Label>");
    }

    #[test]
    fn test_class_sweep_collapses_empty_attributes() {
        let out = run(Pass::ClassStrings, r#"<p className="transition focus:ring-2">a</p><p className='bg-white p-2'>b</p><p className={cx("bg-white")}>c</p>"#);
        assert_eq!(
            out.code,
            r#"<p>a</p><p className='bg-background p-2'>b</p><p className={cx("bg-white")}>c</p>"#
        );
        assert_eq!(out.count, 2);
        assert_eq!(out.classes, ClassStats { mapped: 1, removed: 2, preserved: 1 });
    }

    #[test]
    fn test_sweep_reaches_markup_inside_strings() {
        let out = run(Pass::ClassStrings, r#"const html = '<p className="bg-white">';"#);
        assert_eq!(out.code, r#"const html = '<p className="bg-background">';"#);
    }
}
