//! Orchestrates one migration: pipeline, imports, validation, suggestions.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

use crate::debug::{DebugContext, DebugLevel};
use crate::imports::consolidate_imports;
use crate::passes::{ClassStats, PIPELINE};
use crate::patterns::{suggest_patterns, PatternCatalog};
use crate::scanner;
use crate::{Analysis, TransformOptions, TransformResult};

static DYNAMIC_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bclass(?:Name)?=\{").expect("dynamic class regex"));

static DARK_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[\s"'`])dark:[^\s"'`]+"#).expect("dark class regex")
});

static STYLING_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*import\s[^;]*?['"](styled-components|@emotion/[\w-]+|@stitches/[\w-]+|[^'"]+\.module\.(?:css|scss|sass|less))['"]"#)
        .expect("styling import regex")
});

pub(crate) fn load_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Human name of a competing styling system, from its import source
fn styling_system(source: &str) -> &'static str {
    if source == "styled-components" {
        "styled-components"
    } else if source.starts_with("@emotion/") {
        "Emotion"
    } else if source.starts_with("@stitches/") {
        "Stitches"
    } else {
        "CSS Modules"
    }
}

fn styling_warnings(source: &str) -> Vec<String> {
    let systems: BTreeSet<&'static str> = STYLING_IMPORT
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).map(|m| styling_system(m.as_str())))
        .collect();
    systems
        .into_iter()
        .map(|system| {
            format!(
                "Detected {} styling; styles defined there were left as-is and may conflict with UI Lab components",
                system
            )
        })
        .collect()
}

fn validation_warnings(original: &str, transformed: &str, added: &[String], options: &TransformOptions) -> Vec<String> {
    let mut warnings = Vec::new();

    let dynamic = DYNAMIC_CLASS.find_iter(original).count();
    if dynamic > 0 {
        warnings.push(format!(
            "{} dynamic className expression(s) were left unchanged; migrate them manually",
            dynamic
        ));
    }

    let leftover_buttons = scanner::find_occurrences(transformed, "button").len();
    if leftover_buttons > 0 && added.iter().any(|c| c == "Button") {
        warnings.push(format!(
            "{} native <button> element(s) remain, possibly inside dynamic expressions; review them manually",
            leftover_buttons
        ));
    }

    let dark = DARK_CLASS.find_iter(transformed).count();
    if dark > 0 {
        warnings.push(format!(
            "Found {} dark: class(es); UI Lab components handle dark mode through theme tokens, so these can likely be removed",
            dark
        ));
    }

    let lines = original.lines().count();
    if lines > options.large_file_lines {
        warnings.push(format!("Large file ({} lines); review the transformation manually", lines));
    }

    warnings
}

/// Transform already-loaded source text. Pure with respect to its inputs.
pub(crate) fn run(
    source: &str,
    file_path: &str,
    context_hint: Option<&str>,
    options: &TransformOptions,
    catalog: &dyn PatternCatalog,
) -> TransformResult {
    let debug = DebugContext::new(options.debug_level);
    debug.info(format!("Transforming {} ({} bytes)", file_path, source.len()));

    let mut code = source.to_string();
    let mut classes = ClassStats::default();
    let mut identified = Vec::new();
    let mut added = BTreeSet::new();

    for pass in PIPELINE.iter() {
        let outcome = pass.run(&code, &options.class_map, &debug);
        debug.trace(format!("pass {}: {} rewritten", pass.category(), outcome.count));
        classes.add(outcome.classes);
        if outcome.count > 0 {
            if let Some(component) = pass.component() {
                identified.push(format!("{} ({})", pass.category(), outcome.count));
                added.insert(component.to_string());
            }
        }
        code = outcome.code;
    }

    let added: Vec<String> = added.into_iter().collect();
    if !added.is_empty() {
        debug.trace(format!("importing {} from {}", added.join(", "), options.component_package));
        code = consolidate_imports(&code, &options.component_package, &added);
    }

    let mut warnings = styling_warnings(source);
    warnings.extend(validation_warnings(source, &code, &added, options));
    for warning in &warnings {
        debug.warn(warning.clone());
    }

    let suggestions = suggest_patterns(source, &code, catalog, context_hint, &debug);
    debug.info(format!(
        "Done: {} component(s) added, {} suggestion(s), {} warning(s)",
        added.len(),
        suggestions.messages.len(),
        warnings.len()
    ));

    TransformResult {
        success: true,
        original_code: source.to_string(),
        transformed_code: code,
        analysis: Analysis {
            components_identified: identified,
            tailwind_classes_mapped: classes.mapped,
            tailwind_classes_removed: classes.removed,
            ui_lab_components_added: added,
            custom_styles_preserved: classes.preserved,
            patterns_suggested: suggestions.pattern_ids,
        },
        suggestions: suggestions.messages,
        warnings,
        logs: if debug.level() > DebugLevel::Off { debug.get_logs() } else { Vec::new() },
    }
}
