mod attributes;
mod imports;
mod scanner;
mod transformer;
pub mod classes;
pub mod debug;
pub mod passes;
pub mod patterns;

use serde::Serialize;
use std::path::Path;

pub use classes::{ClassMap, ClassMapError, ClassTransformResult};
pub use debug::{DebugContext, DebugEntry, DebugLevel};
pub use imports::consolidate_imports;
pub use patterns::{BuiltinCatalog, CatalogError, JsonCatalog, Pattern, PatternCatalog};
pub use scanner::{
    extract_attributes, find_matching_close, find_occurrences, find_occurrences_where, find_tag_end, TagBounds,
    TagOccurrence,
};

/// Import source used for semantic components unless overridden
pub const DEFAULT_COMPONENT_PACKAGE: &str = "@ui-lab/core";

/// Kind of source file, decided by extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Tsx,
    Jsx,
    TypeScript,
    JavaScript,
    /// Vue single-file components
    Vue,
    Svelte,
    Unsupported(String),
}

impl SourceKind {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "tsx" => Self::Tsx,
            "jsx" => Self::Jsx,
            "ts" => Self::TypeScript,
            "js" => Self::JavaScript,
            "vue" => Self::Vue,
            "svelte" => Self::Svelte,
            _ => Self::Unsupported(ext),
        }
    }

    /// Why this kind can't be migrated, or `None` if it can
    pub fn unsupported_reason(&self) -> Option<String> {
        let ecosystem = match self {
            Self::Vue => "Vue",
            Self::Svelte => "Svelte",
            Self::Unsupported(ext) if ext.is_empty() => {
                return Some("Unsupported file type: no extension. Supported extensions: .tsx, .jsx, .ts, .js".to_string());
            }
            Self::Unsupported(ext) => {
                return Some(format!("Unsupported file type: .{}. Supported extensions: .tsx, .jsx, .ts, .js", ext));
            }
            Self::Tsx | Self::Jsx | Self::TypeScript | Self::JavaScript => return None,
        };
        Some(format!(
            "{} files are not supported yet. UI Lab migration currently handles React files (.tsx, .jsx, .ts, .js)",
            ecosystem
        ))
    }
}

/// Migration settings
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Package new components are imported from
    pub component_package: String,
    pub class_map: ClassMap,
    /// Files with more lines than this get a manual-review warning
    pub large_file_lines: usize,
    pub debug_level: DebugLevel,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            component_package: DEFAULT_COMPONENT_PACKAGE.to_string(),
            class_map: ClassMap::default(),
            large_file_lines: 500,
            debug_level: DebugLevel::default(),
        }
    }
}

/// What a migration found and changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Shape categories rewritten, with counts, e.g. `"flex-layout (2)"`
    pub components_identified: Vec<String>,
    pub tailwind_classes_mapped: usize,
    pub tailwind_classes_removed: usize,
    /// Sorted, deduplicated component names introduced into the file
    pub ui_lab_components_added: Vec<String>,
    pub custom_styles_preserved: usize,
    pub patterns_suggested: Vec<String>,
}

/// Report returned for every invocation; failures are data, never panics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub success: bool,
    pub original_code: String,
    pub transformed_code: String,
    pub analysis: Analysis,
    pub suggestions: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<DebugEntry>,
}

impl TransformResult {
    fn failure(original_code: String, warning: String) -> Self {
        Self {
            success: false,
            original_code,
            warnings: vec![warning],
            ..Default::default()
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Returns the crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Migrate a file with default options and the built-in pattern catalog
pub fn transform(file_path: impl AsRef<Path>, context_hint: Option<&str>) -> TransformResult {
    transform_with(file_path, context_hint, &TransformOptions::default(), &BuiltinCatalog)
}

/// Migrate a file on disk
pub fn transform_with(
    file_path: impl AsRef<Path>,
    context_hint: Option<&str>,
    options: &TransformOptions,
    catalog: &dyn PatternCatalog,
) -> TransformResult {
    let path = file_path.as_ref();
    if !path.exists() {
        return TransformResult::failure(String::new(), format!("File not found: {}", path.display()));
    }
    if let Some(reason) = SourceKind::from_path(path).unsupported_reason() {
        return TransformResult::failure(String::new(), reason);
    }

    match transformer::load_source(path) {
        Ok(source) => transformer::run(&source, &path.display().to_string(), context_hint, options, catalog),
        Err(e) => TransformResult::failure(String::new(), format!("{:#}", e)),
    }
}

/// Migrate source text that the caller already loaded; `file_path` only decides the source kind
pub fn transform_source(
    source: &str,
    file_path: impl AsRef<Path>,
    context_hint: Option<&str>,
    options: &TransformOptions,
    catalog: &dyn PatternCatalog,
) -> TransformResult {
    let path = file_path.as_ref();
    if let Some(reason) = SourceKind::from_path(path).unsupported_reason() {
        return TransformResult::failure(source.to_string(), reason);
    }
    transformer::run(source, &path.display().to_string(), context_hint, options, catalog)
}

// WASM bindings (feature = "wasm")
#[cfg(feature = "wasm")]
mod wasm_api;

mod ffi;
pub use ffi::*;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn migrate(source: &str) -> TransformResult {
        transform_source(source, "Page.tsx", None, &TransformOptions::default(), &BuiltinCatalog)
    }

    #[test]
    fn test_source_kinds() {
        assert_eq!(SourceKind::from_path("a/B.TSX"), SourceKind::Tsx);
        assert_eq!(SourceKind::from_path("b.js"), SourceKind::JavaScript);
        assert_eq!(SourceKind::from_path("e.jsx").unsupported_reason(), None);
        assert!(SourceKind::from_path("c.svelte").unsupported_reason().unwrap().starts_with("Svelte files"));
        assert_eq!(
            SourceKind::from_path("d.html").unsupported_reason().unwrap(),
            "Unsupported file type: .html. Supported extensions: .tsx, .jsx, .ts, .js"
        );
        assert!(SourceKind::from_path("Makefile").unsupported_reason().unwrap().contains("no extension"));
    }

    #[test]
    fn test_vue_source_is_rejected() {
        let result = transform_source("<template/>", "App.vue", None, &TransformOptions::default(), &BuiltinCatalog);
        assert!(!result.success);
        assert!(result.warnings[0].contains("Vue"));
        assert_eq!(result.transformed_code, "");
    }

    #[test]
    fn test_form_migration_end_to_end() {
        let source = r#"import React from 'react';

export function Contact() {
  return (
    <form onSubmit={send} className="flex flex-col gap-2">
      <label htmlFor="email">Email</label>
      <input id="email" className="border rounded px-3 py-2 w-full" />
      <textarea className="border rounded p-2" rows={3}></textarea>
      <button type="submit" className="bg-blue-600 text-white px-4 py-2 rounded">Send</button>
    </form>
  );
}
"#;
        let result = migrate(source);
        assert!(result.success);
        assert_eq!(
            result.transformed_code,
            r#"import React from 'react';
import { Button, Input, Label, TextArea } from "@ui-lab/core";

export function Contact() {
  return (
    <form onSubmit={send} className="flex flex-col gap-2">
      <Label htmlFor="email">Email</Label>
      <Input id="email" className="w-full" />
      <TextArea rows={3}></TextArea>
      <Button variant="primary" type="submit">Send</Button>
    </form>
  );
}
"#
        );
        assert_eq!(result.analysis.patterns_suggested, vec!["contact-form"]);
        assert_eq!(result.analysis.tailwind_classes_removed, 12);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let first = migrate(r#"<div className="grid grid-cols-2 gap-6"><button className="border">A</button><input disabled /></div>"#);
        let second = migrate(&first.transformed_code);
        assert!(second.analysis.ui_lab_components_added.is_empty());
        assert_eq!(second.transformed_code, first.transformed_code);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = migrate("<div className=\"flex\">x</div>").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["analysis"]["uiLabComponentsAdded"][0], "Flex");
        assert!(value["transformedCode"].as_str().unwrap().contains("<Flex>x</Flex>"));
        assert!(value.get("logs").is_none() || cfg!(feature = "debug"));
    }
}
