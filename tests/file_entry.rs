use std::fs;
use tempfile::TempDir;
use ui_lab_migrate::{
    transform, transform_with, CatalogError, ClassMap, DebugLevel, JsonCatalog, Pattern, PatternCatalog,
    TransformOptions,
};

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn missing_file_is_reported_not_thrown() {
    let result = transform("/no/such/dir/Page.tsx", None);
    assert!(!result.success);
    assert_eq!(result.warnings, vec!["File not found: /no/such/dir/Page.tsx"]);
}

#[test]
fn vue_file_names_the_ecosystem() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "App.vue", "<template><div class=\"flex\"></div></template>");
    let result = transform(&path, None);
    assert!(!result.success);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Vue files are not supported"));
}

#[test]
fn other_extensions_get_generic_warning() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "page.html", "<div class=\"flex\"></div>");
    let result = transform(&path, None);
    assert!(!result.success);
    assert!(result.warnings[0].starts_with("Unsupported file type: .html"));
}

#[test]
fn reads_and_transforms_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "Hero.jsx",
        "export const Hero = () => (\n  <div className=\"flex flex-col items-center\">\n    <h1>Get started today</h1>\n    <button className=\"bg-indigo-600 text-white\">Sign up</button>\n  </div>\n);\n",
    );
    let result = transform(&path, None);
    assert!(result.success);
    assert!(result.transformed_code.contains("<Flex direction=\"column\" align=\"center\">"));
    assert!(result.transformed_code.contains("<Button variant=\"primary\">Sign up</Button>"));
    assert_eq!(result.analysis.patterns_suggested, vec!["hero-section"]);
    // The file itself is left untouched
    assert!(fs::read_to_string(&path).unwrap().contains("<div className"));
}

#[test]
fn file_backed_class_map_and_catalog() {
    let dir = TempDir::new().unwrap();
    let map_path = write(&dir, "classes.json", r#"{ "spacing": { "4": "medium" }, "rewrites": { "text-slate-500": "text-subtle" } }"#);
    let catalog_path = write(
        &dir,
        "patterns.json",
        r#"[{ "id": "toolbar", "name": "Toolbar", "category": "application", "components": ["Flex", "Button"], "tags": ["toolbar", "actions"] }]"#,
    );
    let source = write(&dir, "Bar.tsx", r#"<div className="flex gap-4 text-slate-500"><button>Go</button></div>"#);

    let options = TransformOptions {
        class_map: ClassMap::from_path(&map_path).unwrap(),
        debug_level: DebugLevel::Trace,
        ..Default::default()
    };
    let catalog = JsonCatalog::from_path(&catalog_path).unwrap();
    let result = transform_with(&source, Some("toolbar actions"), &options, &catalog);

    assert!(result.transformed_code.contains(r#"<Flex gap="medium" className="text-subtle">"#));
    assert_eq!(result.analysis.patterns_suggested, vec!["toolbar"]);
    assert!(!result.logs.is_empty());
}

struct OfflineCatalog;

impl PatternCatalog for OfflineCatalog {
    fn all_patterns(&self) -> Result<Vec<Pattern>, CatalogError> {
        Err(CatalogError::Unavailable("connection refused".to_string()))
    }
}

#[test]
fn unreachable_catalog_never_blocks_the_rewrite() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "Nav.tsx", "<nav><label>Menu</label></nav>");
    let result = transform_with(&path, Some("navbar"), &TransformOptions::default(), &OfflineCatalog);
    assert!(result.success);
    assert!(result.transformed_code.contains("<Label>Menu</Label>"));
    assert!(result.suggestions.is_empty());
    assert!(result.analysis.patterns_suggested.is_empty());
}

#[test]
fn bad_catalog_file_is_a_typed_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", "{");
    assert!(matches!(JsonCatalog::from_path(&path), Err(CatalogError::Parse(_))));
    assert!(matches!(JsonCatalog::from_path(dir.path().join("absent.json")), Err(CatalogError::Io { .. })));
}
