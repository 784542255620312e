//! Import consolidation for newly introduced components.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Any static import declaration, including multi-line named imports and side-effect imports
static IMPORT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(?:[^;'"]*?\s*from\s*)?['"][^'"\n]+['"][ \t]*;?"#).expect("import regex")
});

/// A leading `"use client"` style directive
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A(?:\s*(?://[^\n]*)?\n)*\s*['"]use (?:client|server|strict)['"][ \t]*;?[ \t]*\n?"#).expect("directive regex")
});

fn named_import_regex(package: &str) -> Regex {
    let pattern = format!(
        r#"import(?:\s+([\w$]+)\s*,)?\s*\{{([^}}]*)\}}\s*from\s*(['"]){}['"][ \t]*;?"#,
        regex::escape(package)
    );
    Regex::new(&pattern).expect("escaped package pattern is valid")
}

fn render(default: Option<&str>, names: &BTreeSet<String>, package: &str, quote: &str) -> String {
    let list = names.iter().cloned().collect::<Vec<_>>().join(", ");
    let default = default.map(|d| format!("{}, ", d)).unwrap_or_default();
    format!("import {}{{ {} }} from {}{}{};", default, list, quote, package, quote)
}

/// Make every name in `components` importable from `package` through a single declaration.
///
/// An existing named import from `package` is merged (deduplicated, sorted)
/// in place; otherwise a new declaration goes after the last import, or at
/// the top of the file when there are none.
pub fn consolidate_imports<S: AsRef<str>>(code: &str, package: &str, components: &[S]) -> String {
    if components.is_empty() {
        return code.to_string();
    }
    let mut names: BTreeSet<String> = components.iter().map(|c| c.as_ref().to_string()).collect();

    let existing = named_import_regex(package);
    if let Some(caps) = existing.captures(code) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        for name in caps[2].split(',') {
            let name = name.trim();
            if !name.is_empty() {
                names.insert(name.to_string());
            }
        }
        let mut output = code.to_string();
        let default = caps.get(1).map(|m| m.as_str());
        output.replace_range(whole, &render(default, &names, package, &caps[3]));
        return output;
    }

    let declaration = render(None, &names, package, "\"");
    if let Some(last) = IMPORT_DECL.find_iter(code).last() {
        let mut output = code.to_string();
        output.insert_str(last.end(), &format!("\n{}", declaration));
        return output;
    }

    let insert_at = DIRECTIVE.find(code).map(|m| m.end()).unwrap_or(0);
    let mut output = code.to_string();
    let separator = if insert_at > 0 && !code[..insert_at].ends_with('\n') { "\n" } else { "" };
    output.insert_str(insert_at, &format!("{}{}\n", separator, declaration));
    output
}
