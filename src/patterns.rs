//! Advisory pattern suggestions.
//!
//! Independent of the rewriting passes: nothing here can change the
//! transformed code, and catalog failures only cost suggestions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::debug::DebugContext;

static BUILTIN_PATTERNS: &str = include_str!("../data/patterns.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub components: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read pattern catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pattern catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pattern catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only source of UI composition patterns
pub trait PatternCatalog {
    fn all_patterns(&self) -> Result<Vec<Pattern>, CatalogError>;

    /// Keyword search; the default scores every pattern from [`all_patterns`](Self::all_patterns)
    fn search_patterns(&self, query: &str) -> Result<Vec<Pattern>, CatalogError> {
        Ok(search(&self.all_patterns()?, query))
    }
}

/// The catalog shipped with the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl PatternCatalog for BuiltinCatalog {
    fn all_patterns(&self) -> Result<Vec<Pattern>, CatalogError> {
        Ok(serde_json::from_str(BUILTIN_PATTERNS)?)
    }
}

/// Catalog loaded from a JSON array of patterns
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    patterns: Vec<Pattern>,
}

impl JsonCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(Self { patterns: serde_json::from_str(json)? })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl PatternCatalog for JsonCatalog {
    fn all_patterns(&self) -> Result<Vec<Pattern>, CatalogError> {
        Ok(self.patterns.clone())
    }
}

fn stem(word: &str) -> &str {
    word.strip_suffix('s').filter(|w| w.len() >= 3).unwrap_or(word)
}

const STOPWORDS: &[&str] = &["the", "and", "with", "for", "page", "that", "this", "from", "into", "some", "our", "your"];

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(&w.to_lowercase().as_str()))
        .map(|w| stem(&w.to_lowercase()).to_string())
        .collect()
}

/// Score patterns against free text; best matches first, non-matches dropped
pub fn search(patterns: &[Pattern], query: &str) -> Vec<Pattern> {
    let query_words = words(query);
    if query_words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &Pattern)> = patterns
        .iter()
        .map(|pattern| {
            let tags: Vec<String> = pattern.tags.iter().flat_map(|t| words(t)).collect();
            let id_words = words(&pattern.id);
            let prose = words(&format!("{} {} {}", pattern.name, pattern.description, pattern.category));
            let score = query_words
                .iter()
                .map(|w| {
                    let mut s: usize = 0;
                    if id_words.contains(w) {
                        s += 3;
                    }
                    if tags.contains(w) {
                        s += 2;
                    }
                    if prose.contains(w) {
                        s += 1;
                    }
                    s
                })
                .sum::<usize>();
            (score, pattern)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
    scored.into_iter().map(|(_, p)| p.clone()).collect()
}

static HERO_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bhero\b|get started|call to action|\bcta\b|sign up (?:now|today|free)").expect("hero regex")
});
static FEATURE_SIGNAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfeatures?\b").expect("feature regex"));
static GRID_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"class(?:Name)?=["'][^"']*\bgrid\b|<Grid\b"#).expect("grid regex")
});
static FORM_SIGNAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"<form\b|\bonSubmit\b").expect("form regex"));
static INPUT_SIGNAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(?:input|Input|textarea|TextArea)\b").expect("input regex"));
static BUTTON_SIGNAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(?:button|Button)\b").expect("button regex"));
static PRICING_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bpricing\b|per month|/\s*mo(?:nth)?\b|\bbilled (?:monthly|annually)\b|\$\d+").expect("pricing regex")
});
static NAV_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<nav\b|<header\b|(?i)\bnavbar\b").expect("nav regex")
});

fn hero_detected(original: &str, _transformed: &str) -> bool {
    HERO_SIGNAL.is_match(original)
}

fn feature_grid_detected(original: &str, transformed: &str) -> bool {
    FEATURE_SIGNAL.is_match(original) && (GRID_SIGNAL.is_match(original) || GRID_SIGNAL.is_match(transformed))
}

fn form_detected(original: &str, transformed: &str) -> bool {
    let either = |re: &Regex| re.is_match(original) || re.is_match(transformed);
    FORM_SIGNAL.is_match(original) && either(&INPUT_SIGNAL) && either(&BUTTON_SIGNAL)
}

fn pricing_detected(original: &str, _transformed: &str) -> bool {
    PRICING_SIGNAL.is_match(original)
}

fn nav_detected(original: &str, _transformed: &str) -> bool {
    NAV_SIGNAL.is_match(original)
}

struct Heuristic {
    pattern_id: &'static str,
    detected: fn(&str, &str) -> bool,
}

const HEURISTICS: &[Heuristic] = &[
    Heuristic { pattern_id: "hero-section", detected: hero_detected },
    Heuristic { pattern_id: "feature-grid", detected: feature_grid_detected },
    Heuristic { pattern_id: "contact-form", detected: form_detected },
    Heuristic { pattern_id: "pricing-table", detected: pricing_detected },
    Heuristic { pattern_id: "navbar", detected: nav_detected },
];

/// Non-binding suggestions plus the ids they refer to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    pub messages: Vec<String>,
    pub pattern_ids: Vec<String>,
}

impl Suggestions {
    fn push(&mut self, pattern: &Pattern, message: String) {
        if self.pattern_ids.contains(&pattern.id) {
            return;
        }
        self.pattern_ids.push(pattern.id.clone());
        self.messages.push(message);
    }
}

/// Match the document (and an optional free-text hint) against the catalog.
pub fn suggest_patterns(
    original: &str,
    transformed: &str,
    catalog: &dyn PatternCatalog,
    context_hint: Option<&str>,
    debug: &DebugContext,
) -> Suggestions {
    let mut suggestions = Suggestions::default();

    let patterns = match catalog.all_patterns() {
        Ok(patterns) => patterns,
        Err(e) => {
            debug.warn(format!("pattern suggestions skipped: {}", e));
            return suggestions;
        }
    };

    for heuristic in HEURISTICS {
        if !(heuristic.detected)(original, transformed) {
            continue;
        }
        match patterns.iter().find(|p| p.id == heuristic.pattern_id) {
            Some(pattern) => {
                debug.trace(format!("pattern heuristic matched: {}", pattern.id));
                suggestions.push(
                    pattern,
                    format!(
                        "This looks like a {}: consider the '{}' pattern ({})",
                        pattern.name,
                        pattern.id,
                        pattern.components.join(", ")
                    ),
                );
            }
            None => debug.trace(format!("pattern '{}' not in catalog", heuristic.pattern_id)),
        }
    }

    if let Some(hint) = context_hint.map(str::trim).filter(|h| !h.is_empty()) {
        match catalog.search_patterns(hint) {
            Ok(hits) => {
                for pattern in hits {
                    let message = format!(
                        "'{}' matches \"{}\": the '{}' pattern composes {}",
                        pattern.name,
                        hint,
                        pattern.id,
                        pattern.components.join(", ")
                    );
                    suggestions.push(&pattern, message);
                }
            }
            Err(e) => debug.warn(format!("pattern search failed: {}", e)),
        }
    }

    suggestions
}
