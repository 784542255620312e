use super::*;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

/// Migrate a source string; the filename decides whether it is supported.
#[wasm_bindgen]
pub fn transform_source_js(source: &str, filename: &str, context_hint: Option<String>) -> JsValue {
    let result = transform_source(
        source,
        filename,
        context_hint.as_deref(),
        &TransformOptions::default(),
        &BuiltinCatalog,
    );
    to_value(&result)
        .unwrap_or_else(|err| JsValue::from_str(&format!("serde-wasm-bindgen error: {err}")))
}

/// Same as `transform_source_js` with a class map supplied as JSON.
#[wasm_bindgen]
pub fn transform_source_with_class_map(source: &str, filename: &str, class_map_json: &str) -> JsValue {
    let class_map = match ClassMap::from_json(class_map_json) {
        Ok(map) => map,
        Err(err) => return JsValue::from_str(&format!("invalid class map: {err}")),
    };
    let options = TransformOptions { class_map, ..Default::default() };
    let result = transform_source(source, filename, None, &options, &BuiltinCatalog);
    to_value(&result)
        .unwrap_or_else(|err| JsValue::from_str(&format!("serde-wasm-bindgen error: {err}")))
}

#[wasm_bindgen]
pub fn get_version() -> String {
    version().to_string()
}
