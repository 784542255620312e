use super::*;
use std::ffi::{CStr, CString, c_char};
use std::ptr;

unsafe fn optional_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s).to_str().ok() }
}

fn into_c_json(result: &TransformResult) -> *mut c_char {
    match result.to_json().ok().and_then(|json| CString::new(json).ok()) {
        Some(c_str) => c_str.into_raw(),
        None => ptr::null_mut(),
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn ui_lab_migrate_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

/// Migrate the file at `path`; returns the JSON report. `context_hint` may be null.
///
/// # Safety
/// `path` and a non-null `context_hint` must be valid NUL-terminated strings.
/// The returned string must be released with [`ui_lab_migrate_free_string`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ui_lab_migrate_file(path: *const c_char, context_hint: *const c_char) -> *mut c_char {
    let Some(path) = (unsafe { optional_str(path) }) else {
        return ptr::null_mut();
    };
    let hint = unsafe { optional_str(context_hint) };
    into_c_json(&transform(path, hint))
}

/// Migrate in-memory `source`; `filename` decides the source kind.
///
/// # Safety
/// Same contract as [`ui_lab_migrate_file`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ui_lab_migrate_source(
    source: *const c_char,
    filename: *const c_char,
    context_hint: *const c_char,
) -> *mut c_char {
    let (Some(source), Some(filename)) = (unsafe { optional_str(source) }, unsafe { optional_str(filename) }) else {
        return ptr::null_mut();
    };
    let hint = unsafe { optional_str(context_hint) };
    let result = transform_source(source, filename, hint, &TransformOptions::default(), &BuiltinCatalog);
    into_c_json(&result)
}

/// # Safety
/// `s` must come from this library and not have been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ui_lab_migrate_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe { drop(CString::from_raw(s)) };
    }
}
