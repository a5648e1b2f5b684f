//! FFI layer for UI integration
//!
//! Provides C-compatible functions for hosts that render grading results.
//! Uses opaque pointers and C strings; results come back as JSON.

// FFI functions necessarily work with raw pointers - this is expected behavior
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use tracing::error;

use crate::config::GraderConfig;
use crate::error::Result;
use crate::grader::{Reference, grade};
use crate::report::Grade;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Opaque handle to a prepared reference text
pub struct ReferenceHandle {
    reference: Reference,
}

fn set_last_error(message: impl Into<String>) {
    let message = message.into();
    error!("{}", message);
    LAST_ERROR.with(|last| *last.borrow_mut() = Some(message));
}

fn clear_last_error() {
    LAST_ERROR.with(|last| *last.borrow_mut() = None);
}

fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        set_last_error("null string argument");
        return None;
    }
    match unsafe { CStr::from_ptr(s) }.to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            set_last_error("string argument is not valid UTF-8");
            None
        }
    }
}

fn into_c_string(text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn grade_to_json(result: Result<Grade>) -> *mut c_char {
    match result.and_then(|grade| grade.to_json()) {
        Ok(json) => {
            clear_last_error();
            into_c_string(json)
        }
        Err(e) => {
            set_last_error(e.to_string());
            ptr::null_mut()
        }
    }
}

// ============ One-shot Grading ============

/// Grade an attempt against a reference text
/// Returns JSON (caller must free with dictation_free_string), or null on error
/// JSON format:
/// {
///   "stats": {"errors": 1, "correct": 3, "perfect_score": 4, "score": "75.00", "accuracy": "75.00"},
///   "entries": [{"type": "match", ...}, {"type": "error", "kind": "incorrect", ...}],
///   "diff": "..."
/// }
#[unsafe(no_mangle)]
pub extern "C" fn dictation_grade(reference: *const c_char, attempt: *const c_char) -> *mut c_char {
    let (Some(reference), Some(attempt)) = (read_str(reference), read_str(attempt)) else {
        return ptr::null_mut();
    };
    grade_to_json(grade(reference, attempt))
}

// ============ Reusable References ============

/// Tokenize a reference once for repeated grading
/// Returns null if the text is malformed (see dictation_last_error)
#[unsafe(no_mangle)]
pub extern "C" fn dictation_reference_new(text: *const c_char) -> *mut ReferenceHandle {
    dictation_reference_new_with_config(text, ptr::null())
}

/// Like dictation_reference_new, with a JSON GraderConfig (null for defaults)
#[unsafe(no_mangle)]
pub extern "C" fn dictation_reference_new_with_config(
    text: *const c_char,
    config_json: *const c_char,
) -> *mut ReferenceHandle {
    let Some(text) = read_str(text) else {
        return ptr::null_mut();
    };

    let config = if config_json.is_null() {
        Ok(GraderConfig::default())
    } else {
        match read_str(config_json) {
            Some(json) => GraderConfig::from_json(json),
            None => return ptr::null_mut(),
        }
    };

    match config.and_then(|config| Reference::with_config(text, config)) {
        Ok(reference) => {
            clear_last_error();
            Box::into_raw(Box::new(ReferenceHandle { reference }))
        }
        Err(e) => {
            set_last_error(e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a reference handle
#[unsafe(no_mangle)]
pub extern "C" fn dictation_reference_free(handle: *mut ReferenceHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

/// Number of scored tokens in the reference (0 for a null handle, see dictation_last_error)
#[unsafe(no_mangle)]
pub extern "C" fn dictation_reference_perfect_score(handle: *const ReferenceHandle) -> u64 {
    if handle.is_null() {
        set_last_error("null reference handle");
        return 0;
    }
    let handle = unsafe { &*handle };
    handle.reference.perfect_score() as u64
}

/// Grade an attempt against a prepared reference
/// Returns JSON in the dictation_grade format (caller must free with dictation_free_string)
#[unsafe(no_mangle)]
pub extern "C" fn dictation_reference_grade(
    handle: *const ReferenceHandle,
    attempt: *const c_char,
) -> *mut c_char {
    if handle.is_null() {
        set_last_error("null reference handle");
        return ptr::null_mut();
    }
    let handle = unsafe { &*handle };
    let Some(attempt) = read_str(attempt) else {
        return ptr::null_mut();
    };
    grade_to_json(handle.reference.grade(attempt))
}

// ============ Utilities ============

/// Last error message on this thread (caller must free with dictation_free_string)
/// Returns null if the last call succeeded
#[unsafe(no_mangle)]
pub extern "C" fn dictation_last_error() -> *mut c_char {
    LAST_ERROR.with(|last| match last.borrow().as_ref() {
        Some(message) => into_c_string(message.clone()),
        None => ptr::null_mut(),
    })
}

/// Free a string returned by dictation functions
#[unsafe(no_mangle)]
pub extern "C" fn dictation_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            drop(CString::from_raw(s));
        }
    }
}
