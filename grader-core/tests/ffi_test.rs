//! Integration tests for the FFI layer
//!
//! These tests verify the C-compatible functions a host app calls.
//! Tests focus on handle lifecycle, error reporting, and JSON marshalling.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use dictation::ffi::*;

// ============ Helper Functions ============

fn c_str(s: &str) -> CString {
    CString::new(s).expect("CString creation failed")
}

fn from_c_str_and_free(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        let result = unsafe { CStr::from_ptr(ptr).to_str().ok().map(String::from) };
        dictation_free_string(ptr);
        result
    }
}

fn parse(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("invalid JSON from FFI")
}

// ============ One-shot Grading Tests ============

#[test]
fn test_grade_returns_json() {
    let reference = c_str("this is a test");
    let attempt = c_str("this is a toast");

    let json = from_c_str_and_free(dictation_grade(reference.as_ptr(), attempt.as_ptr()))
        .expect("grading should succeed");
    let value = parse(&json);

    assert_eq!(value["stats"]["errors"], 1);
    assert_eq!(value["stats"]["correct"], 3);
    assert_eq!(value["stats"]["perfect_score"], 4);
    assert_eq!(value["stats"]["score"], "75.00");
    assert_eq!(value["entries"][3]["kind"], "incorrect");
    assert_eq!(value["entries"][3]["expected"], "test");
    assert_eq!(value["entries"][3]["actual"], "toast");

    assert!(from_c_str_and_free(dictation_last_error()).is_none());
}

#[test]
fn test_grade_error_kind_names() {
    let reference = c_str("welcome to the ballpark");
    let attempt = c_str("welcome to the ball park");

    let json = from_c_str_and_free(dictation_grade(reference.as_ptr(), attempt.as_ptr())).unwrap();
    let value = parse(&json);
    assert_eq!(value["entries"][3]["type"], "error");
    assert_eq!(value["entries"][3]["kind"], "extra space");
}

#[test]
fn test_grade_null_arguments() {
    let text = c_str("hello");
    assert!(dictation_grade(ptr::null(), text.as_ptr()).is_null());
    assert!(dictation_grade(text.as_ptr(), ptr::null()).is_null());

    let message = from_c_str_and_free(dictation_last_error()).expect("error should be recorded");
    assert!(message.contains("null"));
}

#[test]
fn test_grade_malformed_reference() {
    let reference = c_str("it is my {favorite toy");
    let attempt = c_str("it is my favorite toy");

    assert!(dictation_grade(reference.as_ptr(), attempt.as_ptr()).is_null());
    let message = from_c_str_and_free(dictation_last_error()).expect("error should be recorded");
    assert!(message.contains("Unclosed"), "got {message:?}");
}

#[test]
fn test_success_clears_last_error() {
    let bad = c_str("a }");
    let good = c_str("a");
    assert!(dictation_grade(bad.as_ptr(), good.as_ptr()).is_null());
    assert!(from_c_str_and_free(dictation_last_error()).is_some());

    let json = dictation_grade(good.as_ptr(), good.as_ptr());
    assert!(from_c_str_and_free(json).is_some());
    assert!(from_c_str_and_free(dictation_last_error()).is_none());
}

// ============ Reference Handle Tests ============

#[test]
fn test_reference_lifecycle() {
    let text = c_str("it is my {favorite|favourite} toy{!}");
    let handle = dictation_reference_new(text.as_ptr());
    assert!(!handle.is_null());
    assert_eq!(dictation_reference_perfect_score(handle), 5);

    for (attempt, errors) in [
        ("it is my favorite toy!", 0),
        ("it is my favourite toy", 0),
        ("it is my favorit toy", 1),
    ] {
        let attempt = c_str(attempt);
        let json = from_c_str_and_free(dictation_reference_grade(handle, attempt.as_ptr())).unwrap();
        assert_eq!(parse(&json)["stats"]["errors"], errors);
    }

    dictation_reference_free(handle);
}

#[test]
fn test_reference_null_handling() {
    let attempt = c_str("anything");
    assert!(dictation_reference_new(ptr::null()).is_null());
    assert!(dictation_reference_grade(ptr::null(), attempt.as_ptr()).is_null());
    assert_eq!(dictation_reference_perfect_score(ptr::null()), 0);

    // freeing null should not panic
    dictation_reference_free(ptr::null_mut());
    dictation_free_string(ptr::null_mut());
}

#[test]
fn test_null_handle_replaces_stale_error() {
    let bad = c_str("a }");
    assert!(dictation_reference_new(bad.as_ptr()).is_null());
    let stale = from_c_str_and_free(dictation_last_error()).unwrap();
    assert!(stale.contains("Unopened"));

    let attempt = c_str("anything");
    assert!(dictation_reference_grade(ptr::null(), attempt.as_ptr()).is_null());
    let message = from_c_str_and_free(dictation_last_error()).unwrap();
    assert_eq!(message, "null reference handle");

    assert!(dictation_reference_new(bad.as_ptr()).is_null());
    assert_eq!(dictation_reference_perfect_score(ptr::null()), 0);
    let message = from_c_str_and_free(dictation_last_error()).unwrap();
    assert_eq!(message, "null reference handle");
}

#[test]
fn test_grade_attempt_with_stray_braces() {
    let reference = c_str("see you tomorrow");
    let attempt = c_str("see you} tomorrow");

    let json = from_c_str_and_free(dictation_grade(reference.as_ptr(), attempt.as_ptr()))
        .expect("stray braces in an attempt should still grade");
    let value = parse(&json);
    assert_eq!(value["stats"]["errors"], 1);
    assert_eq!(value["entries"][1]["kind"], "incorrect");
    assert_eq!(value["entries"][1]["actual"], "you}");
}

#[test]
fn test_reference_rejects_malformed_text() {
    let text = c_str("{a {b}}");
    assert!(dictation_reference_new(text.as_ptr()).is_null());
    let message = from_c_str_and_free(dictation_last_error()).unwrap();
    assert!(message.contains("Nested"), "got {message:?}");
}

#[test]
fn test_reference_with_config() {
    let text = c_str("save the date now");
    let config = c_str(r#"{"diff_style": "markdown"}"#);
    let handle = dictation_reference_new_with_config(text.as_ptr(), config.as_ptr());
    assert!(!handle.is_null());

    let attempt = c_str("save the data now");
    let json = from_c_str_and_free(dictation_reference_grade(handle, attempt.as_ptr())).unwrap();
    assert_eq!(parse(&json)["diff"], "save the ~~date~~ __data__ now");

    dictation_reference_free(handle);
}

#[test]
fn test_reference_config_token_limit() {
    let text = c_str("one two three four");
    let config = c_str(r#"{"max_tokens": 3}"#);
    assert!(dictation_reference_new_with_config(text.as_ptr(), config.as_ptr()).is_null());
    assert!(from_c_str_and_free(dictation_last_error()).is_some());

    let bad_config = c_str(r#"{"max_tokens": 0}"#);
    assert!(dictation_reference_new_with_config(text.as_ptr(), bad_config.as_ptr()).is_null());
}
