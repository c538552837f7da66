//! Test assertions for writes and declarations.

use crate::errors::{AttributeErrorKind, SchemaError, SchemaErrorKind, ValidationErrors};
use crate::record::Record;
use crate::value::Value;

/// Asserts that a write was rejected and returns its errors.
pub fn assert_rejected<T: std::fmt::Debug>(result: Result<T, ValidationErrors>) -> ValidationErrors {
    match result {
        Ok(value) => panic!("Expected rejected write, got success: {value:?}"),
        Err(errors) => errors,
    }
}

/// Asserts the rendered messages of a rejected write, in order.
pub fn assert_error_messages(errors: &ValidationErrors, expected: &[&str]) {
    let actual = errors.messages();
    assert_eq!(
        actual, expected,
        "Expected error messages {expected:?}, got {actual:?}"
    );
}

/// Asserts the kinds of the errors of a rejected write, in order.
pub fn assert_error_kinds(errors: &ValidationErrors, expected: &[AttributeErrorKind]) {
    let actual: Vec<_> = errors.iter().map(|e| e.kind()).collect();
    assert_eq!(actual, expected, "Expected error kinds {expected:?}, got {actual:?}");
}

/// Asserts that a declaration failed with the given kind of error.
pub fn assert_schema_error<T: std::fmt::Debug>(result: Result<T, SchemaError>, expected: SchemaErrorKind) -> SchemaError {
    match result {
        Ok(value) => panic!("Expected {expected:?}, got a compiled kind: {value:?}"),
        Err(error) => {
            assert_eq!(error.kind(), expected, "Expected {expected:?}, got {error}");
            error
        }
    }
}

/// Asserts that a record holds the expected attribute value.
pub fn assert_attribute(record: &Record, name: &str, expected: &Value) {
    let actual = record.get(name);
    assert_eq!(
        actual.as_ref(),
        Some(expected),
        "Expected attribute '{name}' to be {expected:?}, got {actual:?}"
    );
}

/// Asserts that a record does not hold an attribute at all.
pub fn assert_attribute_absent(record: &Record, name: &str) {
    assert!(
        record.get(name).is_none(),
        "Expected attribute '{name}' to be absent, but it is set"
    );
}
