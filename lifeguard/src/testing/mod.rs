//! Testing utilities for schemas and records.
//!
//! This module provides:
//! - Bookstore fixtures (`Author`, `Authors`, `Book`)
//! - Assertions for rejected writes and failed declarations
//! - A recording base validator

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_attribute, assert_attribute_absent, assert_error_kinds, assert_error_messages,
    assert_rejected, assert_schema_error,
};
pub use fixtures::{attrs, book_declaration, bookstore, isbn_validator, Bookstore};
pub use mocks::RecordingValidator;
