//! Error types for the lifeguard schema layer.
//!
//! Two disjoint families live here:
//!
//! - [`SchemaError`]: raised while compiling a record kind's declaration.
//!   Fail-fast; the first one aborts the declaration.
//! - [`AttributeError`]: raised while validating an attribute write.
//!   Accumulated across a whole write into [`ValidationErrors`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for lifeguard operations.
#[derive(Debug, Error)]
pub enum LifeguardError {
    /// A schema declaration failed to compile.
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// An attribute write was rejected.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// A class reference id is already taken in a catalog.
    #[error("Kind '{id}' is already registered")]
    DuplicateKind {
        /// The conflicting id.
        id: String,
    },

    /// Configuration could not be applied.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stable error codes, one per error kind.
pub mod codes {
    /// A field definition is not a mapping.
    pub const MALFORMED_FIELD: &str = "LIFEGUARD-101-MALFORMED";
    /// A field spells a reserved type name.
    pub const RESERVED_TYPE: &str = "LIFEGUARD-102-RESERVED";
    /// A field names a type the registry does not know.
    pub const UNSUPPORTED_TYPE: &str = "LIFEGUARD-103-UNSUPPORTED";
    /// A field's type is neither a name nor a class reference.
    pub const UNRECOGNIZABLE_TYPE: &str = "LIFEGUARD-104-UNRECOGNIZABLE";
    /// `fields` and `defaults` disagree on a default value.
    pub const CONFLICTING_DEFAULT: &str = "LIFEGUARD-105-CONFLICT";
    /// A write names an attribute the schema does not declare.
    pub const UNDECLARED_ATTRIBUTE: &str = "LIFEGUARD-201-UNDECLARED";
    /// A custom validator rejected a value.
    pub const CUSTOM_VALIDATION: &str = "LIFEGUARD-202-CUSTOM";
    /// A value failed its type-check.
    pub const FAILED_TYPE_CHECK: &str = "LIFEGUARD-203-TYPE_CHECK";
    /// The host's own invariant step rejected the write.
    pub const BASE_REJECTED: &str = "LIFEGUARD-204-BASE";
    /// A record was constructed from a non-mapping value.
    pub const INVALID_RECORD_INPUT: &str = "LIFEGUARD-205-INPUT";
}

/// Stable discriminant for [`SchemaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaErrorKind {
    /// See [`SchemaError::MalformedFieldDefinition`].
    MalformedFieldDefinition,
    /// See [`SchemaError::ReservedType`].
    ReservedType,
    /// See [`SchemaError::UnsupportedType`].
    UnsupportedType,
    /// See [`SchemaError::UnrecognizableType`].
    UnrecognizableType,
    /// See [`SchemaError::ConflictingDefault`].
    ConflictingDefault,
}

/// Error raised when a record kind's schema cannot be compiled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A field definition is not a structured mapping.
    #[error("Schema for '{kind_id}': definition of field \"{field}\" must be a mapping, found {found}")]
    MalformedFieldDefinition {
        /// The record kind being declared.
        kind_id: String,
        /// The field name.
        field: String,
        /// Short description of what was found instead.
        found: String,
    },

    /// A field spells one of the internal class-like type names.
    #[error("Schema for '{kind_id}': reserved type \"{type_name}\" for field \"{field}\"")]
    ReservedType {
        /// The record kind being declared.
        kind_id: String,
        /// The field name.
        field: String,
        /// The type name as written by the author.
        type_name: String,
    },

    /// A field names a type missing from the registry.
    #[error("Schema for '{kind_id}': unsupported type \"{type_name}\" for field \"{field}\"")]
    UnsupportedType {
        /// The record kind being declared.
        kind_id: String,
        /// The field name.
        field: String,
        /// The type name as written by the author.
        type_name: String,
    },

    /// A field's type is neither a type name nor a class reference.
    #[error("Schema for '{kind_id}': unrecognizable type for field \"{field}\": {found}")]
    UnrecognizableType {
        /// The record kind being declared.
        kind_id: String,
        /// The field name.
        field: String,
        /// Rendering of the offending type value.
        found: String,
    },

    /// A field's inline default differs from its entry in `defaults`.
    #[error("Schema for '{kind_id}': field \"{field}\" declares default {field_default} but defaults declare {default}")]
    ConflictingDefault {
        /// The record kind being declared.
        kind_id: String,
        /// The field name.
        field: String,
        /// The default carried by the field definition.
        field_default: serde_json::Value,
        /// The default carried by the defaults map.
        default: serde_json::Value,
    },
}

impl SchemaError {
    /// Returns the stable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> SchemaErrorKind {
        match self {
            Self::MalformedFieldDefinition { .. } => SchemaErrorKind::MalformedFieldDefinition,
            Self::ReservedType { .. } => SchemaErrorKind::ReservedType,
            Self::UnsupportedType { .. } => SchemaErrorKind::UnsupportedType,
            Self::UnrecognizableType { .. } => SchemaErrorKind::UnrecognizableType,
            Self::ConflictingDefault { .. } => SchemaErrorKind::ConflictingDefault,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self.kind() {
            SchemaErrorKind::MalformedFieldDefinition => codes::MALFORMED_FIELD,
            SchemaErrorKind::ReservedType => codes::RESERVED_TYPE,
            SchemaErrorKind::UnsupportedType => codes::UNSUPPORTED_TYPE,
            SchemaErrorKind::UnrecognizableType => codes::UNRECOGNIZABLE_TYPE,
            SchemaErrorKind::ConflictingDefault => codes::CONFLICTING_DEFAULT,
        }
    }

    /// Returns the record kind whose declaration failed.
    #[must_use]
    pub fn kind_id(&self) -> &str {
        match self {
            Self::MalformedFieldDefinition { kind_id, .. }
            | Self::ReservedType { kind_id, .. }
            | Self::UnsupportedType { kind_id, .. }
            | Self::UnrecognizableType { kind_id, .. }
            | Self::ConflictingDefault { kind_id, .. } => kind_id,
        }
    }

    /// Returns the field that caused the failure.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MalformedFieldDefinition { field, .. }
            | Self::ReservedType { field, .. }
            | Self::UnsupportedType { field, .. }
            | Self::UnrecognizableType { field, .. }
            | Self::ConflictingDefault { field, .. } => field,
        }
    }

    /// Hint for fixing the declaration.
    #[must_use]
    pub const fn fix_hint(&self) -> &'static str {
        match self.kind() {
            SchemaErrorKind::MalformedFieldDefinition => {
                "Declare every field as a mapping, e.g. { \"type\": \"string\" }."
            }
            SchemaErrorKind::ReservedType => {
                "Pass the record kind, collection kind or class itself instead of spelling \
                 \"class\", \"model\" or \"collection\"."
            }
            SchemaErrorKind::UnsupportedType => {
                "Use one of: string, number, integer, boolean, array, object, date, regexp, \
                 or a class reference."
            }
            SchemaErrorKind::UnrecognizableType => {
                "A field type must be a type name or a class reference."
            }
            SchemaErrorKind::ConflictingDefault => {
                "Declare the default once, either on the field or in defaults, or make both equal."
            }
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("kind_id".to_string(), serde_json::json!(self.kind_id()));
        map.insert("field".to_string(), serde_json::json!(self.field()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map.insert("fix_hint".to_string(), serde_json::json!(self.fix_hint()));
        map
    }
}

/// Stable discriminant for [`AttributeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeErrorKind {
    /// See [`AttributeError::UndeclaredAttribute`].
    UndeclaredAttribute,
    /// See [`AttributeError::Custom`].
    Custom,
    /// See [`AttributeError::FailedTypeCheck`].
    FailedTypeCheck,
    /// See [`AttributeError::BaseRejected`].
    BaseRejected,
    /// See [`AttributeError::InvalidRecordInput`].
    InvalidRecordInput,
}

/// A single problem found while validating an attribute write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// The schema has no field with this name.
    #[error("Error: Undeclared attribute \"{name}\".")]
    UndeclaredAttribute {
        /// The attribute name.
        name: String,
    },

    /// A custom validator returned a message.
    #[error("{message}")]
    Custom {
        /// The attribute name.
        attribute: String,
        /// The validator's message, verbatim.
        message: String,
    },

    /// The (transformed) value did not pass the field's type-check.
    #[error("Error: Failed type check for attribute \"{name}\".")]
    FailedTypeCheck {
        /// The attribute name.
        name: String,
    },

    /// The host's own invariant step rejected the merged attributes.
    #[error("{message}")]
    BaseRejected {
        /// The host validator's message, verbatim.
        message: String,
    },

    /// A record was constructed from something other than a mapping.
    #[error("Cannot construct a '{kind_id}' record from {found}")]
    InvalidRecordInput {
        /// The record kind.
        kind_id: String,
        /// Short description of the value received.
        found: String,
    },
}

impl AttributeError {
    /// Creates an undeclared attribute error.
    #[must_use]
    pub fn undeclared(name: impl Into<String>) -> Self {
        Self::UndeclaredAttribute { name: name.into() }
    }

    /// Creates a custom validation error.
    #[must_use]
    pub fn custom(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Creates a failed type-check error.
    #[must_use]
    pub fn failed_type_check(name: impl Into<String>) -> Self {
        Self::FailedTypeCheck { name: name.into() }
    }

    /// Returns the stable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> AttributeErrorKind {
        match self {
            Self::UndeclaredAttribute { .. } => AttributeErrorKind::UndeclaredAttribute,
            Self::Custom { .. } => AttributeErrorKind::Custom,
            Self::FailedTypeCheck { .. } => AttributeErrorKind::FailedTypeCheck,
            Self::BaseRejected { .. } => AttributeErrorKind::BaseRejected,
            Self::InvalidRecordInput { .. } => AttributeErrorKind::InvalidRecordInput,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self.kind() {
            AttributeErrorKind::UndeclaredAttribute => codes::UNDECLARED_ATTRIBUTE,
            AttributeErrorKind::Custom => codes::CUSTOM_VALIDATION,
            AttributeErrorKind::FailedTypeCheck => codes::FAILED_TYPE_CHECK,
            AttributeErrorKind::BaseRejected => codes::BASE_REJECTED,
            AttributeErrorKind::InvalidRecordInput => codes::INVALID_RECORD_INPUT,
        }
    }

    /// Returns the attribute this error is about, if any.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::UndeclaredAttribute { name } | Self::FailedTypeCheck { name } => Some(name),
            Self::Custom { attribute, .. } => Some(attribute),
            Self::BaseRejected { .. } | Self::InvalidRecordInput { .. } => None,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        if let Some(attribute) = self.attribute() {
            map.insert("attribute".to_string(), serde_json::json!(attribute));
        }
        map
    }
}

/// Every error found in one rejected attribute write, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct ValidationErrors {
    errors: Vec<AttributeError>,
}

impl ValidationErrors {
    /// Wraps a list of errors.
    #[must_use]
    pub fn new(errors: Vec<AttributeError>) -> Self {
        Self { errors }
    }

    /// Wraps a single error.
    #[must_use]
    pub fn single(error: AttributeError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Returns the errors.
    #[must_use]
    pub fn errors(&self) -> &[AttributeError] {
        &self.errors
    }

    /// Returns the rendered messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Counts the errors of a given kind.
    #[must_use]
    pub fn count_of(&self, kind: AttributeErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind() == kind).count()
    }

    /// Iterates over the errors.
    pub fn iter(&self) -> std::slice::Iter<'_, AttributeError> {
        self.errors.iter()
    }

    /// Consumes the wrapper.
    #[must_use]
    pub fn into_inner(self) -> Vec<AttributeError> {
        self.errors
    }

    /// JSON payload used for error notifications.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.errors
                .iter()
                .map(|e| serde_json::Value::Object(e.to_dict().into_iter().collect()))
                .collect(),
        )
    }
}

fn join_messages(errors: &[AttributeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a AttributeError;
    type IntoIter = std::slice::Iter<'a, AttributeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<AttributeError> for ValidationErrors {
    fn from(error: AttributeError) -> Self {
        Self::single(error)
    }
}
