//! Type registry.
//!
//! This module provides:
//! - The closed set of type names a field may declare
//! - Type descriptors (coercion and type-check behavior per type)
//! - Class references and base-kind classification

mod class_ref;
mod registry;

pub use class_ref::{classify, BaseKind, ClassLike, ClassRef, BASE_KINDS};
pub use registry::{TypeRegistry, REGISTRY};

use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Coerces a raw value into a field's canonical representation.
pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Custom check; `Some(message)` rejects the value.
pub type Validator = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Confirms a (possibly transformed) value matches its declared type.
pub type TypeCheck = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Every type name the registry knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    /// Text.
    String,
    /// Any number.
    Number,
    /// List.
    Array,
    /// Plain mapping.
    Object,
    /// Boolean.
    Boolean,
    /// Regular expression, coerced from `/pattern/flags` text.
    RegExp,
    /// Point in time, coerced from text.
    Date,
    /// Number; whole-number semantics are left to the schema author.
    Integer,
    /// Plain class reference. Reserved.
    Class,
    /// Record kind reference. Reserved.
    Model,
    /// Collection kind reference. Reserved.
    Collection,
}

impl TypeName {
    /// Names an author may not spell directly.
    pub const RESERVED: [Self; 3] = [Self::Class, Self::Model, Self::Collection];

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
            Self::Boolean => "boolean",
            Self::RegExp => "regexp",
            Self::Date => "date",
            Self::Integer => "integer",
            Self::Class => "class",
            Self::Model => "model",
            Self::Collection => "collection",
        }
    }

    /// Parses a type name, ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        let parsed = match name.as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "array" => Self::Array,
            "object" => Self::Object,
            "boolean" => Self::Boolean,
            "regexp" => Self::RegExp,
            "date" => Self::Date,
            "integer" => Self::Integer,
            "class" => Self::Class,
            "model" => Self::Model,
            "collection" => Self::Collection,
            _ => return None,
        };
        Some(parsed)
    }

    /// True for `class`, `model` and `collection`.
    #[must_use]
    pub fn is_reserved(self) -> bool {
        Self::RESERVED.contains(&self)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an author wrote as a field's `type`.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// A type name such as `"String"` or `"date"`.
    Named(String),
    /// A record kind, collection kind or plain class.
    Class(ClassRef),
    /// Anything else; always rejected at compile time.
    Unrecognized(serde_json::Value),
}

impl TypeSpec {
    /// Class reference spec from any class-like kind.
    #[must_use]
    pub fn class<C: ClassLike + 'static>(class: Arc<C>) -> Self {
        Self::Class(class)
    }
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for TypeSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<ClassRef> for TypeSpec {
    fn from(class: ClassRef) -> Self {
        Self::Class(class)
    }
}

/// Coercion and checking behavior of one type.
#[derive(Clone)]
pub struct TypeDescriptor {
    /// The registered name.
    pub name: TypeName,
    /// The underlying value kind.
    pub kind: ValueKind,
    /// Optional coercion applied before checks.
    pub transform: Option<Transform>,
    /// Optional custom validation.
    pub validate: Option<Validator>,
    /// Type-check predicate.
    pub type_check: TypeCheck,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_transform", &self.transform.is_some())
            .field("has_validate", &self.validate.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_parse_ignores_case() {
        assert_eq!(TypeName::parse("String"), Some(TypeName::String));
        assert_eq!(TypeName::parse("INTEGER"), Some(TypeName::Integer));
        assert_eq!(TypeName::parse("RegExp"), Some(TypeName::RegExp));
        assert_eq!(TypeName::parse("float"), None);
    }

    #[test]
    fn test_reserved_names() {
        assert!(TypeName::Model.is_reserved());
        assert!(TypeName::Class.is_reserved());
        assert!(TypeName::Collection.is_reserved());
        assert!(!TypeName::Date.is_reserved());
    }

    #[test]
    fn test_type_spec_from_str() {
        assert!(matches!(TypeSpec::from("date"), TypeSpec::Named(name) if name == "date"));
    }
}
