//! Dynamic attribute values.
//!
//! Records hold their attributes as an insertion-ordered map of [`Value`]s.
//! Besides the JSON shapes, a value can carry a date, a compiled regular
//! expression, or a shared reference to another record, collection or
//! class object.

mod convert;
mod regexp;

pub use convert::{attributes_from_json, attributes_to_json};
pub use regexp::{RegExp, RegExpError};

use crate::record::{ClassObject, Collection, Record};
use crate::types::{BaseKind, ClassLike};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered attribute map.
pub type Attributes = IndexMap<String, Value>;

/// The shape of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Absent value.
    Undefined,
    /// Explicit null.
    Null,
    /// `true` / `false`.
    Boolean,
    /// Any number; whole numbers are not distinguished.
    Number,
    /// Text.
    String,
    /// Ordered list.
    Array,
    /// Attribute mapping.
    Object,
    /// Point in time.
    Date,
    /// Regular expression.
    RegExp,
    /// Record, collection or class object.
    Instance,
}

impl ValueKind {
    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Date => "date",
            Self::RegExp => "regexp",
            Self::Instance => "instance",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single attribute value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent. Produced by coercions that could not make sense of their input.
    #[default]
    Undefined,
    /// Explicit null. Passes every built-in type-check.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// Text.
    String(String),
    /// List of values.
    Array(Vec<Value>),
    /// Nested plain mapping.
    Object(Attributes),
    /// Point in time.
    Date(DateTime<Utc>),
    /// Regular expression.
    RegExp(RegExp),
    /// Shared reference to a record, collection or class object.
    Instance(Instance),
}

impl Value {
    /// Returns the shape of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
            Self::Date(_) => ValueKind::Date,
            Self::RegExp(_) => ValueKind::RegExp,
            Self::Instance(_) => ValueKind::Instance,
        }
    }

    /// True for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for [`Value::Undefined`].
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// True for null and undefined.
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Returns the text, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number, if this is a number.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mapping, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Attributes> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the date, if this is a date.
    #[must_use]
    pub const fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the regular expression, if this is one.
    #[must_use]
    pub const fn as_regexp(&self) -> Option<&RegExp> {
        match self {
            Self::RegExp(re) => Some(re),
            _ => None,
        }
    }

    /// Returns the instance, if this is one.
    #[must_use]
    pub const fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns the record, if this is a record instance.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Arc<Record>> {
        match self {
            Self::Instance(Instance::Record(record)) => Some(record),
            _ => None,
        }
    }

    /// Returns the collection, if this is a collection instance.
    #[must_use]
    pub const fn as_collection(&self) -> Option<&Arc<Collection>> {
        match self {
            Self::Instance(Instance::Collection(collection)) => Some(collection),
            _ => None,
        }
    }

    /// Short description used in error messages, e.g. `string "abc"`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Instance(instance) => format!("instance of '{}'", instance.class_id()),
            other => format!("{} {}", other.kind(), other.to_json()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::RegExp(a), Self::RegExp(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::String(s) => f.write_str(s),
            Self::RegExp(re) => write!(f, "{re}"),
            Self::Instance(instance) => write!(f, "[{}]", instance.class_id()),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

/// A shared reference to an object built by a class-like kind.
///
/// Cloning an instance clones the reference, never the object; equality is
/// identity.
#[derive(Debug, Clone)]
pub enum Instance {
    /// A record of some record kind.
    Record(Arc<Record>),
    /// A collection of records.
    Collection(Arc<Collection>),
    /// An object of a plain class.
    Object(Arc<ClassObject>),
}

impl Instance {
    /// Returns the id of the kind that built this instance.
    #[must_use]
    pub fn class_id(&self) -> &str {
        match self {
            Self::Record(record) => record.kind().id(),
            Self::Collection(collection) => collection.kind().id(),
            Self::Object(object) => object.class().id(),
        }
    }

    /// Returns the base kind marker of the class that built this instance.
    #[must_use]
    pub const fn base_kind(&self) -> Option<BaseKind> {
        match self {
            Self::Record(_) => Some(BaseKind::Model),
            Self::Collection(_) => Some(BaseKind::Collection),
            Self::Object(_) => None,
        }
    }

    /// True if `class` itself built this instance.
    ///
    /// Compares kind identity, so two kinds sharing an id are distinct.
    #[must_use]
    pub fn is_instance_of(&self, class: &dyn ClassLike) -> bool {
        let class: *const dyn ClassLike = class;
        match self {
            Self::Record(record) => std::ptr::addr_eq(Arc::as_ptr(record.kind()), class),
            Self::Collection(collection) => std::ptr::addr_eq(Arc::as_ptr(collection.kind()), class),
            Self::Object(object) => std::ptr::addr_eq(Arc::as_ptr(object.class()), class),
        }
    }

    /// True if both references point at the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b),
            (Self::Collection(a), Self::Collection(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Plain-data form of the referenced object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Record(record) => record.to_json(),
            Self::Collection(collection) => collection.to_json(),
            Self::Object(object) => object.to_json(),
        }
    }
}
