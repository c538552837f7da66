//! Static catalog of supported field types.

use super::{classify, ClassRef, Transform, TypeCheck, TypeDescriptor, TypeName, TypeSpec};
use crate::errors::SchemaError;
use crate::utils::parse_timestamp;
use crate::value::{Instance, RegExp, Value, ValueKind};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Read-only registry of built-in type descriptors.
///
/// Class-like types are not stored: their descriptors are built per target
/// class by [`TypeRegistry::class_descriptor`].
#[derive(Debug)]
pub struct TypeRegistry {
    descriptors: HashMap<TypeName, TypeDescriptor>,
}

impl TypeRegistry {
    /// Creates a registry holding every built-in type.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut descriptors = HashMap::new();

        for (name, kind) in [
            (TypeName::String, ValueKind::String),
            (TypeName::Number, ValueKind::Number),
            (TypeName::Array, ValueKind::Array),
            (TypeName::Object, ValueKind::Object),
            (TypeName::Boolean, ValueKind::Boolean),
            (TypeName::Integer, ValueKind::Number),
        ] {
            descriptors.insert(name, basic(name, kind, None));
        }

        descriptors.insert(
            TypeName::RegExp,
            basic(TypeName::RegExp, ValueKind::RegExp, Some(Arc::new(regexp_transform))),
        );
        descriptors.insert(
            TypeName::Date,
            basic(TypeName::Date, ValueKind::Date, Some(Arc::new(date_transform))),
        );

        Self { descriptors }
    }

    /// Looks up a built-in descriptor by name, ignoring case.
    ///
    /// Class-like names are never found here.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        TypeName::parse(name).and_then(|name| self.get(name))
    }

    /// Gets a built-in descriptor.
    #[must_use]
    pub fn get(&self, name: TypeName) -> Option<&TypeDescriptor> {
        self.descriptors.get(&name)
    }

    /// Builds the descriptor of a class-like type for a target class.
    #[must_use]
    pub fn class_descriptor(name: TypeName, target: ClassRef) -> TypeDescriptor {
        TypeDescriptor {
            name,
            kind: ValueKind::Instance,
            transform: Some(class_transform(Arc::clone(&target))),
            validate: None,
            type_check: class_type_check(target),
        }
    }

    /// Resolves a field's declared type to its descriptor.
    ///
    /// # Errors
    ///
    /// `ReservedType` for spelled class-like names, `UnsupportedType` for
    /// unknown names, `UnrecognizableType` for any other shape.
    pub fn resolve(
        &self,
        kind_id: &str,
        field: &str,
        spec: &TypeSpec,
    ) -> Result<TypeDescriptor, SchemaError> {
        match spec {
            TypeSpec::Named(type_name) => match TypeName::parse(type_name) {
                Some(name) if name.is_reserved() => Err(SchemaError::ReservedType {
                    kind_id: kind_id.to_string(),
                    field: field.to_string(),
                    type_name: type_name.clone(),
                }),
                Some(name) => self.get(name).cloned().ok_or_else(|| unsupported(kind_id, field, type_name)),
                None => Err(unsupported(kind_id, field, type_name)),
            },
            TypeSpec::Class(target) => {
                let name = classify(target.as_ref());
                debug!(
                    kind_id = %kind_id,
                    field = %field,
                    target = %target.class_id(),
                    resolved = %name,
                    "Resolved class reference"
                );
                Ok(Self::class_descriptor(name, Arc::clone(target)))
            }
            TypeSpec::Unrecognized(found) => Err(SchemaError::UnrecognizableType {
                kind_id: kind_id.to_string(),
                field: field.to_string(),
                found: found.to_string(),
            }),
        }
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<TypeName> {
        let mut names: Vec<_> = self.descriptors.keys().copied().collect();
        names.sort_by_key(|n| n.as_str());
        names
    }

    /// Returns the number of built-in descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Global type registry.
pub static REGISTRY: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::with_builtins);

fn unsupported(kind_id: &str, field: &str, type_name: &str) -> SchemaError {
    SchemaError::UnsupportedType {
        kind_id: kind_id.to_string(),
        field: field.to_string(),
        type_name: type_name.to_string(),
    }
}

fn basic(name: TypeName, kind: ValueKind, transform: Option<Transform>) -> TypeDescriptor {
    TypeDescriptor {
        name,
        kind,
        transform,
        validate: None,
        type_check: Arc::new(move |value: &Value| value.is_null() || value.kind() == kind),
    }
}

fn regexp_transform(value: Value) -> Value {
    match value {
        Value::String(text) => match RegExp::parse_literal(&text) {
            Some(re) => Value::RegExp(re),
            None => Value::String(text),
        },
        other => other,
    }
}

fn date_transform(value: Value) -> Value {
    match value {
        Value::String(text) => parse_timestamp(&text).map_or(Value::Undefined, Value::Date),
        other => other,
    }
}

fn class_transform(target: ClassRef) -> Transform {
    Arc::new(move |value: Value| {
        let keep = match &value {
            Value::Null => true,
            Value::Instance(instance) => is_instance(instance, &target),
            _ => false,
        };
        if keep {
            return value;
        }

        match Arc::clone(&target).construct(value.clone()) {
            Ok(instance) => Value::Instance(instance),
            Err(reason) => {
                debug!(
                    target = %target.class_id(),
                    reason = %reason,
                    "Class coercion failed, keeping raw value"
                );
                value
            }
        }
    })
}

fn class_type_check(target: ClassRef) -> TypeCheck {
    Arc::new(move |value: &Value| match value {
        Value::Null => true,
        Value::Instance(instance) => is_instance(instance, &target),
        _ => false,
    })
}

fn is_instance(instance: &Instance, target: &ClassRef) -> bool {
    instance.is_instance_of(target.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchemaErrorKind;
    use chrono::{Datelike, TimeZone, Utc};

    fn transform(name: TypeName, value: Value) -> Value {
        let descriptor = REGISTRY.get(name).unwrap();
        match &descriptor.transform {
            Some(t) => t(value),
            None => value,
        }
    }

    #[test]
    fn test_registry_has_builtins() {
        assert_eq!(REGISTRY.len(), 8);
        assert!(REGISTRY.lookup("String").is_some());
        assert!(REGISTRY.lookup("model").is_none());
        assert!(REGISTRY.lookup("float").is_none());
    }

    #[test]
    fn test_basic_type_check_accepts_null() {
        for name in REGISTRY.names() {
            let descriptor = REGISTRY.get(name).unwrap();
            assert!((descriptor.type_check)(&Value::Null), "{name} should accept null");
        }
    }

    #[test]
    fn test_basic_type_check_matches_kind() {
        let string = REGISTRY.get(TypeName::String).unwrap();
        assert!((string.type_check)(&Value::from("abc")));
        assert!(!(string.type_check)(&Value::from(1)));

        let integer = REGISTRY.get(TypeName::Integer).unwrap();
        assert!((integer.type_check)(&Value::from(2.5)));
        assert!(!(integer.type_check)(&Value::from("2")));
    }

    #[test]
    fn test_regexp_transform() {
        let coerced = transform(TypeName::RegExp, Value::from("/^isbn-\\d+$/i"));
        let re = coerced.as_regexp().unwrap();
        assert!(re.is_match("ISBN-42"));

        assert_eq!(transform(TypeName::RegExp, Value::from("plain")), Value::from("plain"));
        assert_eq!(transform(TypeName::RegExp, Value::Null), Value::Null);
    }

    #[test]
    fn test_date_transform() {
        let coerced = transform(TypeName::Date, Value::from("2012-06-01T10:30:00Z"));
        assert_eq!(
            coerced,
            Value::Date(Utc.with_ymd_and_hms(2012, 6, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(coerced.as_date().unwrap().year(), 2012);

        assert_eq!(transform(TypeName::Date, Value::from("not a date")), Value::Undefined);
        assert_eq!(transform(TypeName::Date, Value::Null), Value::Null);
    }

    #[test]
    fn test_resolve_named() {
        let descriptor = REGISTRY
            .resolve("Book", "title", &TypeSpec::from("String"))
            .unwrap();
        assert_eq!(descriptor.name, TypeName::String);
    }

    #[test]
    fn test_resolve_reserved() {
        for name in ["model", "Class", "COLLECTION"] {
            let err = REGISTRY
                .resolve("Book", "author", &TypeSpec::from(name))
                .unwrap_err();
            assert_eq!(err.kind(), SchemaErrorKind::ReservedType);
        }
    }

    #[test]
    fn test_resolve_unsupported_and_unrecognizable() {
        let err = REGISTRY
            .resolve("Book", "price", &TypeSpec::from("decimal"))
            .unwrap_err();
        assert_eq!(err.kind(), SchemaErrorKind::UnsupportedType);

        let err = REGISTRY
            .resolve("Book", "price", &TypeSpec::Unrecognized(serde_json::json!(42)))
            .unwrap_err();
        assert_eq!(err.kind(), SchemaErrorKind::UnrecognizableType);
    }
}
