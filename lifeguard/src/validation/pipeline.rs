//! Transform, validate and type-check an attribute write.

use crate::errors::{AttributeError, ValidationErrors};
use crate::schema::CompiledSchema;
use crate::value::Attributes;
use tracing::{debug, trace};

/// Validates an incoming write against a compiled schema.
///
/// Each attribute, in insertion order, is coerced by its field's transform,
/// then offered to the custom validator, then type-checked. A validator
/// message stops that attribute before its type-check. Every error of the
/// write is collected; nothing is returned unless all attributes pass.
///
/// # Errors
///
/// Returns every [`AttributeError`] found, in discovery order.
pub fn validate(schema: &CompiledSchema, incoming: Attributes) -> Result<Attributes, ValidationErrors> {
    let mut coerced = Attributes::with_capacity(incoming.len());
    let mut errors = Vec::new();

    for (name, value) in incoming {
        let Some(field) = schema.field(&name) else {
            errors.push(AttributeError::undeclared(name));
            continue;
        };

        let value = field.coerce(value);

        if let Some(message) = field.check(&value) {
            errors.push(AttributeError::custom(name, message));
            continue;
        }

        if !field.accepts(&value) {
            errors.push(AttributeError::failed_type_check(name));
            continue;
        }

        trace!(
            kind_id = %schema.kind_id(),
            attribute = %name,
            value_kind = %value.kind(),
            "Coerced attribute"
        );
        coerced.insert(name, value);
    }

    if errors.is_empty() {
        Ok(coerced)
    } else {
        debug!(
            kind_id = %schema.kind_id(),
            error_count = errors.len(),
            "Rejected attribute write"
        );
        Err(ValidationErrors::new(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AttributeErrorKind;
    use crate::schema::{compile, FieldDefinition, SchemaDeclaration};
    use crate::value::{attributes_from_json, Value};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> CompiledSchema {
        compile(
            "Book",
            SchemaDeclaration::new()
                .field("title", FieldDefinition::typed("string"))
                .field("pages", FieldDefinition::typed("integer"))
                .field("published", FieldDefinition::typed("date"))
                .field("pattern", FieldDefinition::typed("regexp"))
                .field("tags", FieldDefinition::typed("array"))
                .field("meta", FieldDefinition::typed("object"))
                .field("available", FieldDefinition::typed("boolean"))
                .field(
                    "isbn",
                    FieldDefinition::typed("string").validate(|v| {
                        let ok = v.as_str().is_some_and(|s| s.len() == 13);
                        (!ok).then(|| "ISBN code not valid".to_string())
                    }),
                ),
        )
        .unwrap()
        .unwrap()
    }

    fn attrs(value: serde_json::Value) -> Attributes {
        attributes_from_json(value)
    }

    #[test]
    fn test_valid_write_is_coerced() {
        let result = validate(
            &schema(),
            attrs(json!({
                "title": "Dune",
                "published": "1965-08-01T00:00:00Z",
                "pattern": "/^du/i"
            })),
        )
        .unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result["title"], Value::from("Dune"));
        assert_eq!(
            result["published"],
            Value::Date(Utc.with_ymd_and_hms(1965, 8, 1, 0, 0, 0).unwrap())
        );
        assert!(result["pattern"].as_regexp().unwrap().is_match("DUNE"));
    }

    #[test]
    fn test_null_passes_every_builtin_type() {
        let names = ["title", "pages", "published", "pattern", "tags", "meta", "available"];
        let incoming: Attributes = names.iter().map(|n| ((*n).to_string(), Value::Null)).collect();

        let result = validate(&schema(), incoming).unwrap();
        assert!(result.values().all(Value::is_null));
        assert_eq!(result.len(), names.len());
    }

    #[test]
    fn test_undeclared_attribute() {
        let errors = validate(&schema(), attrs(json!({"color": "red"}))).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.messages(), vec!["Error: Undeclared attribute \"color\".".to_string()]);
    }

    #[test]
    fn test_all_errors_collected_in_order() {
        let errors = validate(
            &schema(),
            attrs(json!({
                "pages": "many",
                "color": "red",
                "isbn": "123",
                "title": "ok"
            })),
        )
        .unwrap_err();

        let kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                AttributeErrorKind::FailedTypeCheck,
                AttributeErrorKind::UndeclaredAttribute,
                AttributeErrorKind::Custom,
            ]
        );
        assert_eq!(errors.messages()[2], "ISBN code not valid");
    }

    #[test]
    fn test_custom_validator_skips_type_check() {
        let errors = validate(&schema(), attrs(json!({"isbn": 42}))).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.count_of(AttributeErrorKind::Custom), 1);
        assert_eq!(errors.errors()[0].attribute(), Some("isbn"));
    }

    #[test]
    fn test_empty_validator_message_passes() {
        let schema = compile(
            "Note",
            SchemaDeclaration::new().field(
                "x",
                FieldDefinition::typed("string").validate(|_| Some(String::new())),
            ),
        )
        .unwrap()
        .unwrap();

        let result = validate(&schema, attrs(json!({"x": "ok"}))).unwrap();
        assert_eq!(result["x"], Value::from("ok"));

        let errors = validate(&schema, attrs(json!({"x": 5}))).unwrap_err();
        assert_eq!(errors.count_of(AttributeErrorKind::FailedTypeCheck), 1);
    }

    #[test]
    fn test_unparsable_date_fails_type_check() {
        let errors = validate(&schema(), attrs(json!({"published": "someday"}))).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec!["Error: Failed type check for attribute \"published\".".to_string()]
        );
    }

    #[test]
    fn test_integer_accepts_fractions() {
        let result = validate(&schema(), attrs(json!({"pages": 2.5}))).unwrap();
        assert_eq!(result["pages"], Value::from(2.5));
    }

    #[test]
    fn test_empty_write_succeeds() {
        assert!(validate(&schema(), Attributes::new()).unwrap().is_empty());
    }
}
