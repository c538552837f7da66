//! Scenario tests for schema compilation.

#[cfg(test)]
mod tests {
    use crate::errors::{SchemaError, SchemaErrorKind};
    use crate::record::{ClassKind, CollectionKind, KindCatalog, RecordKind};
    use crate::schema::{compile, CompiledSchema, FieldDefinition, SchemaDeclaration};
    use crate::types::{ClassRef, TypeName, TypeSpec};
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn compiled(declaration: SchemaDeclaration) -> CompiledSchema {
        compile("Book", declaration).unwrap().unwrap()
    }

    fn failure(declaration: SchemaDeclaration) -> SchemaError {
        compile("Book", declaration).unwrap_err()
    }

    fn author_kind() -> Arc<RecordKind> {
        RecordKind::builder("Author").build().unwrap()
    }

    #[test]
    fn test_no_field_map_installs_no_schema() {
        let declaration = SchemaDeclaration::new().with_default("title", "Untitled");
        assert!(compile("Book", declaration).unwrap().is_none());
    }

    #[test]
    fn test_empty_field_map_compiles() {
        let schema = compiled(SchemaDeclaration::new().with_empty_fields());
        assert!(schema.is_empty());
        assert_eq!(schema.kind_id(), "Book");
    }

    #[test]
    fn test_reserved_type_names_rejected() {
        for name in ["model", "Model", "collection", "class"] {
            let err = failure(SchemaDeclaration::new().field("author", FieldDefinition::typed(name)));
            assert_eq!(err.kind(), SchemaErrorKind::ReservedType);
            assert_eq!(err.field(), "author");
        }
    }

    #[test]
    fn test_class_references_resolve_by_base_kind() {
        let author = author_kind();
        let authors = CollectionKind::new("Authors", Arc::clone(&author));
        let point = ClassKind::new("Point", Ok);

        let schema = compiled(
            SchemaDeclaration::new()
                .field("author", FieldDefinition::typed(TypeSpec::class(author)))
                .field("similar", FieldDefinition::typed(TypeSpec::class(authors)))
                .field("origin", FieldDefinition::typed(TypeSpec::class(point))),
        );

        assert_eq!(schema.field("author").unwrap().resolved_type(), Some(TypeName::Model));
        assert_eq!(schema.field("similar").unwrap().resolved_type(), Some(TypeName::Collection));
        assert_eq!(schema.field("origin").unwrap().resolved_type(), Some(TypeName::Class));
    }

    #[test]
    fn test_unsupported_and_unrecognizable_types() {
        let err = failure(SchemaDeclaration::new().field("price", FieldDefinition::typed("decimal")));
        assert_eq!(err.kind(), SchemaErrorKind::UnsupportedType);
        assert!(err.to_string().contains("unsupported type \"decimal\""));

        let err = failure(
            SchemaDeclaration::new()
                .field("price", FieldDefinition::typed(TypeSpec::Unrecognized(json!(["number"])))),
        );
        assert_eq!(err.kind(), SchemaErrorKind::UnrecognizableType);
    }

    #[test]
    fn test_malformed_field_definition() {
        let err = failure(SchemaDeclaration::new().field("title", crate::schema::FieldEntry::Malformed(json!("string"))));
        assert_eq!(
            err,
            SchemaError::MalformedFieldDefinition {
                kind_id: "Book".to_string(),
                field: "title".to_string(),
                found: "string \"string\"".to_string(),
            }
        );
    }

    #[test]
    fn test_first_error_aborts() {
        let err = failure(
            SchemaDeclaration::new()
                .field("a", FieldDefinition::typed("nope"))
                .field("b", FieldDefinition::typed("model")),
        );
        assert_eq!(err.field(), "a");
        assert_eq!(err.kind(), SchemaErrorKind::UnsupportedType);
    }

    #[test]
    fn test_field_default_copied_into_defaults() {
        let schema = compiled(
            SchemaDeclaration::new()
                .field("id", FieldDefinition::typed("integer").default_value(Value::Null))
                .field("title", FieldDefinition::typed("string")),
        );

        assert_eq!(schema.defaults().len(), 1);
        assert_eq!(schema.defaults().get("id"), Some(&Value::Null));
        assert_eq!(schema.field("title").unwrap().default_value(), None);
    }

    #[test]
    fn test_defaults_entry_synthesizes_untyped_field() {
        let schema = compiled(
            SchemaDeclaration::new()
                .field("title", FieldDefinition::typed("string"))
                .with_default("shelf", "A3"),
        );

        assert_eq!(schema.field_names(), vec!["title", "shelf"]);
        let shelf = schema.field("shelf").unwrap();
        assert_eq!(shelf.resolved_type(), None);
        assert_eq!(shelf.default_value(), Some(&Value::from("A3")));
        assert!(shelf.accepts(&Value::from(12)));
        assert_eq!(shelf.coerce(Value::from(12)), Value::from(12));
    }

    #[test]
    fn test_conflicting_defaults_fail() {
        let err = failure(
            SchemaDeclaration::new()
                .field("pages", FieldDefinition::typed("integer").default_value(1))
                .with_default("pages", 2),
        );

        assert_eq!(
            err,
            SchemaError::ConflictingDefault {
                kind_id: "Book".to_string(),
                field: "pages".to_string(),
                field_default: json!(1),
                default: json!(2),
            }
        );
    }

    #[test]
    fn test_equal_defaults_keep_one_entry() {
        let schema = compiled(
            SchemaDeclaration::new()
                .field("pages", FieldDefinition::typed("integer").default_value(1))
                .with_default("pages", 1),
        );

        assert_eq!(schema.defaults().len(), 1);
        assert_eq!(schema.field("pages").unwrap().default_value(), Some(&Value::from(1)));
    }

    #[test]
    fn test_field_without_default_conflicts_with_defaults_entry() {
        let err = failure(
            SchemaDeclaration::new()
                .field("title", FieldDefinition::typed("string"))
                .with_default("title", "Untitled"),
        );

        assert_eq!(err.kind(), SchemaErrorKind::ConflictingDefault);
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn test_field_without_default_accepts_undefined_defaults_entry() {
        let schema = compiled(
            SchemaDeclaration::new()
                .field("title", FieldDefinition::typed("string"))
                .with_default("title", Value::Undefined),
        );

        assert_eq!(schema.field("title").unwrap().default_value(), None);
        assert_eq!(schema.defaults().get("title"), Some(&Value::Undefined));
    }

    #[test]
    fn test_every_default_has_matching_field() {
        let schema = compiled(
            SchemaDeclaration::new()
                .field("a", FieldDefinition::new().default_value(1))
                .field("b", FieldDefinition::typed("string").default_value("x"))
                .with_default("b", "x")
                .with_default("c", true),
        );

        for (name, default) in schema.defaults() {
            assert_eq!(schema.field(name).unwrap().default_value(), Some(default));
        }
        for field in schema.fields().values() {
            if let Some(default) = field.default_value() {
                assert_eq!(schema.defaults().get(field.name()), Some(default));
            }
        }
    }

    #[test]
    fn test_author_functions_override_descriptor() {
        let schema = compiled(
            SchemaDeclaration::new().field(
                "published",
                FieldDefinition::typed("date")
                    .transform(|_| Value::from("custom"))
                    .type_check(|v| v.as_str() == Some("custom")),
            ),
        );

        let field = schema.field("published").unwrap();
        let coerced = field.coerce(Value::from("2012-06-01"));
        assert_eq!(coerced, Value::from("custom"));
        assert!(field.accepts(&coerced));
        assert_eq!(field.resolved_type(), Some(TypeName::Date));
    }

    #[test]
    fn test_descriptor_fills_missing_functions() {
        let schema = compiled(
            SchemaDeclaration::new().field(
                "published",
                FieldDefinition::typed("date").validate(|_| None),
            ),
        );

        let field = schema.field("published").unwrap();
        assert!(field.has_validator());
        assert!(matches!(field.coerce(Value::from("2012-06-01")), Value::Date(_)));
        assert!(!field.accepts(&Value::from("2012-06-01")));
    }

    #[test]
    fn test_from_json_with_catalog_reference() {
        let catalog = KindCatalog::new();
        let author: ClassRef = author_kind();
        catalog.register(author).unwrap();

        let declaration = SchemaDeclaration::from_json(
            &json!({
                "fields": {
                    "title": {"type": "String"},
                    "author": {"type": {"$ref": "Author"}},
                    "id": {"type": "integer", "defaultValue": null}
                }
            }),
            Some(&catalog),
        );
        let schema = compiled(declaration);

        assert_eq!(schema.field_names(), vec!["title", "author", "id"]);
        assert_eq!(schema.field("author").unwrap().resolved_type(), Some(TypeName::Model));
        assert_eq!(schema.defaults().get("id"), Some(&Value::Null));
    }

    #[test]
    fn test_from_json_unknown_reference_is_unrecognizable() {
        let declaration = SchemaDeclaration::from_json(
            &json!({"fields": {"author": {"type": {"$ref": "Nobody"}}}}),
            Some(&KindCatalog::new()),
        );
        assert_eq!(failure(declaration).kind(), SchemaErrorKind::UnrecognizableType);
    }
}
