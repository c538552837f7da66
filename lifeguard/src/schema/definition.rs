//! Raw, author-facing field definitions.

use crate::errors::LifeguardError;
use crate::record::KindCatalog;
use crate::types::{Transform, TypeCheck, TypeSpec, Validator};
use crate::value::{attributes_from_json, Attributes, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Key of a class reference inside a JSON field type: `{"$ref": "Author"}`.
pub const REF_KEY: &str = "$ref";

/// One field as written by a schema author.
///
/// Every part is optional. Custom functions override whatever the declared
/// type would otherwise supply.
#[derive(Clone, Default)]
pub struct FieldDefinition {
    type_spec: Option<TypeSpec>,
    default_value: Option<Value>,
    validate: Option<Validator>,
    transform: Option<Transform>,
    type_check: Option<TypeCheck>,
}

impl FieldDefinition {
    /// Creates an empty definition (untyped, no default).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a definition with a declared type.
    #[must_use]
    pub fn typed(spec: impl Into<TypeSpec>) -> Self {
        Self::new().of_type(spec)
    }

    /// Sets the declared type.
    #[must_use]
    pub fn of_type(mut self, spec: impl Into<TypeSpec>) -> Self {
        self.type_spec = Some(spec.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets a custom validator. Returning `Some(message)` rejects the value.
    #[must_use]
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validator));
        self
    }

    /// Sets a custom coercion.
    #[must_use]
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Sets a custom type-check.
    #[must_use]
    pub fn type_check<F>(mut self, type_check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.type_check = Some(Arc::new(type_check));
        self
    }

    /// Returns the declared type.
    #[must_use]
    pub fn type_spec(&self) -> Option<&TypeSpec> {
        self.type_spec.as_ref()
    }

    /// Returns the default value.
    #[must_use]
    pub fn get_default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub(crate) fn into_parts(self) -> FieldParts {
        FieldParts {
            type_spec: self.type_spec,
            default_value: self.default_value,
            validate: self.validate,
            transform: self.transform,
            type_check: self.type_check,
        }
    }

    fn from_json(object: &serde_json::Map<String, serde_json::Value>, catalog: Option<&KindCatalog>) -> Self {
        let mut definition = Self::new();
        if let Some(raw_type) = object.get("type") {
            definition.type_spec = Some(type_spec_from_json(raw_type, catalog));
        }
        if let Some(default) = object.get("defaultValue").or_else(|| object.get("default_value")) {
            definition.default_value = Some(Value::from(default.clone()));
        }
        definition
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("type_spec", &self.type_spec)
            .field("default_value", &self.default_value)
            .field("has_validate", &self.validate.is_some())
            .field("has_transform", &self.transform.is_some())
            .field("has_type_check", &self.type_check.is_some())
            .finish()
    }
}

/// Destructured definition handed to the compiler.
pub(crate) struct FieldParts {
    pub type_spec: Option<TypeSpec>,
    pub default_value: Option<Value>,
    pub validate: Option<Validator>,
    pub transform: Option<Transform>,
    pub type_check: Option<TypeCheck>,
}

/// A raw entry of the `fields` map.
#[derive(Debug, Clone)]
pub enum FieldEntry {
    /// A structured definition.
    Definition(FieldDefinition),
    /// Anything that is not a mapping. Always rejected at compile time.
    Malformed(serde_json::Value),
}

impl From<FieldDefinition> for FieldEntry {
    fn from(definition: FieldDefinition) -> Self {
        Self::Definition(definition)
    }
}

/// The raw declaration of a record kind: optional fields plus defaults.
///
/// A declaration without fields installs no schema at all.
#[derive(Debug, Clone, Default)]
pub struct SchemaDeclaration {
    fields: Option<IndexMap<String, FieldEntry>>,
    defaults: Attributes,
}

impl SchemaDeclaration {
    /// Creates a declaration with no fields and no defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. The first field turns schema compilation on.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, entry: impl Into<FieldEntry>) -> Self {
        self.fields
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), entry.into());
        self
    }

    /// Declares an empty field map, so a schema is compiled even without fields.
    #[must_use]
    pub fn with_empty_fields(mut self) -> Self {
        self.fields.get_or_insert_with(IndexMap::new);
        self
    }

    /// Adds a defaults entry.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Returns true if a field map was declared.
    #[must_use]
    pub fn has_fields(&self) -> bool {
        self.fields.is_some()
    }

    /// Returns the declared field map.
    #[must_use]
    pub fn fields(&self) -> Option<&IndexMap<String, FieldEntry>> {
        self.fields.as_ref()
    }

    /// Returns the declared defaults.
    #[must_use]
    pub fn defaults(&self) -> &Attributes {
        &self.defaults
    }

    pub(crate) fn into_parts(self) -> (Option<IndexMap<String, FieldEntry>>, Attributes) {
        (self.fields, self.defaults)
    }

    /// Builds a declaration from a JSON document such as
    /// `{"fields": {"title": {"type": "string"}}, "defaults": {"shelf": "A3"}}`.
    ///
    /// A `fields` value that is not an object counts as absent. Field types
    /// may reference registered kinds with `{"$ref": "<kind id>"}`, resolved
    /// through `catalog`; unknown references and other shapes are kept as
    /// unrecognized so compilation reports them.
    #[must_use]
    pub fn from_json(document: &serde_json::Value, catalog: Option<&KindCatalog>) -> Self {
        let mut declaration = Self::new();

        if let Some(serde_json::Value::Object(fields)) = document.get("fields") {
            let mut entries = IndexMap::with_capacity(fields.len());
            for (name, raw) in fields {
                let entry = match raw {
                    serde_json::Value::Object(object) => {
                        FieldEntry::Definition(FieldDefinition::from_json(object, catalog))
                    }
                    other => FieldEntry::Malformed(other.clone()),
                };
                entries.insert(name.clone(), entry);
            }
            declaration.fields = Some(entries);
        }

        if let Some(defaults) = document.get("defaults") {
            declaration.defaults = attributes_from_json(defaults.clone());
        }

        declaration
    }

    /// Parses a JSON document and builds a declaration from it.
    ///
    /// # Errors
    ///
    /// Returns `LifeguardError::Serialization` if `text` is not valid JSON.
    pub fn from_json_str(text: &str, catalog: Option<&KindCatalog>) -> Result<Self, LifeguardError> {
        let document: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&document, catalog))
    }
}

fn type_spec_from_json(raw: &serde_json::Value, catalog: Option<&KindCatalog>) -> TypeSpec {
    match raw {
        serde_json::Value::String(name) => TypeSpec::Named(name.clone()),
        serde_json::Value::Object(object) => object
            .get(REF_KEY)
            .and_then(serde_json::Value::as_str)
            .and_then(|id| catalog.and_then(|c| c.get(id)))
            .map_or_else(|| TypeSpec::Unrecognized(raw.clone()), TypeSpec::Class),
        other => TypeSpec::Unrecognized(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_enables_fields() {
        let declaration = SchemaDeclaration::new().with_default("title", "Untitled");
        assert!(!declaration.has_fields());

        let declaration = declaration.field("title", FieldDefinition::typed("string"));
        assert!(declaration.has_fields());
        assert_eq!(declaration.fields().unwrap().len(), 1);
        assert_eq!(declaration.defaults().get("title"), Some(&Value::from("Untitled")));
    }

    #[test]
    fn test_from_json() {
        let declaration = SchemaDeclaration::from_json(
            &json!({
                "fields": {
                    "title": {"type": "string", "defaultValue": "Untitled"},
                    "pages": {"type": 42},
                    "broken": "string"
                },
                "defaults": {"pages": 0}
            }),
            None,
        );

        let fields = declaration.fields().unwrap();
        let keys: Vec<_> = fields.keys().cloned().collect();
        assert_eq!(keys, vec!["title", "pages", "broken"]);

        match &fields["title"] {
            FieldEntry::Definition(d) => {
                assert!(matches!(d.type_spec(), Some(TypeSpec::Named(n)) if n == "string"));
                assert_eq!(d.get_default(), Some(&Value::from("Untitled")));
            }
            FieldEntry::Malformed(_) => panic!("title should be a definition"),
        }
        match &fields["pages"] {
            FieldEntry::Definition(d) => {
                assert!(matches!(d.type_spec(), Some(TypeSpec::Unrecognized(_))));
            }
            FieldEntry::Malformed(_) => panic!("pages should be a definition"),
        }
        assert!(matches!(&fields["broken"], FieldEntry::Malformed(v) if v == "string"));
        assert_eq!(declaration.defaults().get("pages"), Some(&Value::from(0)));
    }

    #[test]
    fn test_from_json_without_fields_object() {
        let declaration = SchemaDeclaration::from_json(&json!({"fields": [1, 2]}), None);
        assert!(!declaration.has_fields());

        let declaration = SchemaDeclaration::from_json(&json!({"fields": {}}), None);
        assert!(declaration.has_fields());
    }

    #[test]
    fn test_from_json_str() {
        let declaration =
            SchemaDeclaration::from_json_str(r#"{"fields": {"title": {"type": "string"}}}"#, None).unwrap();
        assert_eq!(declaration.fields().unwrap().len(), 1);

        let err = SchemaDeclaration::from_json_str("{\"fields\": ", None).unwrap_err();
        assert!(matches!(err, LifeguardError::Serialization(_)));
    }

    #[test]
    fn test_unknown_ref_is_unrecognized() {
        let catalog = KindCatalog::new();
        let declaration = SchemaDeclaration::from_json(
            &json!({"fields": {"author": {"type": {"$ref": "Author"}}}}),
            Some(&catalog),
        );

        match &declaration.fields().unwrap()["author"] {
            FieldEntry::Definition(d) => {
                assert!(matches!(d.type_spec(), Some(TypeSpec::Unrecognized(_))));
            }
            FieldEntry::Malformed(_) => panic!("author should be a definition"),
        }
    }
}
