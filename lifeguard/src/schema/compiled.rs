//! Frozen, validated schemas.

use crate::errors::ValidationErrors;
use crate::types::{Transform, TypeCheck, TypeName, Validator};
use crate::value::{Attributes, Value};
use indexmap::IndexMap;
use std::fmt;

/// A field after type resolution, with its effective behavior.
#[derive(Clone)]
pub struct CompiledField {
    pub(crate) name: String,
    pub(crate) resolved_type: Option<TypeName>,
    pub(crate) transform: Option<Transform>,
    pub(crate) validate: Option<Validator>,
    pub(crate) type_check: Option<TypeCheck>,
    pub(crate) default_value: Option<Value>,
}

impl CompiledField {
    /// An untyped field that only carries a default.
    pub(crate) fn untyped(name: impl Into<String>, default_value: Value) -> Self {
        Self {
            name: name.into(),
            resolved_type: None,
            transform: None,
            validate: None,
            type_check: None,
            default_value: Some(default_value),
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the internal type the declared type resolved to.
    #[must_use]
    pub fn resolved_type(&self) -> Option<TypeName> {
        self.resolved_type
    }

    /// Returns the default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// True if a custom validator applies to this field.
    #[must_use]
    pub fn has_validator(&self) -> bool {
        self.validate.is_some()
    }

    /// Applies the field's coercion; identity when there is none.
    #[must_use]
    pub fn coerce(&self, value: Value) -> Value {
        match &self.transform {
            Some(transform) => transform(value),
            None => value,
        }
    }

    /// Runs the custom validator, returning its rejection message.
    ///
    /// An empty message counts as a pass.
    #[must_use]
    pub fn check(&self, value: &Value) -> Option<String> {
        self.validate
            .as_ref()
            .and_then(|validate| validate(value))
            .filter(|message| !message.is_empty())
    }

    /// Runs the type-check; always true when there is none.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        self.type_check.as_ref().map_or(true, |check| check(value))
    }
}

impl fmt::Debug for CompiledField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledField")
            .field("name", &self.name)
            .field("resolved_type", &self.resolved_type)
            .field("default_value", &self.default_value)
            .field("has_transform", &self.transform.is_some())
            .field("has_validate", &self.validate.is_some())
            .field("has_type_check", &self.type_check.is_some())
            .finish()
    }
}

/// The immutable schema of one record kind.
///
/// Every `defaults` entry has a field carrying the same default, and every
/// field with a default has the same entry in `defaults`.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    kind_id: String,
    fields: IndexMap<String, CompiledField>,
    defaults: Attributes,
}

impl CompiledSchema {
    pub(crate) fn new(
        kind_id: impl Into<String>,
        fields: IndexMap<String, CompiledField>,
        defaults: Attributes,
    ) -> Self {
        Self {
            kind_id: kind_id.into(),
            fields,
            defaults,
        }
    }

    /// Returns the id of the record kind this schema belongs to.
    #[must_use]
    pub fn kind_id(&self) -> &str {
        &self.kind_id
    }

    /// Returns the fields in declaration order, synthesized fields last.
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, CompiledField> {
        &self.fields
    }

    /// Looks up a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.get(name)
    }

    /// Returns the field names in order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Returns the merged defaults.
    #[must_use]
    pub fn defaults(&self) -> &Attributes {
        &self.defaults
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Runs the validation pipeline on an incoming write.
    pub fn validate(&self, incoming: Attributes) -> Result<Attributes, ValidationErrors> {
        crate::validation::validate(self, incoming)
    }
}
