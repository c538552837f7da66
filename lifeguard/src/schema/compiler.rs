//! Declaration-time schema normalization.

use super::compiled::{CompiledField, CompiledSchema};
use super::definition::{FieldEntry, FieldParts, SchemaDeclaration};
use crate::errors::SchemaError;
use crate::observability::SpanTimer;
use crate::types::{TypeRegistry, REGISTRY};
use crate::value::{Attributes, Value};
use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Compiles raw declarations against a type registry.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'a> {
    registry: &'a TypeRegistry,
}

impl Default for SchemaCompiler<'static> {
    fn default() -> Self {
        Self::new(&REGISTRY)
    }
}

impl<'a> SchemaCompiler<'a> {
    /// Creates a compiler over the given registry.
    #[must_use]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Compiles the declaration of one record kind.
    ///
    /// Returns `Ok(None)` when the declaration has no field map: the kind
    /// then gets no schema and its writes are not validated.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed field, reserved, unsupported or
    /// unrecognizable type, or conflicting default. Nothing partial is
    /// returned.
    pub fn compile(
        &self,
        kind_id: &str,
        declaration: SchemaDeclaration,
    ) -> Result<Option<CompiledSchema>, SchemaError> {
        let (fields, defaults) = declaration.into_parts();
        let Some(raw_fields) = fields else {
            debug!(kind_id = %kind_id, "No fields declared, schema not installed");
            return Ok(None);
        };

        let timer = SpanTimer::start("schema.compile");
        match self.compile_fields(kind_id, raw_fields, defaults) {
            Ok(schema) => {
                debug!(
                    kind_id = %kind_id,
                    fields = schema.len(),
                    defaults = schema.defaults().len(),
                    duration_ms = timer.finish(),
                    "Compiled schema"
                );
                Ok(Some(schema))
            }
            Err(error) => {
                warn!(
                    kind_id = %kind_id,
                    field = %error.field(),
                    code = error.code(),
                    error = %error,
                    "Schema compilation failed"
                );
                Err(error)
            }
        }
    }

    fn compile_fields(
        &self,
        kind_id: &str,
        raw_fields: IndexMap<String, FieldEntry>,
        mut defaults: Attributes,
    ) -> Result<CompiledSchema, SchemaError> {
        let mut fields = IndexMap::with_capacity(raw_fields.len());

        for (name, entry) in raw_fields {
            let parts = match entry {
                FieldEntry::Definition(definition) => definition.into_parts(),
                FieldEntry::Malformed(found) => {
                    return Err(SchemaError::MalformedFieldDefinition {
                        kind_id: kind_id.to_string(),
                        field: name,
                        found: describe_json(&found),
                    });
                }
            };
            let field = self.compile_field(kind_id, &name, parts, &mut defaults)?;
            fields.insert(name, field);
        }

        let undefined = Value::Undefined;
        for (name, default) in &defaults {
            match fields.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(CompiledField::untyped(name.clone(), default.clone()));
                }
                Entry::Occupied(slot) => {
                    let field_default = slot.get().default_value.as_ref().unwrap_or(&undefined);
                    if field_default != default {
                        return Err(SchemaError::ConflictingDefault {
                            kind_id: kind_id.to_string(),
                            field: name.clone(),
                            field_default: field_default.to_json(),
                            default: default.to_json(),
                        });
                    }
                }
            }
        }

        Ok(CompiledSchema::new(kind_id, fields, defaults))
    }

    fn compile_field(
        &self,
        kind_id: &str,
        name: &str,
        parts: FieldParts,
        defaults: &mut Attributes,
    ) -> Result<CompiledField, SchemaError> {
        let FieldParts {
            type_spec,
            default_value,
            validate,
            transform,
            type_check,
        } = parts;

        if let Some(default) = &default_value {
            if !defaults.contains_key(name) {
                defaults.insert(name.to_string(), default.clone());
            }
        }

        let mut field = CompiledField {
            name: name.to_string(),
            resolved_type: None,
            transform,
            validate,
            type_check,
            default_value,
        };

        if let Some(spec) = type_spec {
            let descriptor = self.registry.resolve(kind_id, name, &spec)?;
            field.resolved_type = Some(descriptor.name);
            field.transform = field.transform.or(descriptor.transform);
            field.validate = field.validate.or(descriptor.validate);
            field.type_check = field.type_check.or(Some(descriptor.type_check));
        }

        Ok(field)
    }
}

fn describe_json(value: &serde_json::Value) -> String {
    Value::from(value.clone()).describe()
}

/// Compiles a declaration with the global registry.
///
/// # Errors
///
/// See [`SchemaCompiler::compile`].
pub fn compile(
    kind_id: &str,
    declaration: SchemaDeclaration,
) -> Result<Option<CompiledSchema>, SchemaError> {
    SchemaCompiler::default().compile(kind_id, declaration)
}
