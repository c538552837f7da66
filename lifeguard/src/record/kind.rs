//! Schema-aware record kinds.

use super::base::{BaseValidate, FnValidator};
use super::catalog::KindCatalog;
use super::instance::Record;
use crate::errors::{AttributeError, LifeguardError, SchemaError, ValidationErrors};
use crate::events::{get_event_sink, EventSink};
use crate::schema::{CompiledSchema, FieldDefinition, FieldEntry, SchemaCompiler, SchemaDeclaration};
use crate::types::{BaseKind, ClassLike, TypeRegistry, REGISTRY};
use crate::value::{Attributes, Instance, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A declared kind of record.
///
/// Holds the compiled schema (if fields were declared), the merged
/// defaults, an optional host base validator and an optional event sink.
/// Kinds are shared through `Arc` and are themselves class references, so
/// one kind can be the declared type of another kind's field.
pub struct RecordKind {
    id: String,
    schema: Option<Arc<CompiledSchema>>,
    defaults: Attributes,
    base_validator: Option<Arc<dyn BaseValidate>>,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl RecordKind {
    /// Starts a kind declaration.
    #[must_use]
    pub fn builder(id: impl Into<String>) -> KindBuilder {
        KindBuilder::new(id)
    }

    /// Declares a kind from a schema declaration.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found while compiling.
    pub fn declare(id: impl Into<String>, declaration: SchemaDeclaration) -> Result<Arc<Self>, SchemaError> {
        KindBuilder::new(id).declaration(declaration).build()
    }

    /// Declares a kind from a JSON declaration document.
    ///
    /// Field types may name kinds registered in `catalog` with `{"$ref": id}`.
    ///
    /// # Errors
    ///
    /// `LifeguardError::Serialization` for invalid JSON, otherwise
    /// `LifeguardError::Schema` if the declaration does not compile.
    pub fn declare_json(
        id: impl Into<String>,
        text: &str,
        catalog: Option<&KindCatalog>,
    ) -> Result<Arc<Self>, LifeguardError> {
        let declaration = SchemaDeclaration::from_json_str(text, catalog)?;
        Ok(Self::declare(id, declaration)?)
    }

    /// Returns the kind id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the compiled schema, if fields were declared.
    #[must_use]
    pub fn schema(&self) -> Option<&Arc<CompiledSchema>> {
        self.schema.as_ref()
    }

    /// True if writes to this kind are validated.
    #[must_use]
    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Returns the defaults applied to new records.
    #[must_use]
    pub fn defaults(&self) -> &Attributes {
        &self.defaults
    }

    pub(crate) fn base_validator(&self) -> Option<&dyn BaseValidate> {
        self.base_validator.as_deref()
    }

    /// Returns the sink rejected writes are reported to.
    ///
    /// Falls back to the global sink when the kind has none.
    #[must_use]
    pub fn event_sink(&self) -> Arc<dyn EventSink> {
        self.event_sink.clone().unwrap_or_else(get_event_sink)
    }

    /// Creates a record from raw attributes.
    ///
    /// Defaults are applied first, then `raw` goes through the same write
    /// path as [`Record::try_set`].
    ///
    /// # Errors
    ///
    /// Returns every error of the initial write.
    pub fn create(self: &Arc<Self>, raw: Attributes) -> Result<Arc<Record>, ValidationErrors> {
        let mut initial = self.defaults.clone();
        initial.extend(raw);

        let record = Record::empty(Arc::clone(self));
        record.try_set(initial)?;
        debug!(kind_id = %self.id, cid = %record.cid(), "Created record");
        Ok(Arc::new(record))
    }

    /// Creates a record from any value.
    ///
    /// Objects are used as attributes, null and undefined as no attributes.
    ///
    /// # Errors
    ///
    /// `InvalidRecordInput` for other shapes; otherwise as [`Self::create`].
    pub fn create_from_value(self: &Arc<Self>, raw: Value) -> Result<Arc<Record>, ValidationErrors> {
        match raw {
            Value::Object(attributes) => self.create(attributes),
            Value::Null | Value::Undefined => self.create(Attributes::new()),
            other => Err(AttributeError::InvalidRecordInput {
                kind_id: self.id.clone(),
                found: other.describe(),
            }
            .into()),
        }
    }

    /// Creates a record from a JSON object.
    ///
    /// # Errors
    ///
    /// As [`Self::create_from_value`].
    pub fn create_from_json(self: &Arc<Self>, raw: serde_json::Value) -> Result<Arc<Record>, ValidationErrors> {
        self.create_from_value(Value::from(raw))
    }
}

impl ClassLike for RecordKind {
    fn class_id(&self) -> &str {
        &self.id
    }

    fn base_kind(&self) -> Option<BaseKind> {
        Some(BaseKind::Model)
    }

    fn construct(self: Arc<Self>, raw: Value) -> Result<Instance, String> {
        self.create_from_value(raw)
            .map(Instance::Record)
            .map_err(|errors| errors.to_string())
    }
}

impl fmt::Debug for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordKind")
            .field("id", &self.id)
            .field("fields", &self.schema.as_ref().map(|s| s.field_names()))
            .field("defaults", &self.defaults)
            .field("has_base_validator", &self.base_validator.is_some())
            .field("has_event_sink", &self.event_sink.is_some())
            .finish()
    }
}

/// Builder for [`RecordKind`].
pub struct KindBuilder {
    id: String,
    declaration: SchemaDeclaration,
    base_validator: Option<Arc<dyn BaseValidate>>,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl KindBuilder {
    /// Creates a builder with no fields, defaults, validator or sink.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            declaration: SchemaDeclaration::new(),
            base_validator: None,
            event_sink: None,
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, definition: FieldDefinition) -> Self {
        self.declaration = self.declaration.field(name, definition);
        self
    }

    /// Adds a raw field entry, malformed or not.
    #[must_use]
    pub fn field_entry(mut self, name: impl Into<String>, entry: FieldEntry) -> Self {
        self.declaration = self.declaration.field(name, entry);
        self
    }

    /// Adds a defaults entry.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declaration = self.declaration.with_default(name, value);
        self
    }

    /// Replaces the whole declaration.
    #[must_use]
    pub fn declaration(mut self, declaration: SchemaDeclaration) -> Self {
        self.declaration = declaration;
        self
    }

    /// Sets the host base validator.
    #[must_use]
    pub fn base_validator(mut self, validator: Arc<dyn BaseValidate>) -> Self {
        self.base_validator = Some(validator);
        self
    }

    /// Sets the host base validator from a closure.
    #[must_use]
    pub fn base_validator_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Attributes) -> Option<String> + Send + Sync + 'static,
    {
        self.base_validator(Arc::new(FnValidator::new(f)))
    }

    /// Sets the sink rejected writes are reported to.
    #[must_use]
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Compiles the declaration with the global registry.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found while compiling.
    pub fn build(self) -> Result<Arc<RecordKind>, SchemaError> {
        self.build_with(&REGISTRY)
    }

    /// Compiles the declaration with the given registry.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found while compiling.
    pub fn build_with(self, registry: &TypeRegistry) -> Result<Arc<RecordKind>, SchemaError> {
        let declared_defaults = self.declaration.defaults().clone();
        let schema = SchemaCompiler::new(registry).compile(&self.id, self.declaration)?;
        let defaults = schema
            .as_ref()
            .map_or(declared_defaults, |s| s.defaults().clone());

        Ok(Arc::new(RecordKind {
            id: self.id,
            schema: schema.map(Arc::new),
            defaults,
            base_validator: self.base_validator,
            event_sink: self.event_sink,
        }))
    }
}

impl fmt::Debug for KindBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindBuilder")
            .field("id", &self.id)
            .field("declaration", &self.declaration)
            .finish_non_exhaustive()
    }
}
