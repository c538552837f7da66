//! Read-only collections of records.

use super::instance::Record;
use super::kind::RecordKind;
use crate::errors::{AttributeError, ValidationErrors};
use crate::types::{BaseKind, ClassLike};
use crate::value::{Instance, Value};
use std::fmt;
use std::sync::Arc;

/// A kind of collection holding records of one model kind.
#[derive(Debug)]
pub struct CollectionKind {
    id: String,
    model: Arc<RecordKind>,
}

impl CollectionKind {
    /// Creates a collection kind over a model kind.
    #[must_use]
    pub fn new(id: impl Into<String>, model: Arc<RecordKind>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            model,
        })
    }

    /// Returns the kind id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the model kind.
    #[must_use]
    pub fn model(&self) -> &Arc<RecordKind> {
        &self.model
    }

    /// Builds a collection from a raw value.
    ///
    /// Arrays contribute one record per item, a single object or record
    /// contributes one record, null and undefined contribute none. Records
    /// of the model kind are kept as they are; objects become new records.
    ///
    /// # Errors
    ///
    /// Returns the errors of every item that could not become a record.
    pub fn create(self: &Arc<Self>, raw: Value) -> Result<Arc<Collection>, ValidationErrors> {
        let items = match raw {
            Value::Array(items) => items,
            Value::Null | Value::Undefined => Vec::new(),
            single => vec![single],
        };

        let mut records = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for item in items {
            match self.record_from(item) {
                Ok(record) => records.push(record),
                Err(item_errors) => errors.extend(item_errors.into_inner()),
            }
        }

        if errors.is_empty() {
            Ok(Arc::new(Collection {
                kind: Arc::clone(self),
                records,
            }))
        } else {
            Err(ValidationErrors::new(errors))
        }
    }

    fn record_from(&self, item: Value) -> Result<Arc<Record>, ValidationErrors> {
        match item {
            Value::Instance(Instance::Record(record)) if Arc::ptr_eq(record.kind(), &self.model) => Ok(record),
            Value::Object(attributes) => self.model.create(attributes),
            other => Err(AttributeError::InvalidRecordInput {
                kind_id: self.model.id().to_string(),
                found: other.describe(),
            }
            .into()),
        }
    }
}

impl ClassLike for CollectionKind {
    fn class_id(&self) -> &str {
        &self.id
    }

    fn base_kind(&self) -> Option<BaseKind> {
        Some(BaseKind::Collection)
    }

    fn construct(self: Arc<Self>, raw: Value) -> Result<Instance, String> {
        self.create(raw)
            .map(Instance::Collection)
            .map_err(|errors| errors.to_string())
    }
}

/// An ordered, read-only list of records.
pub struct Collection {
    kind: Arc<CollectionKind>,
    records: Vec<Arc<Record>>,
}

impl Collection {
    /// Returns the collection kind.
    #[must_use]
    pub fn kind(&self) -> &Arc<CollectionKind> {
        &self.kind
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Gets a record by position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<Record>> {
        self.records.get(index)
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Record>> {
        self.records.iter()
    }

    /// Plain-data form: an array of the records' plain data.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.records.iter().map(|r| r.to_json()).collect())
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Arc<Record>;
    type IntoIter = std::slice::Iter<'a, Arc<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("kind", &self.kind.id())
            .field("records", &self.records)
            .finish()
    }
}
