//! Records: attribute bags guarded by their kind's schema.

use super::kind::RecordKind;
use crate::errors::{AttributeError, ValidationErrors};
use crate::events::ERROR_EVENT;
use crate::utils::generate_uuid;
use crate::value::{attributes_to_json, Attributes, Value};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Called with the record, the errors and the options of a rejected write.
pub type ErrorCallback = Arc<dyn Fn(&Record, &ValidationErrors, &SetOptions) + Send + Sync>;

/// Options for [`Record::set`].
#[derive(Clone, Default)]
pub struct SetOptions {
    on_error: Option<ErrorCallback>,
}

impl SetOptions {
    /// Creates options with no error callback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback invoked instead of emitting an error event.
    #[must_use]
    pub fn with_on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Record, &ValidationErrors, &SetOptions) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// True if an error callback is set.
    #[must_use]
    pub fn has_on_error(&self) -> bool {
        self.on_error.is_some()
    }
}

impl fmt::Debug for SetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetOptions")
            .field("has_on_error", &self.on_error.is_some())
            .finish()
    }
}

/// A record of some [`RecordKind`].
///
/// Attributes change only through [`Record::try_set`] / [`Record::set`],
/// which commit a write only once every check has passed.
pub struct Record {
    cid: Uuid,
    kind: Arc<RecordKind>,
    attributes: RwLock<Attributes>,
}

impl Record {
    pub(crate) fn empty(kind: Arc<RecordKind>) -> Self {
        Self {
            cid: generate_uuid(),
            kind,
            attributes: RwLock::new(Attributes::new()),
        }
    }

    /// Returns the client id, unique per record.
    #[must_use]
    pub fn cid(&self) -> Uuid {
        self.cid
    }

    /// Returns the kind of this record.
    #[must_use]
    pub fn kind(&self) -> &Arc<RecordKind> {
        &self.kind
    }

    /// Gets an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.attributes.read().get(name).cloned()
    }

    /// True if the attribute is set to something other than null/undefined.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.attributes.read().get(name).is_some_and(|v| !v.is_nullish())
    }

    /// Returns a copy of all attributes.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.attributes.read().clone()
    }

    /// Validates and commits a write.
    ///
    /// The kind's schema pipeline runs first (when the kind has a schema),
    /// then the host base validator over the merged attributes. Nothing is
    /// written unless both accept. Base validation and commit of one write
    /// are not interleaved with another write to the same record.
    ///
    /// # Errors
    ///
    /// Every pipeline error, or the base validator's single rejection.
    pub fn try_set(&self, incoming: Attributes) -> Result<(), ValidationErrors> {
        let coerced = match self.kind.schema() {
            Some(schema) => schema.validate(incoming)?,
            None => incoming,
        };

        // Held across base validation and commit.
        let current = self.attributes.upgradable_read();
        if let Some(base) = self.kind.base_validator() {
            let mut merged = current.clone();
            merged.extend(coerced.iter().map(|(k, v)| (k.clone(), v.clone())));
            if let Some(message) = base.validate(&merged) {
                return Err(AttributeError::BaseRejected { message }.into());
            }
        }

        RwLockUpgradableReadGuard::upgrade(current).extend(coerced);
        Ok(())
    }

    /// Validates and commits a single attribute.
    ///
    /// # Errors
    ///
    /// As [`Self::try_set`].
    pub fn try_set_attr(&self, name: impl Into<String>, value: impl Into<Value>) -> Result<(), ValidationErrors> {
        let mut incoming = Attributes::with_capacity(1);
        incoming.insert(name.into(), value.into());
        self.try_set(incoming)
    }

    /// Writes attributes, reporting failure instead of returning it.
    ///
    /// On rejection the error callback of `options` is invoked if present;
    /// otherwise an `"error"` event carrying the errors is emitted through
    /// the kind's event sink. Returns whether the write was committed.
    pub fn set(&self, incoming: Attributes, options: &SetOptions) -> bool {
        let Err(errors) = self.try_set(incoming) else {
            return true;
        };

        debug!(
            kind_id = %self.kind.id(),
            cid = %self.cid,
            error_count = errors.len(),
            "Write rejected"
        );

        match &options.on_error {
            Some(callback) => callback(self, &errors, options),
            None => self.kind.event_sink().emit(
                ERROR_EVENT,
                Some(serde_json::json!({
                    "kind": self.kind.id(),
                    "cid": self.cid.to_string(),
                    "errors": errors.to_json(),
                })),
            ),
        }
        false
    }

    /// Writes a single attribute; see [`Self::set`].
    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<Value>, options: &SetOptions) -> bool {
        let mut incoming = Attributes::with_capacity(1);
        incoming.insert(name.into(), value.into());
        self.set(incoming, options)
    }

    /// Plain-data form of the attributes.
    ///
    /// Nested records and collections serialize through their own
    /// `to_json`; dates become ISO 8601 strings and regular expressions
    /// `/source/flags`. Undefined attributes are omitted.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        attributes_to_json(&self.attributes.read())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("cid", &self.cid)
            .field("kind", &self.kind.id())
            .field("attributes", &*self.attributes.read())
            .finish()
    }
}
