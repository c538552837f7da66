//! Plain classes: class references that are neither records nor collections.

use crate::types::{BaseKind, ClassLike};
use crate::value::{Instance, Value};
use std::fmt;
use std::sync::Arc;

/// Builds the state of a new object from the raw constructor argument.
pub type Constructor = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// A plain class with a constructor.
pub struct ClassKind {
    id: String,
    constructor: Constructor,
}

impl ClassKind {
    /// Creates a class.
    pub fn new<F>(id: impl Into<String>, constructor: F) -> Arc<Self>
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            id: id.into(),
            constructor: Arc::new(constructor),
        })
    }

    /// Returns the class id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Builds a new object.
    ///
    /// # Errors
    ///
    /// Returns the constructor's rejection message.
    pub fn instantiate(self: &Arc<Self>, raw: Value) -> Result<Arc<ClassObject>, String> {
        let state = (self.constructor)(raw)?;
        Ok(Arc::new(ClassObject {
            class: Arc::clone(self),
            state,
        }))
    }
}

impl ClassLike for ClassKind {
    fn class_id(&self) -> &str {
        &self.id
    }

    fn base_kind(&self) -> Option<BaseKind> {
        None
    }

    fn construct(self: Arc<Self>, raw: Value) -> Result<Instance, String> {
        self.instantiate(raw).map(Instance::Object)
    }
}

impl fmt::Debug for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassKind").field("id", &self.id).finish_non_exhaustive()
    }
}

/// An object built by a [`ClassKind`].
#[derive(Debug)]
pub struct ClassObject {
    class: Arc<ClassKind>,
    state: Value,
}

impl ClassObject {
    /// Returns the class that built this object.
    #[must_use]
    pub fn class(&self) -> &Arc<ClassKind> {
        &self.class
    }

    /// Returns the object's state.
    #[must_use]
    pub fn state(&self) -> &Value {
        &self.state
    }

    /// Plain-data form of the state.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        self.state.to_json()
    }
}
