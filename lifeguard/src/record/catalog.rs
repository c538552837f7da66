//! Id-based lookup of class references.

use crate::errors::LifeguardError;
use crate::types::ClassRef;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Thread-safe catalog of class references by id.
///
/// JSON declarations use it to resolve `{"$ref": "<id>"}` field types.
#[derive(Debug, Default)]
pub struct KindCatalog {
    kinds: RwLock<HashMap<String, ClassRef>>,
}

impl KindCatalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class reference under its class id.
    ///
    /// # Errors
    ///
    /// Returns `LifeguardError::DuplicateKind` if the id is taken.
    pub fn register(&self, class: ClassRef) -> Result<(), LifeguardError> {
        let id = class.class_id().to_string();
        let mut kinds = self.kinds.write();

        if kinds.contains_key(&id) {
            return Err(LifeguardError::DuplicateKind { id });
        }

        debug!(kind_id = %id, "Registered kind");
        kinds.insert(id, class);
        Ok(())
    }

    /// Gets a class reference by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ClassRef> {
        self.kinds.read().get(id).cloned()
    }

    /// Checks if an id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.kinds.read().contains_key(id)
    }

    /// Removes a class reference.
    pub fn unregister(&self, id: &str) -> Option<ClassRef> {
        self.kinds.write().remove(id)
    }

    /// Returns the registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.kinds.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.read().len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ClassKind, RecordKind};
    use std::sync::Arc;

    #[test]
    fn test_register_and_get() {
        let catalog = KindCatalog::new();
        let author = RecordKind::builder("Author").build().unwrap();

        catalog.register(author.clone()).unwrap();
        catalog.register(ClassKind::new("Point", Ok)).unwrap();

        assert_eq!(catalog.ids(), vec!["Author".to_string(), "Point".to_string()]);
        assert!(catalog.contains("Author"));
        assert_eq!(catalog.get("Author").unwrap().class_id(), "Author");
        assert!(catalog.get("Book").is_none());

        let removed = catalog.unregister("Point").unwrap();
        assert_eq!(removed.class_id(), "Point");
        assert_eq!(catalog.len(), 1);
        assert!(Arc::strong_count(&author) >= 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let catalog = KindCatalog::new();
        catalog.register(RecordKind::builder("Author").build().unwrap()).unwrap();

        let err = catalog
            .register(RecordKind::builder("Author").build().unwrap())
            .unwrap_err();
        assert!(matches!(err, LifeguardError::DuplicateKind { id } if id == "Author"));
    }
}
