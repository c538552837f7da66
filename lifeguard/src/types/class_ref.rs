//! Class references and base-kind classification.

use super::TypeName;
use crate::value::{Instance, Value};
use std::fmt;
use std::sync::Arc;

/// Markers for the host base kinds a class reference may derive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKind {
    /// Record kinds.
    Model,
    /// Collection kinds.
    Collection,
}

/// Registered base kinds in the order they are tested, with the internal
/// type each one resolves to. A class matching none resolves to `class`.
pub const BASE_KINDS: [(BaseKind, TypeName); 2] = [
    (BaseKind::Model, TypeName::Model),
    (BaseKind::Collection, TypeName::Collection),
];

/// Anything a field can name as its type instead of a type name.
pub trait ClassLike: Send + Sync + fmt::Debug {
    /// Unique id of the class.
    fn class_id(&self) -> &str;

    /// The base kind this class derives from, if any.
    fn base_kind(&self) -> Option<BaseKind>;

    /// Builds a new instance with `raw` as the sole constructor argument.
    fn construct(self: Arc<Self>, raw: Value) -> Result<Instance, String>;
}

/// Shared reference to a class-like kind.
pub type ClassRef = Arc<dyn ClassLike>;

/// Resolves a class reference to its internal type name.
#[must_use]
pub fn classify(class: &dyn ClassLike) -> TypeName {
    let base = class.base_kind();
    BASE_KINDS
        .iter()
        .find(|(marker, _)| base == Some(*marker))
        .map_or(TypeName::Class, |(_, name)| *name)
}
