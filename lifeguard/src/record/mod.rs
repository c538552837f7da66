//! Schema-aware records and the minimal host object model.
//!
//! A [`RecordKind`] owns the compiled schema of its declaration. Every write
//! to one of its [`Record`]s runs the validation pipeline first, then the
//! kind's [`BaseValidate`] step, and commits only when both accept.
//! Kinds without declared fields skip the pipeline entirely.
//!
//! [`CollectionKind`] and [`ClassKind`] are the other class references a
//! field can name as its type; [`KindCatalog`] looks them up by id.

mod base;
mod catalog;
mod class;
mod collection;
mod instance;
mod kind;


pub use base::{BaseValidate, FnValidator, RequiredFields};
pub use catalog::KindCatalog;
pub use class::{ClassKind, ClassObject, Constructor};
pub use collection::{Collection, CollectionKind};
pub use instance::{ErrorCallback, Record, SetOptions};
pub use kind::{KindBuilder, RecordKind};

#[cfg(test)]
pub use base::MockBaseValidate;
