//! Schema declaration and compilation.
//!
//! Authors describe a record kind with a [`SchemaDeclaration`]: an optional
//! map of [`FieldDefinition`]s plus a map of defaults. The
//! [`SchemaCompiler`] turns it into an immutable [`CompiledSchema`] once,
//! when the kind is declared:
//!
//! 1. every field's declared type is resolved against the type registry,
//!    filling in coercion and type-check behavior the author did not supply;
//! 2. field defaults and the defaults map are reconciled in both directions;
//! 3. the result is frozen and shared by every record of the kind.

mod compiled;
mod compiler;
mod definition;

mod schema_tests;

pub use compiled::{CompiledField, CompiledSchema};
pub use compiler::{compile, SchemaCompiler};
pub use definition::{FieldDefinition, FieldEntry, SchemaDeclaration, REF_KEY};
